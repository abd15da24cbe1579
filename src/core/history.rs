// AnomalyDash - core/history.rs
//
// Bounded, chronologically ordered detection history backing the chart
// and the anomaly counter. Oldest points are evicted on overflow.

use crate::core::model::ChartPoint;
use std::collections::VecDeque;

/// Rolling window of the most recent chart points.
#[derive(Debug, Clone)]
pub struct History {
    points: VecDeque<ChartPoint>,
    capacity: usize,
}

impl History {
    /// Create an empty history holding at most `capacity` points.
    ///
    /// A capacity of zero is raised to one so `append` always records
    /// the latest point.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `point`, evicting the oldest entries beyond capacity.
    pub fn append(&mut self, point: ChartPoint) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Points in chronological order (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points flagged as anomalies.
    pub fn anomaly_count(&self) -> usize {
        self.points.iter().filter(|p| p.anomaly).count()
    }

    /// Largest value in the window, if any.
    pub fn max_value(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.value)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(crate::util::constants::HISTORY_CAPACITY)
    }
}
