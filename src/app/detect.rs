// AnomalyDash - app/detect.rs
//
// Detection lifecycle management. Runs each submission on a background
// thread and reports the outcome to the UI thread via an mpsc channel.
//
// Architecture:
//   - `DetectionManager` lives on the UI thread; `run_detection` runs on a
//     worker thread, one per submission.
//   - The worker sends exactly one `DetectionProgress::Completed` message.
//   - The uploader's pending guard keeps at most one request in flight, so
//     a single receiver is enough.
//   - No cancellation: if the UI has gone away, the send fails and the
//     worker exits quietly.

use crate::app::api::ApiClient;
use crate::core::model::DetectionOutcome;
use crate::core::uploader::SubmitRequest;
use std::sync::{mpsc, Arc};

/// Messages sent from a detection worker to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionProgress {
    /// The request for `ticket` finished, successfully or not.
    Completed {
        ticket: u64,
        outcome: DetectionOutcome,
    },
}

/// Runs detections on background threads.
pub struct DetectionManager {
    client: Arc<ApiClient>,

    /// Channel receiver for the UI to poll progress messages.
    progress_rx: mpsc::Receiver<DetectionProgress>,

    /// Sender cloned into each worker.
    progress_tx: mpsc::Sender<DetectionProgress>,
}

impl DetectionManager {
    pub fn new(client: ApiClient) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client: Arc::new(client),
            progress_rx: rx,
            progress_tx: tx,
        }
    }

    /// Endpoint the detections are posted to.
    pub fn endpoint(&self) -> &str {
        self.client.predict_url()
    }

    /// Start a detection for `request` on a background thread.
    pub fn start(&self, request: SubmitRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.progress_tx.clone();
        let ticket = request.ticket;

        std::thread::spawn(move || run_detection(&client, request, tx));

        tracing::debug!(ticket, "Detection started");
    }

    /// Poll for progress messages without blocking. Returns all pending messages.
    pub fn poll_progress(&self) -> Vec<DetectionProgress> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.progress_rx.try_recv() {
            messages.push(msg);
        }
        messages
    }
}

/// Worker body: one request, one message.
fn run_detection(
    client: &ApiClient,
    request: SubmitRequest,
    tx: mpsc::Sender<DetectionProgress>,
) {
    let result = client.try_predict_image(&request.image, request.model);
    if let Err(ref e) = result {
        tracing::warn!(
            ticket = request.ticket,
            kind = %e.kind(),
            error = %e,
            "Detection failed"
        );
    }
    let outcome = DetectionOutcome::from(result);
    if tx
        .send(DetectionProgress::Completed {
            ticket: request.ticket,
            outcome,
        })
        .is_err()
    {
        tracing::debug!(ticket = request.ticket, "UI gone; dropping detection outcome");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::api::ApiConfig;
    use crate::core::model::ModelId;
    use crate::core::uploader::SelectedImage;
    use crate::util::error::FailureKind;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    /// A missing file fails before any network traffic, so this exercises
    /// the worker round-trip without a server.
    #[test]
    fn test_worker_reports_input_failure() {
        let manager = DetectionManager::new(ApiClient::new(&ApiConfig::default()).unwrap());
        manager.start(SubmitRequest {
            ticket: 7,
            image: SelectedImage::new(
                PathBuf::from("/nonexistent/anomalydash/missing.png"),
                "image/png",
                0,
            ),
            model: ModelId::Padim,
        });

        let deadline = Instant::now() + Duration::from_secs(10);
        let msg = loop {
            if let Some(m) = manager.poll_progress().into_iter().next() {
                break m;
            }
            assert!(Instant::now() < deadline, "worker never reported");
            std::thread::sleep(Duration::from_millis(10));
        };

        let DetectionProgress::Completed { ticket, outcome } = msg;
        assert_eq!(ticket, 7);
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Input));
    }
}
