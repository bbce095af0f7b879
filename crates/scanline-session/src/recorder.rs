//! # History Recorder
//!
//! Single writer task for scan history. Scans are written one at a time in
//! the order they were recorded, so the newest scan ends up at the head of
//! the history and a repeat keeps the image of its latest sighting.
//!
//! ```text
//! record(A) ─┐
//! record(B) ─┼──► unbounded mpsc ──► writer task ──► add_scan(A), add_scan(B), ...
//! flush()   ─┘                                      └─► flush reply once all
//!                                                       earlier writes are done
//! ```

use std::sync::Arc;

use scanline_core::NewScan;
use scanline_store::HistoryRepository;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn, Instrument};

enum RecorderMessage {
    Record(NewScan),
    Flush(oneshot::Sender<()>),
}

/// Handle to the history writer task. The task ends once every handle is
/// dropped and the queue is drained.
#[derive(Clone)]
pub struct HistoryRecorder {
    tx: mpsc::UnboundedSender<RecorderMessage>,
}

impl HistoryRecorder {
    /// Spawns the writer task in the current span.
    pub fn start(history: Arc<dyn HistoryRepository>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::run(history, rx).in_current_span());
        HistoryRecorder { tx }
    }

    /// Queues a scan; never waits for the write.
    pub fn record(&self, scan: NewScan) {
        if self.tx.send(RecorderMessage::Record(scan)).is_err() {
            warn!("History writer stopped, scan not recorded");
        }
    }

    /// Waits until every scan queued before this call has been written.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.tx.send(RecorderMessage::Flush(tx)).is_err() {
            return;
        }
        let _ = rx.await;
    }

    async fn run(
        history: Arc<dyn HistoryRepository>,
        mut rx: mpsc::UnboundedReceiver<RecorderMessage>,
    ) {
        while let Some(message) = rx.recv().await {
            match message {
                RecorderMessage::Record(scan) => {
                    if let Err(e) = history.add_scan(scan).await {
                        error!(error = %e, "Failed to record scan history");
                    }
                }
                RecorderMessage::Flush(reply) => {
                    let _ = reply.send(());
                }
            }
        }
        debug!("History writer stopped");
    }
}
