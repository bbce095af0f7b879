//! Session events pushed to the UI layer.

use serde::Serialize;
use ts_rs::TS;

use crate::state::SessionSnapshot;

/// A user-visible alert (title plus body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice {
            title: title.into(),
            message: message.into(),
        }
    }

    /// An image scan found nothing.
    pub fn no_barcode() -> Self {
        Notice::new(
            "No barcode found",
            "Could not detect any barcode in the selected image.",
        )
    }

    /// A platform error shown verbatim.
    pub fn error(message: impl Into<String>) -> Self {
        Notice::new("Error", message)
    }
}

/// Trait for emitting session events (implemented by the UI bridge).
pub trait SessionEventEmitter: Send + Sync {
    /// Shows an alert to the user.
    fn emit_notice(&self, notice: &Notice);

    /// Publishes the session state after it changed.
    fn emit_state(&self, snapshot: &SessionSnapshot);
}

/// No-op event emitter for headless use.
pub struct NoOpEmitter;

impl SessionEventEmitter for NoOpEmitter {
    fn emit_notice(&self, _notice: &Notice) {}
    fn emit_state(&self, _snapshot: &SessionSnapshot) {}
}
