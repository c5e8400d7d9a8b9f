use thiserror::Error;

use crate::dispatch::GestureKind;

/// The error type returned by gesture handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can happen while feeding touch input to a recognizer.
#[derive(Debug, Error)]
pub enum Error {
    /// A contact moved or ended, but no contact was in progress.
    #[error("no contact is in progress")]
    NoContact,

    /// A touch sample that should carry a position didn't.
    #[error("touch sample for slot {slot} has no coordinates")]
    MissingCoordinates { slot: u32 },

    /// A gesture handler failed. The remaining handlers for that gesture were not called.
    #[error("{kind} handler failed: {source}")]
    Handler {
        kind: GestureKind,
        #[source]
        source: BoxError,
    },
}
