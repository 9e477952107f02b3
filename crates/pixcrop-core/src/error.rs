//! Errors surfaced by the editing session.
//!
//! Every variant is recoverable: a failed call leaves the session exactly
//! as it was before the call.

use thiserror::Error;

use crate::processor::ProcessError;

/// Errors returned by [`EditorSession`](crate::session::EditorSession) and
/// the [`Compositor`](crate::export::Compositor).
#[derive(Debug, Error)]
pub enum EditorError {
    /// The image could not be opened or decoded
    #[error("Failed to open image: {0}")]
    Decode(#[source] ProcessError),

    /// An apply or export round trip failed
    #[error("Processing failed: {0}")]
    Processing(#[source] ProcessError),

    /// An apply or export is already outstanding
    #[error("Another apply or export request is still in flight")]
    RequestInFlight,

    /// No image is loaded
    #[error("No image is open")]
    NoImage,

    /// A completion arrived with nothing outstanding
    #[error("No apply or export request is pending")]
    NoPendingRequest,
}
