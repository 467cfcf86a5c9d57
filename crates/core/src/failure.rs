//! Failure classification for remote calls.
//!
//! A producer run through an [`AsyncResource`](crate::AsyncResource) fails with
//! some transport error. The resource only needs three facts about it: was the
//! request superseded, did the server say something useful, and what is the
//! fixed text for this kind of failure.

/// Fallback text when a failure carries no usable message.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Classification of a failed remote call.
pub trait Failure {
    /// Whether the failure is a cancelled (superseded) in-flight request.
    fn is_cancelled(&self) -> bool;

    /// Message supplied by the server, if any.
    fn server_message(&self) -> Option<&str> {
        None
    }

    /// Fixed text for this kind of failure, if the kind is known.
    fn kind_message(&self) -> Option<&'static str> {
        None
    }
}

/// Derive a human-readable message from a failure.
///
/// Prefers the server message, then the per-kind text, then [`UNKNOWN_ERROR`].
/// Blank messages are skipped.
pub fn describe_failure<F: Failure + ?Sized>(failure: &F) -> String {
    failure
        .server_message()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .or_else(|| failure.kind_message().filter(|m| !m.trim().is_empty()))
        .unwrap_or(UNKNOWN_ERROR)
        .to_string()
}
