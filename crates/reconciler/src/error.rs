//! Error types for the reconciler crate.

use std::fmt;

/// Result type alias for reconciler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reconciler error types.
///
/// Only failures that stop a reconciliation before any update is issued
/// surface here. Failed gig updates are reported per action in the
/// [`ReconcileResult`](crate::ReconcileResult).
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The festival to reconcile could not be fetched.
    FestivalUnavailable { festival_id: String, reason: String },
    /// A gig could not be fetched for its update.
    GigUnavailable { gig_id: String, reason: String },
    /// A gig update was rejected.
    UpdateFailed { gig_id: String, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FestivalUnavailable {
                festival_id,
                reason,
            } => {
                write!(f, "festival '{festival_id}' unavailable: {reason}")
            }
            Self::GigUnavailable { gig_id, reason } => {
                write!(f, "gig '{gig_id}' unavailable: {reason}")
            }
            Self::UpdateFailed { gig_id, reason } => {
                write!(f, "update of gig '{gig_id}' failed: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Create a festival unavailable error.
    pub fn festival_unavailable(festival_id: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::FestivalUnavailable {
            festival_id: festival_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a gig unavailable error.
    pub fn gig_unavailable(gig_id: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::GigUnavailable {
            gig_id: gig_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an update failed error.
    pub fn update_failed(gig_id: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::UpdateFailed {
            gig_id: gig_id.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::festival_unavailable("f1", "Festival f1 not found");
        assert!(err.to_string().contains("f1"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_update_failed() {
        let err = Error::update_failed("g7", "Venue is required");
        assert_eq!(
            err.to_string(),
            "update of gig 'g7' failed: Venue is required"
        );
    }
}
