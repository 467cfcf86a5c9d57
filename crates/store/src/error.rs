//! Error types for the stores
//!
//! Remote failures never surface here; they land on the owning
//! resource's error channel. This type covers local state and lineup
//! reconciliation.

use thiserror::Error;

/// Errors raised by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Preferences could not be read, parsed or written
    #[error("Preferences error: {0}")]
    Preferences(#[from] gigbook_core::Error),
    /// The festival lineup could not be reconciled
    #[error("Lineup error: {0}")]
    Lineup(#[from] gigbook_reconciler::Error),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = StoreError::from(gigbook_core::Error::toml_parse_failed("expected `=`"));
        assert_eq!(
            error.to_string(),
            "Preferences error: TOML parse error: expected `=`"
        );

        let error = StoreError::from(gigbook_reconciler::Error::festival_unavailable(
            "f1",
            "Not found",
        ));
        assert!(error.to_string().starts_with("Lineup error: "));
        assert!(error.to_string().contains("f1"));
    }

    #[test]
    fn test_error_source() {
        use std::error::Error as _;

        let error = StoreError::from(gigbook_core::Error::invalid_record("bad"));
        assert!(error.source().is_some());
    }
}
