//! Error types for the tunekit library
//!
//! Validation errors are fatal to a run: a bad hardware fact or an unknown
//! profile is rejected before the rule engine is ever invoked, so no partial
//! artifact can be produced.

use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, TunekitError>;

/// Tunekit error types
#[derive(Error, Debug)]
pub enum TunekitError {
    /// A supplied hardware fact violates its constraint
    #[error("invalid hardware fact: {field} {message}")]
    InvalidHardwareFact {
        field: &'static str,
        message: String,
    },

    /// Workload profile name outside the fixed profile set
    #[error(
        "unknown workload profile: {name}. Valid options: general, virtualization, web, \
         database, cache, compute, fileserver, network, container, development"
    )]
    UnknownProfile { name: String },

    /// Unrecognized disk medium name
    #[error("unknown disk medium: {name}. Valid options: hdd, ssd, nvme")]
    UnknownDiskMedium { name: String },
}

impl TunekitError {
    /// Create an invalid-hardware-fact error
    pub fn invalid_fact(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidHardwareFact {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_fact_display() {
        let err = TunekitError::invalid_fact("cores", "must be greater than zero (got 0)");
        assert_eq!(
            err.to_string(),
            "invalid hardware fact: cores must be greater than zero (got 0)"
        );
    }

    #[test]
    fn test_unknown_profile_lists_options() {
        let err = TunekitError::UnknownProfile {
            name: "mainframe".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("mainframe"));
        assert!(msg.contains("general"));
        assert!(msg.contains("development"));
    }
}
