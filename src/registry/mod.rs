//! Skill registry access.
//!
//! The registry is the external service that stores skill metadata and
//! ranks skills against a natural-language intent. This module only
//! speaks its HTTP JSON API; nothing here caches or stores results.

pub mod client;
pub mod types;

use std::time::Duration;

use thiserror::Error;

pub use client::RegistryClient;
pub use types::{ListFilters, RawSkill, SkillCategory, SkillId, SkillPage};

/// Failure talking to the skill registry.
///
/// A single failed attempt is surfaced immediately; the client never retries.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry answered with a non-2xx status.
    #[error("Failed to fetch from skill registry: HTTP {status}: {detail}")]
    Rejected { status: u16, detail: String },

    /// The request did not complete within the configured deadline.
    #[error("Failed to fetch from skill registry: request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// No connection to the registry within the connect deadline.
    #[error("Failed to fetch from skill registry: connection timed out after {}s", .0.as_secs())]
    ConnectTimeout(Duration),

    /// Network-level failure or a response that is not the expected JSON.
    #[error("Failed to fetch from skill registry: {cause}")]
    Transport { cause: String },
}

impl RegistryError {
    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        Self::Transport {
            cause: format!("malformed response: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_carries_status_and_body() {
        let err = RegistryError::Rejected {
            status: 503,
            detail: "maintenance".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch from skill registry: HTTP 503: maintenance"
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = RegistryError::Timeout(Duration::from_secs(30));
        assert_eq!(
            err.to_string(),
            "Failed to fetch from skill registry: request timed out after 30s"
        );
    }

    #[test]
    fn test_connect_timeout_message_names_connect_deadline() {
        let err = RegistryError::ConnectTimeout(Duration::from_secs(10));
        assert_eq!(
            err.to_string(),
            "Failed to fetch from skill registry: connection timed out after 10s"
        );
    }

    #[test]
    fn test_malformed_is_transport() {
        let err = RegistryError::malformed("expected an object");
        assert!(matches!(err, RegistryError::Transport { .. }));
        assert!(err.to_string().contains("malformed response: expected an object"));
    }
}
