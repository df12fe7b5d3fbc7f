//! Error types for gateway requests and session operations.
//!
//! `GatewayError` is defined here rather than in `adaptest-gateway` so the
//! fetch driver can classify failures for retry decisions without string
//! matching.

use thiserror::Error;

use crate::model::Phase;

/// Errors that can occur when fetching a question from the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The service answered with an error status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The reply body could not be parsed at all.
    #[error("malformed reply: {0}")]
    MalformedReply(String),

    /// The reply is missing a required question field.
    #[error("reply is missing required field `{0}`")]
    MissingField(&'static str),

    /// A question field is present but unusable.
    #[error("reply field `{field}` has invalid value {value:?}")]
    InvalidField { field: &'static str, value: String },
}

impl GatewayError {
    /// The request never produced a usable HTTP exchange.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::Network(_) | GatewayError::Timeout(_) | GatewayError::Api { .. }
        )
    }

    /// The reply arrived but did not describe a complete question.
    pub fn is_shape_violation(&self) -> bool {
        matches!(
            self,
            GatewayError::MalformedReply(_)
                | GatewayError::MissingField(_)
                | GatewayError::InvalidField { .. }
        )
    }

    /// Returns `true` if repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Network(_) | GatewayError::Timeout(_) => true,
            GatewayError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Errors returned by session controller and mastery operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The operation is not allowed in the current phase.
    #[error("cannot {operation} while in the {phase} phase")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },

    /// `advance` was requested without a selected option.
    #[error("no option selected")]
    NoSelection,

    /// A retry was requested but no failed fetch is pending.
    #[error("no failed question request to retry")]
    NoPendingFetch,

    /// Sessions must contain at least one question.
    #[error("session length must be positive")]
    InvalidSessionLength,

    #[error("score {score} exceeds session length {session_length}")]
    ScoreOutOfRange { score: u32, session_length: u32 },

    /// Skill names in a profile must be unique.
    #[error("duplicate skill in profile: {0}")]
    DuplicateSkill(String),
}
