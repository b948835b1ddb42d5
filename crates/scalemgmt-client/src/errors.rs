//! Error taxonomy for the client.
//!
//! One enum covers the whole surface. The split matters for callers:
//! transport and authentication failures are never retried here, protocol
//! violations are never masked, and only [`ClientError::JobFailed`] /
//! [`ClientError::Remote`] are eligible for idempotent absorption — and only
//! through the per-operation tables in [`crate::idempotency`].

use std::time::Duration;

use thiserror::Error;

use crate::executor::HttpVerb;
use crate::signatures::ErrorSignature;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything that can go wrong talking to the storage manager.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, DNS or TLS failure below the HTTP layer.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The GUI rejected the credentials. Raised before any body parsing.
    #[error("authentication rejected for {method} {path}")]
    Unauthenticated { method: HttpVerb, path: String },

    /// The response shape violates the expected contract: an accepted
    /// command without a job handle, an unrecognized job state, or an
    /// undecodable body. Never retried, never absorbed.
    #[error("protocol violation: {reason}")]
    Protocol { reason: String },

    /// The GUI answered with an application-level error status. Carries the
    /// remote diagnostic and any signatures extracted from it, so existence
    /// checks and idempotency tables can classify the failure.
    #[error("remote call failed with HTTP {http_status}: {message}")]
    Remote {
        http_status: u16,
        code: i32,
        message: String,
        signatures: Vec<ErrorSignature>,
    },

    /// A job reached the terminal FAILED state.
    #[error("job {job_id} failed: {}", .stderr.join("; "))]
    JobFailed {
        job_id: u64,
        stderr: Vec<String>,
        signatures: Vec<ErrorSignature>,
    },

    /// The caller's cancellation token fired while polling.
    #[error("operation cancelled while waiting for job {job_id}")]
    Cancelled { job_id: u64 },

    /// The poll deadline elapsed before the job reached a terminal state.
    #[error("job {job_id} did not reach a terminal state within {deadline:?}")]
    DeadlineExceeded { job_id: u64, deadline: Duration },

    /// The client could not be constructed from the given configuration.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ClientError {
    /// Create a protocol-violation error.
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol {
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The signatures extracted from this error's remote text, if any.
    ///
    /// Only `Remote` and `JobFailed` carry signatures; every other variant
    /// yields an empty slice and therefore never matches a benign table.
    pub fn signatures(&self) -> &[ErrorSignature] {
        match self {
            Self::Remote { signatures, .. } | Self::JobFailed { signatures, .. } => signatures,
            _ => &[],
        }
    }

    /// Whether this error carries the given signature.
    pub fn has_signature(&self, signature: ErrorSignature) -> bool {
        self.signatures().contains(&signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_failed_display_includes_stderr() {
        let err = ClientError::JobFailed {
            job_id: 42,
            stderr: vec!["EFSSP1102C already exists".into(), "second line".into()],
            signatures: vec![ErrorSignature::AlreadyExists],
        };
        let text = err.to_string();
        assert!(text.contains("job 42 failed"));
        assert!(text.contains("EFSSP1102C already exists"));
        assert!(text.contains("second line"));
    }

    #[test]
    fn test_signatures_only_on_remote_and_job_failed() {
        let remote = ClientError::Remote {
            http_status: 400,
            code: 400,
            message: "Invalid value in 'filesetName'".into(),
            signatures: vec![ErrorSignature::FilesetAbsent],
        };
        assert!(remote.has_signature(ErrorSignature::FilesetAbsent));

        let protocol = ClientError::protocol("no job details");
        assert!(protocol.signatures().is_empty());
        assert!(!protocol.has_signature(ErrorSignature::AlreadyExists));
    }

    #[test]
    fn test_deadline_display() {
        let err = ClientError::DeadlineExceeded {
            job_id: 7,
            deadline: Duration::from_secs(30),
        };
        assert!(err.to_string().contains("job 7"));
    }
}
