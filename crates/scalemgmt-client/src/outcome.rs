//! Outcome classification for command replies.
//!
//! The GUI signals how it handled a command purely through the numeric
//! status: `200` means the command completed synchronously, `201`/`202` mean
//! it was accepted and a job is running on the caller's behalf, anything
//! else is an error. Classification is total — unknown codes are `Error`,
//! never a panic.

use std::fmt;

use crate::errors::ClientError;
use crate::response::CommandResponse;
use crate::signatures::ErrorSignature;

/// Immediate classification of a command reply, distinct from the eventual
/// terminal state of any job it spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command completed before the reply was sent.
    SyncSuccess,
    /// The command was accepted; a job carries it out asynchronously.
    AsyncAccepted,
    /// The command was rejected.
    Error,
}

impl Outcome {
    /// Whether the command was handled (synchronously or not).
    pub fn is_success(self) -> bool {
        !matches!(self, Outcome::Error)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SyncSuccess => write!(f, "synchronous success"),
            Self::AsyncAccepted => write!(f, "accepted for asynchronous execution"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Map a numeric status to an [`Outcome`]. Pure and total.
pub fn classify(status: u16) -> Outcome {
    match status {
        200 => Outcome::SyncSuccess,
        201 | 202 => Outcome::AsyncAccepted,
        _ => Outcome::Error,
    }
}

/// Classify the status block echoed inside a response body.
pub fn classify_reply(response: &CommandResponse) -> Outcome {
    u16::try_from(response.status.code)
        .map(classify)
        .unwrap_or(Outcome::Error)
}

/// Check that a command reply really was accepted: a success-class status
/// and at least one job handle.
///
/// An accepted command with no job handle is an unrecoverable protocol
/// violation — the caller would have nothing to poll — so it is surfaced as
/// [`ClientError::Protocol`], never silently tolerated.
pub fn validate_accepted(response: &CommandResponse, context: &str) -> Result<(), ClientError> {
    if !classify_reply(response).is_success() {
        return Err(ClientError::Remote {
            http_status: u16::try_from(response.status.code).unwrap_or(0),
            code: response.status.code,
            message: response.status.message.clone(),
            signatures: ErrorSignature::scan(&response.status.message),
        });
    }

    if response.jobs.is_empty() {
        return Err(ClientError::protocol(format!(
            "command accepted but no job details returned for {context}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{Job, JobResult, ReplyStatus};

    fn accepted_with_job() -> CommandResponse {
        CommandResponse {
            status: ReplyStatus {
                code: 202,
                message: String::new(),
            },
            jobs: vec![Job {
                job_id: 1,
                status: "RUNNING".into(),
                result: JobResult::default(),
            }],
        }
    }

    #[test]
    fn test_classify_whitelist() {
        assert_eq!(classify(200), Outcome::SyncSuccess);
        assert_eq!(classify(201), Outcome::AsyncAccepted);
        assert_eq!(classify(202), Outcome::AsyncAccepted);
    }

    #[test]
    fn test_classify_is_total_over_unknown_codes() {
        for status in [0u16, 204, 301, 400, 401, 404, 500, 599, u16::MAX] {
            assert_eq!(classify(status), Outcome::Error);
        }
    }

    #[test]
    fn test_validate_accepted_ok() {
        assert!(validate_accepted(&accepted_with_job(), "test").is_ok());
    }

    #[test]
    fn test_accepted_without_jobs_is_protocol_error() {
        let mut response = accepted_with_job();
        response.jobs.clear();
        let err = validate_accepted(&response, "scalemgmt/v2/filesystems/fs1/filesets")
            .unwrap_err();
        assert!(matches!(err, ClientError::Protocol { .. }));
    }

    #[test]
    fn test_error_status_surfaces_remote_error_with_signatures() {
        let response = CommandResponse {
            status: ReplyStatus {
                code: 400,
                message: "Invalid value in 'filesetName'".into(),
            },
            jobs: vec![],
        };
        let err = validate_accepted(&response, "test").unwrap_err();
        match err {
            ClientError::Remote {
                code, signatures, ..
            } => {
                assert_eq!(code, 400);
                assert_eq!(signatures, vec![ErrorSignature::FilesetAbsent]);
            }
            other => panic!("expected Remote error, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_status_code_classifies_as_error() {
        let response = CommandResponse {
            status: ReplyStatus {
                code: -1,
                message: String::new(),
            },
            jobs: vec![],
        };
        assert_eq!(classify_reply(&response), Outcome::Error);
    }
}
