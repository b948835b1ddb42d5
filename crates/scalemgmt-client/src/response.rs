//! Wire model for command responses and their embedded jobs.
//!
//! Every state-changing endpoint of the GUI answers with the same envelope:
//! a status block (an echo of the HTTP code plus a diagnostic message) and a
//! list of job handles. The job-status endpoint answers with the identical
//! shape, so one type serves both submission replies and poll replies.

use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// Status block echoed in every command response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplyStatus {
    /// Numeric status, mirroring the HTTP status code of the reply.
    #[serde(default)]
    pub code: i32,
    /// Diagnostic message; carries vendor error fragments on failure.
    #[serde(default)]
    pub message: String,
}

/// Captured output of a finished (or failed) job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobResult {
    #[serde(default)]
    pub stdout: Vec<String>,
    #[serde(default)]
    pub stderr: Vec<String>,
}

/// One unit of asynchronous work tracked by the remote system.
///
/// The lifecycle state arrives as free text on the wire; [`Job::state`]
/// lifts it into [`JobState`] and rejects anything unrecognized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Opaque handle, meaningful only to the remote system.
    pub job_id: u64,
    /// Raw lifecycle state as reported by the GUI.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: JobResult,
}

impl Job {
    /// The typed lifecycle state of this job.
    ///
    /// Any value other than `RUNNING`, `COMPLETED` or `FAILED` is a
    /// malformed response, not a fourth state.
    pub fn state(&self) -> Result<JobState, ClientError> {
        JobState::parse(&self.status).ok_or_else(|| {
            ClientError::protocol(format!(
                "job {} reported unrecognized state '{}'",
                self.job_id, self.status
            ))
        })
    }
}

/// Lifecycle state of a job. `Running` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Running,
    Completed,
    Failed,
}

impl JobState {
    /// Parse the wire representation; `None` for anything unrecognized.
    pub fn parse(raw: &str) -> Option<JobState> {
        match raw {
            "RUNNING" => Some(JobState::Running),
            "COMPLETED" => Some(JobState::Completed),
            "FAILED" => Some(JobState::Failed),
            _ => None,
        }
    }

    /// Whether no further transitions can occur from this state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobState::Running)
    }
}

/// Envelope returned by command submission and by the job-status resource.
///
/// A response and its jobs live for one request/poll cycle only; the remote
/// system owns job state beyond that.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub status: ReplyStatus,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl CommandResponse {
    /// The first job handle, or a protocol error naming `context` when the
    /// response carries none.
    pub fn first_job(&self, context: &str) -> Result<&Job, ClientError> {
        self.jobs.first().ok_or_else(|| {
            ClientError::protocol(format!("no job details in response for {context}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_submission_reply() {
        let raw = serde_json::json!({
            "status": { "code": 202, "message": "The request was accepted for processing." },
            "jobs": [{
                "jobId": 4711,
                "status": "RUNNING",
                "submitted": "2024-03-01 10:00:00,000",
                "result": {}
            }]
        });
        let reply: CommandResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(reply.status.code, 202);
        assert_eq!(reply.jobs.len(), 1);
        assert_eq!(reply.jobs[0].job_id, 4711);
        assert_eq!(reply.jobs[0].state().unwrap(), JobState::Running);
    }

    #[test]
    fn test_decode_failed_job_keeps_stderr() {
        let raw = serde_json::json!({
            "status": { "code": 200 },
            "jobs": [{
                "jobId": 9,
                "status": "FAILED",
                "result": { "stdout": [], "stderr": ["EFSSP1102C already exists"] }
            }]
        });
        let reply: CommandResponse = serde_json::from_value(raw).unwrap();
        let job = &reply.jobs[0];
        assert_eq!(job.state().unwrap(), JobState::Failed);
        assert_eq!(job.result.stderr, vec!["EFSSP1102C already exists"]);
    }

    #[test]
    fn test_unknown_state_is_an_error_not_a_fourth_state() {
        let job = Job {
            job_id: 1,
            status: "CANCELLING".into(),
            result: JobResult::default(),
        };
        let err = job.state().unwrap_err();
        assert!(err.to_string().contains("CANCELLING"));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
    }

    #[test]
    fn test_first_job_on_empty_response() {
        let reply = CommandResponse::default();
        assert!(reply.first_job("scalemgmt/v2/filesystems/fs1/filesets").is_err());
    }
}
