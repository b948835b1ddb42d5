//! Job polling: drive one job handle from submission to a terminal state.
//!
//! The loop fetches the job-status resource, sleeps with bounded exponential
//! backoff while the job reports RUNNING, and stops on the first terminal
//! state, fetch failure, or malformed reply. Fetch failures are never
//! retried here — a broken status endpoint is a structural problem, not a
//! transient one.
//!
//! The reference behavior polls forever while a job stays RUNNING. That is
//! preserved as the default (`deadline: None`), with the bound under caller
//! control: a [`PollPolicy`] deadline and/or a [`CancellationToken`], each
//! surfacing its own error variant.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::ClientError;
use crate::executor::{job_status_path, CommandExecutor, HttpVerb};
use crate::response::{Job, JobState};
use crate::signatures::ErrorSignature;

/// Timing of the poll loop.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Wait before the second fetch.
    pub initial: Duration,
    /// Upper bound on the wait; doubling stops here.
    pub cap: Duration,
    /// Overall bound on the loop. `None` polls until a terminal state is
    /// observed, matching the remote system's own expectations for long
    /// jobs.
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    /// The backoff schedule of the reference behavior: 2, 4, 8, 16, 16, ...
    /// seconds, no deadline.
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(2),
            cap: Duration::from_secs(16),
            deadline: None,
        }
    }
}

impl PollPolicy {
    /// The default schedule with an overall deadline.
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::default()
        }
    }
}

/// Poll `job_id` until COMPLETED or FAILED.
///
/// On COMPLETED the full job, including captured stdout/stderr, is returned
/// unchanged. On FAILED the stderr content is surfaced in
/// [`ClientError::JobFailed`] together with its extracted signatures so
/// callers can apply idempotency matching. A reply with zero jobs or an
/// unrecognized state terminates immediately with a protocol error.
pub async fn wait_for_completion<E>(
    executor: &E,
    job_id: u64,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<Job, ClientError>
where
    E: CommandExecutor + ?Sized,
{
    let started = tokio::time::Instant::now();
    let deadline_at = policy.deadline.map(|deadline| started + deadline);
    let path = job_status_path(job_id);
    let mut wait = policy.initial;

    loop {
        let reply = executor.execute(HttpVerb::Get, &path, None).await?;
        let response = reply.command_response()?;
        let job = response.first_job(&path)?;

        match job.state()? {
            JobState::Completed => {
                debug!(job_id, "job completed");
                return Ok(job.clone());
            }
            JobState::Failed => {
                let stderr = job.result.stderr.clone();
                let signatures =
                    ErrorSignature::scan_lines(stderr.iter().map(String::as_str));
                warn!(job_id, stderr = ?stderr, "job failed");
                return Err(ClientError::JobFailed {
                    job_id,
                    stderr,
                    signatures,
                });
            }
            JobState::Running => {
                debug!(job_id, wait_secs = wait.as_secs_f64(), "job still running");
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(ClientError::Cancelled { job_id });
            }
            _ = deadline_elapsed(deadline_at) => {
                return Err(ClientError::DeadlineExceeded {
                    job_id,
                    deadline: policy.deadline.unwrap_or(Duration::ZERO),
                });
            }
            _ = tokio::time::sleep(wait) => {}
        }

        wait = (wait * 2).min(policy.cap);
    }
}

/// Resolves when the deadline passes; pends forever when there is none.
async fn deadline_elapsed(deadline_at: Option<tokio::time::Instant>) {
    match deadline_at {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
