//! The public operation surface.
//!
//! Every state-changing operation runs through one template:
//! submit → classify the outcome → poll to terminal if accepted → absorb a
//! benign terminal failure for that operation kind. The template exists
//! exactly once; the per-domain modules only build paths and payloads.

mod cluster;
mod filesets;
mod filesystems;
mod paths;
mod snapshots;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::GuiConfig;
use crate::errors::{ClientError, Result};
use crate::executor::{CommandExecutor, HttpVerb};
use crate::idempotency::{absorb_benign_failure, OperationKind};
use crate::outcome::{classify, validate_accepted, Outcome};
use crate::poller::{wait_for_completion, PollPolicy};
use crate::response::{Job, JobState};
use crate::signatures::ErrorSignature;
use crate::transport::RestTransport;

/// Client for the storage manager's GUI REST service.
///
/// Generic over the executor capability so the whole surface can be driven
/// with deterministic stubs in tests. Cheap to share: operations take
/// `&self` and hold no mutable state between calls.
pub struct GuiClient<E> {
    executor: E,
    policy: PollPolicy,
    cancel: CancellationToken,
}

impl GuiClient<RestTransport> {
    /// Connect using the reqwest transport.
    pub fn connect(config: &GuiConfig) -> Result<Self> {
        Ok(Self::with_executor(
            RestTransport::new(config)?,
            config.poll_policy(),
        ))
    }
}

impl<E: CommandExecutor> GuiClient<E> {
    /// Build a client around any executor implementation.
    pub fn with_executor(executor: E, policy: PollPolicy) -> Self {
        Self {
            executor,
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the cancellation token observed by poll loops.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The token that aborts in-flight polls when cancelled.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// The underlying executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// GET a read-only resource and decode its endpoint-specific envelope.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let reply = self.executor.execute(HttpVerb::Get, path, None).await?;
        reply.decode()
    }

    /// Run one state-changing command through the full protocol.
    ///
    /// Returns the completed job when the command went through a job, `None`
    /// when it completed synchronously or its failure was absorbed as
    /// already-satisfied for `kind`.
    pub(crate) async fn run_job_operation(
        &self,
        kind: OperationKind,
        method: HttpVerb,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Job>> {
        debug!(operation = %kind, %method, path, "submitting command");

        let reply = match self.executor.execute(method, path, body).await {
            Ok(reply) => reply,
            Err(err) => {
                absorb_benign_failure(kind, err)?;
                return Ok(None);
            }
        };

        let response = reply.command_response()?;
        validate_accepted(&response, path)?;

        if classify(reply.http_status) != Outcome::AsyncAccepted {
            // Synchronous completion: the job arrived inline, terminal
            // already. A FAILED inline job goes through the same absorption
            // as a polled one.
            let job = response.first_job(path)?;
            if job.state()? == JobState::Failed {
                let stderr = job.result.stderr.clone();
                let signatures =
                    ErrorSignature::scan_lines(stderr.iter().map(String::as_str));
                let err = ClientError::JobFailed {
                    job_id: job.job_id,
                    stderr,
                    signatures,
                };
                absorb_benign_failure(kind, err)?;
                return Ok(None);
            }
            return Ok(Some(job.clone()));
        }

        let job_id = response.first_job(path)?.job_id;
        match wait_for_completion(&self.executor, job_id, &self.policy, &self.cancel).await {
            Ok(job) => Ok(Some(job)),
            Err(err) => {
                absorb_benign_failure(kind, err)?;
                Ok(None)
            }
        }
    }

    /// Submit a command but leave the job running: returns the numeric
    /// status and job handle for a later [`Self::wait_for_job_completion`].
    /// Used by the copy operations, whose jobs can outlive the caller's
    /// patience for a single round-trip.
    pub(crate) async fn submit_deferred(
        &self,
        method: HttpVerb,
        path: &str,
        body: Option<Value>,
    ) -> Result<(u16, u64)> {
        debug!(%method, path, "submitting deferred command");
        let reply = self.executor.execute(method, path, body).await?;
        let response = reply.command_response()?;
        validate_accepted(&response, path)?;
        let job = response.first_job(path)?;
        Ok((reply.http_status, job.job_id))
    }

    /// Block until a previously submitted job reaches a terminal state.
    ///
    /// A no-op when `http_status` says the command already completed
    /// synchronously.
    pub async fn wait_for_job_completion(&self, http_status: u16, job_id: u64) -> Result<()> {
        if classify(http_status) == Outcome::AsyncAccepted {
            wait_for_completion(&self.executor, job_id, &self.policy, &self.cancel).await?;
        }
        Ok(())
    }
}

/// Encode a request payload as a JSON body.
pub(crate) fn json_body<T: Serialize>(payload: &T) -> Result<Option<Value>> {
    serde_json::to_value(payload)
        .map(Some)
        .map_err(|err| ClientError::protocol(format!("cannot encode request body: {err}")))
}

/// Existence-check helper: a failure carrying `probe` means "absent",
/// reported as `Ok(false)`; every other failure propagates.
pub(crate) fn absent_on(err: ClientError, probe: ErrorSignature) -> Result<bool> {
    if err.has_signature(probe) {
        Ok(false)
    } else {
        Err(err)
    }
}
