//! Async client for a storage manager's `scalemgmt/v2` REST API.
//!
//! The GUI executes state-changing commands (filesets, snapshots,
//! directories, symlinks, mounts, quotas) either synchronously or as named
//! asynchronous jobs. This crate owns the job-completion protocol:
//!
//! 1. Submit a command through the [`executor::CommandExecutor`] capability.
//! 2. Classify the outcome ([`outcome::classify`]): synchronous success,
//!    accepted-for-async, or error. An accepted reply without a job handle
//!    is a protocol violation, surfaced immediately.
//! 3. Poll the job-status resource with bounded exponential backoff
//!    (2, 4, 8, 16, 16, ... seconds) until COMPLETED or FAILED
//!    ([`poller::wait_for_completion`]), optionally bounded by a deadline
//!    or a cancellation token.
//! 4. Resolve terminal failures against the per-operation idempotency
//!    tables ([`idempotency`]): a "target already exists" / "already
//!    removed" failure becomes success for idempotent callers.
//!
//! Vendor error codes are extracted once, at the parsing boundary, into
//! [`signatures::ErrorSignature`]; nothing downstream matches raw text.
//!
//! ```no_run
//! use scalemgmt_client::{GuiClient, GuiConfig};
//!
//! # async fn demo() -> Result<(), scalemgmt_client::ClientError> {
//! let config = GuiConfig::from_env()?;
//! let client = GuiClient::connect(&config)?;
//! client.create_fileset("fs1", "fset1", &Default::default()).await?;
//! client.create_snapshot("fs1", "fset1", "snap1").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod executor;
pub mod idempotency;
pub mod outcome;
pub mod poller;
pub mod requests;
pub mod resources;
pub mod response;
pub mod signatures;
pub mod transport;

pub use client::GuiClient;
pub use config::GuiConfig;
pub use errors::ClientError;
pub use executor::{ApiReply, CommandExecutor, HttpVerb};
pub use idempotency::OperationKind;
pub use outcome::Outcome;
pub use poller::PollPolicy;
pub use response::{CommandResponse, Job, JobState};
pub use signatures::ErrorSignature;
pub use transport::RestTransport;
