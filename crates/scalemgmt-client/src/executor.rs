//! The command-executor capability.
//!
//! The classifier, poller and operation surface never touch HTTP, TLS or
//! credentials directly; they depend on this trait. Production uses
//! [`crate::transport::RestTransport`]; tests inject deterministic stubs.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ClientError;
use crate::response::CommandResponse;

/// HTTP method of a command, kept transport-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A decoded 2xx reply: the HTTP status plus the parsed JSON body.
///
/// The body stays generic JSON here because read-only resources (filesystem
/// listings, quota reports, ...) use per-endpoint shapes; command and
/// job-status endpoints decode it into [`CommandResponse`].
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub http_status: u16,
    pub body: Value,
}

impl ApiReply {
    /// Decode the body into an endpoint-specific type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_value(self.body.clone()).map_err(|err| {
            ClientError::protocol(format!("undecodable response body: {err}"))
        })
    }

    /// Decode the body as the command/job envelope.
    pub fn command_response(&self) -> Result<CommandResponse, ClientError> {
        self.decode()
    }
}

/// Capability to execute one authenticated request against the GUI.
///
/// Implementations must:
/// - surface transport failures as [`ClientError::Transport`], distinct from
///   application-level errors,
/// - reject HTTP 401 as [`ClientError::Unauthenticated`] before parsing any
///   body,
/// - surface non-2xx application replies as [`ClientError::Remote`] carrying
///   the remote diagnostic and its extracted signatures,
/// - return only 2xx replies as [`ApiReply`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(
        &self,
        method: HttpVerb,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiReply, ClientError>;
}

/// Resource path of the "job details, all fields" endpoint for a handle.
pub(crate) fn job_status_path(job_id: u64) -> String {
    format!("scalemgmt/v2/jobs/{job_id}?fields=:all:")
}
