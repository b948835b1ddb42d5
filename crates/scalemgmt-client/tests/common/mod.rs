#![allow(dead_code)]

//! Shared test support: a deterministic executor scripted with canned
//! replies, plus builders for the reply shapes the GUI produces.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use serde_json::Value;

use scalemgmt_client::{ApiReply, ClientError, CommandExecutor, ErrorSignature, HttpVerb};

/// Pops one scripted reply per request, in order, and records every request
/// it served. Panics when the code under test issues more requests than the
/// script anticipates.
pub struct ScriptedExecutor {
    replies: Mutex<VecDeque<Result<ApiReply, ClientError>>>,
    requests: Mutex<Vec<(HttpVerb, String)>>,
}

impl ScriptedExecutor {
    pub fn new(replies: Vec<Result<ApiReply, ClientError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<(HttpVerb, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        method: HttpVerb,
        path: &str,
        _body: Option<Value>,
    ) -> Result<ApiReply, ClientError> {
        self.requests
            .lock()
            .unwrap()
            .push((method, path.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("request beyond the scripted replies")
    }
}

fn job_envelope(http_status: u16, job_id: u64, state: &str, stderr: &[&str]) -> ApiReply {
    ApiReply {
        http_status,
        body: json!({
            "status": { "code": http_status, "message": "" },
            "jobs": [{
                "jobId": job_id,
                "status": state,
                "result": { "stdout": [], "stderr": stderr }
            }]
        }),
    }
}

/// 202 submission reply with one RUNNING job.
pub fn accepted(job_id: u64) -> Result<ApiReply, ClientError> {
    Ok(job_envelope(202, job_id, "RUNNING", &[]))
}

/// 200 submission reply: the command completed synchronously.
pub fn sync_ok(job_id: u64) -> Result<ApiReply, ClientError> {
    Ok(job_envelope(200, job_id, "COMPLETED", &[]))
}

/// 202 submission reply that violates the protocol: no job handle.
pub fn accepted_without_jobs() -> Result<ApiReply, ClientError> {
    Ok(ApiReply {
        http_status: 202,
        body: json!({ "status": { "code": 202, "message": "" }, "jobs": [] }),
    })
}

/// Poll reply: job still RUNNING.
pub fn poll_running(job_id: u64) -> Result<ApiReply, ClientError> {
    Ok(job_envelope(200, job_id, "RUNNING", &[]))
}

/// Poll reply: job COMPLETED.
pub fn poll_completed(job_id: u64) -> Result<ApiReply, ClientError> {
    Ok(job_envelope(200, job_id, "COMPLETED", &[]))
}

/// Poll reply: job FAILED with the given stderr lines.
pub fn poll_failed(job_id: u64, stderr: &[&str]) -> Result<ApiReply, ClientError> {
    Ok(job_envelope(200, job_id, "FAILED", stderr))
}

/// Application-level error reply, with signatures extracted the way the
/// real transport extracts them.
pub fn remote_error(http_status: u16, message: &str) -> Result<ApiReply, ClientError> {
    Err(ClientError::Remote {
        http_status,
        code: i32::from(http_status),
        message: message.to_string(),
        signatures: ErrorSignature::scan(message),
    })
}
