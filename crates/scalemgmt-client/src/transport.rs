//! reqwest-backed implementation of the command-executor capability.
//!
//! Owns everything the core must not: the HTTP client, basic-auth
//! credentials, TLS mode, and the per-request timeout. A 401 reply is
//! rejected before any body parsing; non-2xx application replies become
//! [`ClientError::Remote`] with the remote diagnostic and its extracted
//! signatures attached.

use async_trait::async_trait;
use reqwest::{Certificate, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GuiConfig;
use crate::errors::ClientError;
use crate::executor::{ApiReply, CommandExecutor, HttpVerb};
use crate::outcome::classify;
use crate::signatures::ErrorSignature;

/// HTTP transport bound to one GUI endpoint.
#[derive(Debug)]
pub struct RestTransport {
    http: reqwest::Client,
    endpoint: String,
    username: String,
    password: String,
}

impl RestTransport {
    /// Build the transport from configuration.
    ///
    /// With `secure_ssl` the server certificate is verified against the
    /// configured CA bundle; without it, verification is skipped (the GUI
    /// commonly runs with a self-signed certificate).
    pub fn new(config: &GuiConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().timeout(config.request_timeout());

        if config.secure_ssl {
            let path = config.ca_cert.as_ref().ok_or_else(|| {
                ClientError::config("secure_ssl is set but no ca_cert is configured")
            })?;
            let pem = std::fs::read(path).map_err(|err| {
                ClientError::config(format!("cannot read CA bundle {}: {err}", path.display()))
            })?;
            let cert = Certificate::from_pem(&pem).map_err(|err| {
                ClientError::config(format!("cannot parse CA bundle {}: {err}", path.display()))
            })?;
            builder = builder.add_root_certificate(cert);
            debug!(host = %config.host, "transport verifies server certificate");
        } else {
            builder = builder.danger_accept_invalid_certs(true);
            debug!(host = %config.host, "transport skips certificate verification");
        }

        let http = builder
            .build()
            .map_err(|err| ClientError::config(format!("cannot build HTTP client: {err}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

/// Pull the `status.code` / `status.message` pair out of a parsed error
/// body, falling back to the HTTP status and raw text.
fn remote_status(parsed: Option<&Value>, http_status: u16, raw: &str) -> (i32, String) {
    let code = parsed
        .and_then(|value| value.pointer("/status/code"))
        .and_then(Value::as_i64)
        .map(|code| code as i32)
        .unwrap_or(i32::from(http_status));
    let message = parsed
        .and_then(|value| value.pointer("/status/message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| raw.trim().to_string());
    (code, message)
}

#[async_trait]
impl CommandExecutor for RestTransport {
    async fn execute(
        &self,
        method: HttpVerb,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiReply, ClientError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!(%method, path, "executing request");

        let mut request = match method {
            HttpVerb::Get => self.http.get(&url),
            HttpVerb::Post => self.http.post(&url),
            HttpVerb::Put => self.http.put(&url),
            HttpVerb::Delete => self.http.delete(&url),
        }
        .basic_auth(&self.username, Some(&self.password));

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(%method, path, "authentication rejected");
            return Err(ClientError::Unauthenticated {
                method,
                path: path.to_string(),
            });
        }

        let http_status = status.as_u16();
        let raw = response.text().await?;
        let parsed: Option<Value> = if raw.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&raw).ok()
        };

        if !classify(http_status).is_success() {
            let (code, message) = remote_status(parsed.as_ref(), http_status, &raw);
            let signatures = ErrorSignature::scan(&message);
            warn!(%method, path, http_status, message, "remote call failed");
            return Err(ClientError::Remote {
                http_status,
                code,
                message,
                signatures,
            });
        }

        let body = match parsed {
            Some(value) => value,
            None if raw.trim().is_empty() => Value::Null,
            None => {
                return Err(ClientError::protocol(format!(
                    "undecodable response body from {method} {path}"
                )))
            }
        };

        Ok(ApiReply { http_status, body })
    }
}
