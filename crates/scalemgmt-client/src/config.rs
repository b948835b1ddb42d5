//! Client configuration: GUI endpoint, credentials, TLS mode, poll timing.
//!
//! Constructible directly, from environment variables, or from a TOML file.
//! TLS verification is on only when `secure_ssl` is set together with a CA
//! bundle; otherwise certificate verification is skipped, matching how the
//! GUI is deployed with self-signed certificates.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::errors::ClientError;
use crate::poller::PollPolicy;

fn default_port() -> u16 {
    443
}

fn default_protocol() -> String {
    "https".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_poll_initial_secs() -> u64 {
    2
}

fn default_poll_cap_secs() -> u64 {
    16
}

/// Poll-loop timing as it appears in configuration files.
#[derive(Debug, Clone, Deserialize)]
pub struct PollSettings {
    #[serde(default = "default_poll_initial_secs")]
    pub initial_secs: u64,
    #[serde(default = "default_poll_cap_secs")]
    pub cap_secs: u64,
    /// Overall poll deadline. Absent means poll until terminal.
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            initial_secs: default_poll_initial_secs(),
            cap_secs: default_poll_cap_secs(),
            deadline_secs: None,
        }
    }
}

impl PollSettings {
    /// Convert to the poller's policy type.
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            initial: Duration::from_secs(self.initial_secs),
            cap: Duration::from_secs(self.cap_secs),
            deadline: self.deadline_secs.map(Duration::from_secs),
        }
    }
}

/// Connection settings for one GUI endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GuiConfig {
    /// GUI hostname or address.
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    pub username: String,
    pub password: String,
    /// Verify the server certificate against `ca_cert`.
    #[serde(default)]
    pub secure_ssl: bool,
    /// PEM bundle used when `secure_ssl` is set.
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub poll: PollSettings,
}

impl GuiConfig {
    /// Base URL of the GUI, with trailing slash.
    pub fn endpoint(&self) -> String {
        format!("{}://{}:{}/", self.protocol, self.host, self.port)
    }

    /// Per-request timeout for the HTTP client.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The poll policy derived from this configuration.
    pub fn poll_policy(&self) -> PollPolicy {
        self.poll.policy()
    }

    /// Load from `SCALE_GUI_*` environment variables.
    ///
    /// `SCALE_GUI_HOST`, `SCALE_GUI_USER` and `SCALE_GUI_PASSWORD` are
    /// required; `SCALE_GUI_PORT`, `SCALE_GUI_SECURE_SSL` and
    /// `SCALE_GUI_CA_CERT` are optional.
    pub fn from_env() -> Result<Self, ClientError> {
        let required = |key: &str| {
            std::env::var(key)
                .map_err(|_| ClientError::config(format!("{key} is not set")))
        };

        let port = match std::env::var("SCALE_GUI_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ClientError::config(format!("invalid SCALE_GUI_PORT '{raw}'")))?,
            Err(_) => default_port(),
        };

        let secure_ssl = std::env::var("SCALE_GUI_SECURE_SSL")
            .map(|raw| matches!(raw.as_str(), "1" | "true" | "TRUE" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            host: required("SCALE_GUI_HOST")?,
            port,
            protocol: default_protocol(),
            username: required("SCALE_GUI_USER")?,
            password: required("SCALE_GUI_PASSWORD")?,
            secure_ssl,
            ca_cert: std::env::var("SCALE_GUI_CA_CERT").ok().map(PathBuf::from),
            request_timeout_secs: default_request_timeout_secs(),
            poll: PollSettings::default(),
        })
    }

    /// Load from a TOML file.
    pub fn from_toml_path(path: &Path) -> Result<Self, ClientError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ClientError::config(format!("cannot read {}: {err}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|err| {
            ClientError::config(format!("cannot parse {}: {err}", path.display()))
        })
    }
}
