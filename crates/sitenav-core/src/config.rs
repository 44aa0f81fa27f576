// ── Runtime connection configuration ──
//
// Describes how to reach a directory backend and who is using it.
// The CLI/TUI builds a `DirectoryConfig` from a profile; core never
// reads config files.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use sitenav_api::transport::{TlsMode, TransportConfig};

use crate::model::Role;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for talking to one directory backend.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Server URL (e.g., `https://dir.example.com`).
    pub url: Url,
    /// Bearer token, required for admin deployments.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    pub role: Role,
    /// Profile override for the submissions switch. `None` asks the backend.
    pub allow_submissions: Option<bool>,
}

impl DirectoryConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            role: Role::User,
            allow_submissions: None,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
