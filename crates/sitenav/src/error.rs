//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use sitenav_config::ConfigError;
use sitenav_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to directory at {url}")]
    #[diagnostic(
        code(sitenav::connection_failed),
        help(
            "Check that the directory server is running and reachable.\n\
             URL: {url}\n\
             Use --insecure (-k) for self-signed certificates."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(sitenav::auth_failed),
        help(
            "Verify the API token for this profile.\n\
             Run: sitenav config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No API token configured for admin profile '{profile}'")]
    #[diagnostic(
        code(sitenav::no_credentials),
        help(
            "Moderation requires a token. Store one with: sitenav config set-token\n\
             Or set the SITENAV_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("Moderation requires an admin profile")]
    #[diagnostic(
        code(sitenav::admin_required),
        help("Pass --admin with a token, or set `admin = true` on the profile.")
    )]
    AdminRequired,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(sitenav::not_found),
        help("Run: sitenav {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Submission ───────────────────────────────────────────────────
    #[error("{title}: {description}")]
    #[diagnostic(code(sitenav::submission))]
    Submission { title: String, description: String },

    #[error("A submission is already in progress")]
    #[diagnostic(code(sitenav::busy))]
    Busy,

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(sitenav::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sitenav::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sitenav::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sitenav config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No directory server configured")]
    #[diagnostic(
        code(sitenav::no_config),
        help(
            "Create a profile with: sitenav config init\n\
             Or pass --server (SITENAV_SERVER).\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(sitenav::config))]
    Config(Box<ConfigError>),

    #[error("Like store unavailable: {message}")]
    #[diagnostic(
        code(sitenav::storage),
        help("Check permissions on the data directory.")
    )]
    Storage { message: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(sitenav::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Request timed out")]
    #[diagnostic(
        code(sitenav::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    TimedOut,

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::AdminRequired => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Busy => exit_code::CONFLICT,
            Self::Timeout { .. } | Self::TimedOut => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::TimedOut => CliError::TimedOut,

            CoreError::NotFound { identifier } => CliError::NotFound {
                resource_type: "website".into(),
                identifier,
                list_command: "sites list".into(),
            },

            CoreError::Invalid { errors } => CliError::Validation {
                field: "submission".into(),
                reason: errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            },

            err @ (CoreError::CategoriesUnavailable { .. }
            | CoreError::MetadataUnavailable { .. }
            | CoreError::CategoryRequired
            | CoreError::SubmissionsDisabled
            | CoreError::SubmissionFailed { .. }) => {
                let toast = err.toast();
                CliError::Submission {
                    title: toast.title,
                    description: toast.description,
                }
            }

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Storage { message } => CliError::Storage { message },

            CoreError::Internal(message) => CliError::ApiError {
                message,
                status: None,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_timeout_keeps_timeout_exit_code() {
        let err = CliError::from(CoreError::TimedOut);
        assert!(matches!(err, CliError::TimedOut));
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
        assert_eq!(err.to_string(), "Request timed out");
    }
}
