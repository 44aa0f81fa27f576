// ── Core error types ──
//
// User-facing errors from sitenav-core. Consumers never see raw HTTP
// plumbing; `From<sitenav_api::Error>` translates transport failures into
// domain variants, and `CoreError::toast` turns any of them into the
// notification the front-ends display.

use thiserror::Error;

use crate::form::FieldError;
use crate::notify::Toast;

/// Fallback text when the backend rejects a submission with an empty body.
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Failed to submit website";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach directory at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Timed out with no configured limit to report.
    #[error("Request timed out")]
    TimedOut,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Could not load categories: {reason}")]
    CategoriesUnavailable { reason: String },

    #[error("Could not fetch page metadata: {reason}")]
    MetadataUnavailable { reason: String },

    // ── Submission errors ────────────────────────────────────────────
    #[error("Category must be selected")]
    CategoryRequired,

    #[error("Validation failed: {}", summarize(.errors))]
    Invalid { errors: Vec<FieldError> },

    #[error("Website submissions are temporarily disabled")]
    SubmissionsDisabled,

    #[error("{message}")]
    SubmissionFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration & storage ──────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Like store error: {message}")]
    Storage { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CoreError {
    /// The notification a front-end shows for this failure.
    pub fn toast(&self) -> Toast {
        match self {
            Self::CategoriesUnavailable { .. } => {
                Toast::error("Failed to load categories", "Please refresh and try again")
            }
            Self::MetadataUnavailable { .. } => Toast::error(
                "Failed to fetch metadata",
                "Please fill in the website details manually",
            ),
            Self::CategoryRequired => {
                Toast::error("Please select a category", "Website category cannot be empty")
            }
            Self::SubmissionsDisabled => {
                Toast::error("Error", "Website submissions are temporarily disabled")
            }
            Self::SubmissionFailed { message } => Toast::error("Error", message.clone()),
            other => Toast::error("Error", other.to_string()),
        }
    }

    /// Whether retrying the same operation could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::Timeout { .. }
                | Self::TimedOut
                | Self::CategoriesUnavailable { .. }
                | Self::MetadataUnavailable { .. }
        ) || matches!(self, Self::Api { status: Some(s), .. } if *s >= 500)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sitenav_api::Error> for CoreError {
    fn from(err: sitenav_api::Error) -> Self {
        match err {
            sitenav_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            sitenav_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::TimedOut
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            sitenav_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sitenav_api::Error::Timeout { timeout_secs: 0 } => CoreError::TimedOut,
            sitenav_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            sitenav_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            sitenav_api::Error::Api { status: 404, message } => CoreError::NotFound {
                identifier: message,
            },
            sitenav_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            sitenav_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
