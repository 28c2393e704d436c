//! Error types for the Agenthub core library.
//!
//! Every fallible operation in the stores, the HTTP client and the stream
//! reader returns a [`HubError`]. Errors are converted to message strings and
//! stored in per-operation error fields by the stores; nothing is retried
//! automatically.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E2001-E2099 | Config | Config file, environment and validation errors |
//! | E3001-E3099 | Agent | Agent and chat lookup and mutation errors |
//! | E4001-E4099 | Task | Task lookup and lifecycle errors |
//! | E5001-E5099 | Network | Transport, HTTP status, timeout errors |
//! | E6001-E6099 | Stream | Frame parsing and stream lifecycle errors |
//! | E9001-E9099 | General | Validation, IO, serialization and internal errors |

use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// Context information for error tracking and debugging.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub file: &'static str,
    pub line: u32,
    pub operation: Option<String>,
}

impl ErrorContext {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self {
            file,
            line,
            operation: None,
        }
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if let Some(ref op) = self.operation {
            write!(f, " ({})", op)?;
        }
        Ok(())
    }
}

/// Macro to create an ErrorContext at the current source location.
#[macro_export]
macro_rules! error_context {
    () => {
        $crate::error::ErrorContext::new(file!(), line!())
    };
    ($op:expr) => {
        $crate::error::ErrorContext::new(file!(), line!()).with_operation($op)
    };
}

/// The main error type for the Agenthub core library.
#[derive(Debug, Error)]
pub enum HubError {
    // ========================================================================
    // Configuration Errors (E2001-E2099)
    // ========================================================================
    /// Configuration file parse error
    #[error("[E2001] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// Invalid configuration value
    #[error("[E2002] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    /// Preference file could not be read or written
    #[error("[E2003] Preference store error at {path}: {message}")]
    PreferenceStore { path: String, message: String },

    // ========================================================================
    // Agent Errors (E3001-E3099)
    // ========================================================================
    /// Agent not found in the in-memory list
    #[error("[E3001] Agent not found: {0}")]
    AgentNotFound(String),

    /// Agent is fixed and cannot be removed
    #[error("[E3003] Agent '{0}' is fixed and cannot be deleted")]
    AgentFixed(String),

    // ========================================================================
    // Task Errors (E4001-E4099)
    // ========================================================================
    /// Task not found locally or on the server
    #[error("[E4001] Task not found: {0}")]
    TaskNotFound(String),

    // ========================================================================
    // Network Errors (E5001-E5099)
    // ========================================================================
    /// Transport-level request failure
    #[error("[E5001] Request failed: {0}")]
    RequestFailed(String),

    /// Server answered with a non-success status
    #[error("[E5002] HTTP error! status: {status}")]
    HttpStatus { status: u16, body: String },

    /// API response body did not match the expected shape
    #[error("[E5003] Failed to parse API response: {0}")]
    ResponseParseError(String),

    /// Server could not be reached
    #[error("[E5004] Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request timed out
    #[error("[E5005] Request timed out after {0} seconds")]
    Timeout(u64),

    // ========================================================================
    // Stream Errors (E6001-E6099)
    // ========================================================================
    /// A single stream frame could not be parsed
    #[error("[E6001] Malformed stream frame: {0}")]
    FrameParseError(String),

    /// Reading the response body failed mid-stream
    #[error("[E6002] Stream read failed: {0}")]
    StreamReadFailed(String),

    /// Stream was cancelled or replaced by a newer stream for the same task
    #[error("[E6003] Stream for task '{0}' was cancelled")]
    StreamCancelled(String),

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    /// Internal error (catch-all for unexpected conditions)
    #[error("[E9001] Internal error: {0}")]
    Internal(String),

    /// Form or input validation error
    #[error("[E9002] Validation error: {0}")]
    ValidationError(String),

    /// IO error
    #[error("[E9003] IO error: {0}")]
    IoError(String),

    /// Serialization/deserialization error
    #[error("[E9004] Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for Agenthub operations.
pub type HubResult<T> = Result<T, HubError>;

// ============================================================================
// From trait implementations for seamless error propagation
// ============================================================================

impl From<reqwest::Error> for HubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HubError::Timeout(30)
        } else if err.is_connect() {
            HubError::ServiceUnavailable(err.to_string())
        } else if err.is_status() {
            match err.status() {
                Some(status) => HubError::HttpStatus {
                    status: status.as_u16(),
                    body: String::new(),
                },
                None => HubError::RequestFailed(err.to_string()),
            }
        } else if err.is_decode() {
            HubError::ResponseParseError(err.to_string())
        } else {
            HubError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HubError {
    fn from(err: serde_json::Error) -> Self {
        HubError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for HubError {
    fn from(err: std::io::Error) -> Self {
        HubError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for HubError {
    fn from(err: toml::de::Error) -> Self {
        HubError::SerializationError(err.to_string())
    }
}

impl From<toml::ser::Error> for HubError {
    fn from(err: toml::ser::Error) -> Self {
        HubError::SerializationError(err.to_string())
    }
}

impl From<config::ConfigError> for HubError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => HubError::InvalidConfigValue {
                key,
                message: "Key not found".to_string(),
            },
            config::ConfigError::FileParse { uri, cause } => HubError::ConfigParseError(format!(
                "Failed to parse {}: {}",
                uri.unwrap_or_default(),
                cause
            )),
            config::ConfigError::Type {
                origin,
                unexpected,
                expected,
                key,
            } => HubError::InvalidConfigValue {
                key: key.unwrap_or_else(|| origin.map(|o| o.to_string()).unwrap_or_default()),
                message: format!("Expected {}, got {}", expected, unexpected),
            },
            _ => HubError::ConfigParseError(err.to_string()),
        }
    }
}

impl From<crate::config::ConfigLoadError> for HubError {
    fn from(err: crate::config::ConfigLoadError) -> Self {
        match err {
            crate::config::ConfigLoadError::Config(e) => e.into(),
            crate::config::ConfigLoadError::MissingRequired(key) => HubError::InvalidConfigValue {
                key,
                message: "Missing required value".to_string(),
            },
            crate::config::ConfigLoadError::InvalidValue { key, message } => {
                HubError::InvalidConfigValue { key, message }
            }
            crate::config::ConfigLoadError::Io(e) => e.into(),
        }
    }
}

impl From<crate::forms::FormError> for HubError {
    fn from(err: crate::forms::FormError) -> Self {
        HubError::ValidationError(err.to_string())
    }
}

// ============================================================================
// Error categorization helpers
// ============================================================================

impl HubError {
    /// Build an HTTP status error from a status code and response body.
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        HubError::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Returns true for transport failures and non-success HTTP statuses.
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            HubError::RequestFailed(_)
                | HubError::HttpStatus { .. }
                | HubError::ServiceUnavailable(_)
                | HubError::Timeout(_)
                | HubError::StreamReadFailed(_)
        )
    }

    /// Returns true for malformed payloads, either whole responses or frames.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            HubError::ResponseParseError(_)
                | HubError::FrameParseError(_)
                | HubError::SerializationError(_)
        )
    }

    /// Returns true when the operation referenced an id that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            HubError::AgentNotFound(_)
                | HubError::TaskNotFound(_)
                | HubError::HttpStatus { status: 404, .. }
        )
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            HubError::ConfigParseError(_)
                | HubError::InvalidConfigValue { .. }
                | HubError::PreferenceStore { .. }
        )
    }

    /// Returns true if a later manual attempt might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            HubError::ServiceUnavailable(_)
                | HubError::Timeout(_)
                | HubError::StreamReadFailed(_)
                | HubError::HttpStatus {
                    status: 502..=504,
                    ..
                }
        )
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            HubError::ConfigParseError(_) => "E2001",
            HubError::InvalidConfigValue { .. } => "E2002",
            HubError::PreferenceStore { .. } => "E2003",
            HubError::AgentNotFound(_) => "E3001",
            HubError::AgentFixed(_) => "E3003",
            HubError::TaskNotFound(_) => "E4001",
            HubError::RequestFailed(_) => "E5001",
            HubError::HttpStatus { .. } => "E5002",
            HubError::ResponseParseError(_) => "E5003",
            HubError::ServiceUnavailable(_) => "E5004",
            HubError::Timeout(_) => "E5005",
            HubError::FrameParseError(_) => "E6001",
            HubError::StreamReadFailed(_) => "E6002",
            HubError::StreamCancelled(_) => "E6003",
            HubError::Internal(_) => "E9001",
            HubError::ValidationError(_) => "E9002",
            HubError::IoError(_) => "E9003",
            HubError::SerializationError(_) => "E9004",
        }
    }

    /// Returns a user-friendly suggestion for how to resolve this error.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            HubError::ServiceUnavailable(_) => {
                Some("Check that the hub backend is running and AGENTHUB_API_BASE_URL is correct")
            }
            HubError::Timeout(_) => Some("Increase api.request_timeout_secs or try again"),
            HubError::TaskNotFound(_) => Some("Run 'agenthub tasks list' to see known tasks"),
            HubError::AgentNotFound(_) => Some("Run 'agenthub agents list' to see known agents"),
            HubError::AgentFixed(_) => Some("Fixed agents are system agents and stay registered"),
            HubError::ConfigParseError(_) | HubError::InvalidConfigValue { .. } => {
                Some("Check agenthub.toml and AGENTHUB_* environment variables")
            }
            HubError::HttpStatus { status: 500, .. } => {
                Some("The backend failed internally; check its logs")
            }
            _ => None,
        }
    }

    /// Message string stored in per-operation error fields.
    pub fn display_message(&self) -> String {
        match self {
            HubError::HttpStatus { status, .. } => format!("HTTP error! status: {}", status),
            other => other.to_string(),
        }
    }

    /// Log this error with appropriate severity level.
    pub fn log(&self) {
        let code = self.error_code();
        let suggestion = self.user_suggestion();

        if self.is_transient() {
            warn!(
                error_code = %code,
                suggestion = suggestion,
                "Transient error occurred: {}",
                self
            );
        } else {
            error!(
                error_code = %code,
                suggestion = suggestion,
                "Error occurred: {}",
                self
            );
        }
    }

    /// Log this error with context information.
    pub fn log_with_context(&self, context: &ErrorContext) {
        let code = self.error_code();

        if self.is_transient() {
            warn!(error_code = %code, location = %context, "Transient error at {}: {}", context, self);
        } else {
            error!(error_code = %code, location = %context, "Error at {}: {}", context, self);
        }
    }
}

// ============================================================================
// User-friendly error formatting for CLI
// ============================================================================

/// Format an error for CLI display with suggestions.
pub struct CliErrorDisplay<'a> {
    error: &'a HubError,
    show_suggestion: bool,
}

impl<'a> CliErrorDisplay<'a> {
    pub fn new(error: &'a HubError) -> Self {
        Self {
            error,
            show_suggestion: true,
        }
    }

    pub fn without_suggestion(mut self) -> Self {
        self.show_suggestion = false;
        self
    }
}

impl<'a> fmt::Display for CliErrorDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.error)?;

        if let HubError::HttpStatus { body, .. } = self.error {
            if !body.is_empty() {
                writeln!(f, "  Response: {}", body)?;
            }
        }

        if self.show_suggestion {
            if let Some(suggestion) = self.error.user_suggestion() {
                writeln!(f)?;
                writeln!(f, "  Suggestion: {}", suggestion)?;
            }
        }

        if self.error.is_transient() {
            writeln!(f)?;
            writeln!(f, "  This error may be temporary. Try again shortly.")?;
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
