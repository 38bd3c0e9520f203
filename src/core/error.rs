//! Typed error handling for the shiftdesk client
//!
//! Every failure a view can hit is expressed as a [`ClientError`] so callers
//! can branch on the category instead of inspecting strings.
//!
//! # Error Categories
//!
//! - [`TransportError`]: the request never produced an HTTP response
//! - [`ApiError`]: the scheduling API answered with a non-success status
//! - [`ValidationError`]: client-side checks that block a submission
//! - [`ConfigError`]: invalid client configuration
//! - [`SessionError`]: token storage failures
//!
//! Nothing here is fatal to a view. [`ClientError::user_message`] yields the
//! text a page shows in its alert.
//!
//! # Example
//!
//! ```rust,ignore
//! match view.confirm(shift_id).await {
//!     Ok(()) => {}
//!     Err(ClientError::Api(ApiError::Rejected { message, .. })) => alert(&message),
//!     Err(e) => alert(&e.user_message()),
//! }
//! ```

use reqwest::StatusCode;
use serde::Serialize;
use std::fmt;

use crate::core::session::SessionError;

/// Result alias used across the client and views
pub type ClientResult<T> = Result<T, ClientError>;

/// The main error type for shiftdesk
#[derive(Debug)]
pub enum ClientError {
    /// Network or decoding failure
    Transport(TransportError),

    /// Non-success answer from the scheduling API
    Api(ApiError),

    /// Client-side validation failure
    Validation(ValidationError),

    /// Configuration errors
    Config(ConfigError),

    /// Token storage errors
    Session(SessionError),

    /// The same operation is already in flight
    Busy { operation: String },

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "{}", e),
            ClientError::Api(e) => write!(f, "{}", e),
            ClientError::Validation(e) => write!(f, "{}", e),
            ClientError::Config(e) => write!(f, "{}", e),
            ClientError::Session(e) => write!(f, "{}", e),
            ClientError::Busy { operation } => {
                write!(f, "Operation '{}' is already in progress", operation)
            }
            ClientError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(e) => Some(e),
            ClientError::Api(e) => Some(e),
            ClientError::Validation(e) => Some(e),
            ClientError::Config(e) => Some(e),
            ClientError::Session(e) => Some(e),
            ClientError::Busy { .. } | ClientError::Internal(_) => None,
        }
    }
}

impl ClientError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Api(e) => e.error_code(),
            ClientError::Validation(e) => e.error_code(),
            ClientError::Config(_) => "CONFIG_ERROR",
            ClientError::Session(_) => "SESSION_ERROR",
            ClientError::Busy { .. } => "BUSY",
            ClientError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the page can keep running after surfacing this error.
    ///
    /// Only a broken configuration prevents the client from being built.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ClientError::Config(_))
    }

    /// Text suitable for an alert or inline banner
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(e) => format!(
                "Could not reach the server while trying to {}. Please try again.",
                e.operation
            ),
            ClientError::Api(ApiError::Rejected { message, .. }) => message.clone(),
            ClientError::Api(ApiError::Unauthorized { .. }) => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ClientError::Validation(e) => e.to_string(),
            ClientError::Busy { .. } => "Please wait for the current request to finish.".to_string(),
            other => other.to_string(),
        }
    }

    /// HTTP status reported by the API, if the error came from one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api(e) => Some(e.status()),
            _ => None,
        }
    }
}

// =============================================================================
// Transport Errors
// =============================================================================

/// The request failed before a usable response was received
#[derive(Debug)]
pub struct TransportError {
    /// Human readable name of the operation ("load employees", ...)
    pub operation: String,
    pub message: String,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to {}: {}", self.operation, self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        ClientError::Transport(err)
    }
}

// =============================================================================
// API Errors
// =============================================================================

/// Non-success responses from the scheduling API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Business-rule rejection or any other non-2xx status
    Rejected {
        operation: String,
        status: u16,
        message: String,
    },

    /// Missing or expired credentials
    Unauthorized { operation: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Rejected {
                operation,
                status,
                message,
            } => write!(f, "Server rejected {} ({}): {}", operation, status, message),
            ApiError::Unauthorized { operation } => {
                write!(f, "Not authorized to {}", operation)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Rejected { status: 404, .. } => "NOT_FOUND",
            ApiError::Rejected { status: 409, .. } => "CONFLICT",
            ApiError::Rejected { .. } => "API_REJECTED",
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
        }
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        ClientError::Api(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised before a request is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Bulk entry contains the same email more than once
    DuplicateEmails { emails: Vec<String> },

    /// A form is missing one of its mandatory inputs
    MissingFields { message: String },

    /// Range export needs both ends of the range
    MissingDateRange,

    /// The action is not offered for the record in its current state
    ActionUnavailable { action: String, reason: String },

    /// The record is not part of the loaded list
    UnknownRecord { resource: String, id: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::DuplicateEmails { emails } => write!(
                f,
                "Duplicate emails found. Please ensure all emails are unique: {}",
                emails.join(", ")
            ),
            ValidationError::MissingFields { message } => write!(f, "{}", message),
            ValidationError::MissingDateRange => {
                write!(f, "Please select both from and to dates for export.")
            }
            ValidationError::ActionUnavailable { action, reason } => {
                write!(f, "Cannot {}: {}", action, reason)
            }
            ValidationError::UnknownRecord { resource, id } => {
                write!(f, "{} with id '{}' is not loaded", resource, id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::DuplicateEmails { .. } => "DUPLICATE_EMAILS",
            ValidationError::MissingFields { .. } => "MISSING_FIELDS",
            ValidationError::MissingDateRange => "MISSING_DATE_RANGE",
            ValidationError::ActionUnavailable { .. } => "ACTION_UNAVAILABLE",
            ValidationError::UnknownRecord { .. } => "UNKNOWN_RECORD",
        }
    }

    /// Field errors keyed by field name, empty for batch-level errors
    pub fn field_errors(&self) -> &[FieldValidationError] {
        match self {
            ValidationError::FieldErrors(errors) => errors,
            _ => &[],
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    FieldValidationError::new(field.clone(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ClientError::Validation(errors.into())
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        ClientError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<SessionError> for ClientError {
    fn from(err: SessionError) -> Self {
        ClientError::Session(err)
    }
}
