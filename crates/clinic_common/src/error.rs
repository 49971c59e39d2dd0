// --- File: crates/clinic_common/src/error.rs ---
use clinic_slots::{SlotError, SlotRejection};
use std::fmt;
use thiserror::Error;

/// Shown when the backend could not be reached at all.
pub const NO_RESPONSE: &str = "Servidor no respondió. Verifica tu conexión.";

/// The base error type for all clinic client errors.
///
/// Each crate converts its own failures into one of these categories so the
/// front end can decide how to surface them.
#[derive(Error, Debug)]
pub enum ClinicError {
    /// Error occurred while sending an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The session is missing, expired or rejected by the backend
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The session lacks the role the operation needs
    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    /// Input rejected before anything was sent
    #[error("{0}")]
    ValidationError(String),

    /// The backend answered with a non-success status
    #[error("Error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Timeout: {0}")]
    TimeoutError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// A view could not load its data; the message is already user-facing
    #[error("{0}")]
    LoadError(String),
}

impl ClinicError {
    /// Whether the failure means the session is no longer usable.
    pub fn is_auth(&self) -> bool {
        matches!(self, ClinicError::AuthError(_))
    }

    /// The text shown to the user for this error.
    ///
    /// Messages that came from the backend or from form validation are
    /// already user-facing and are returned without the category prefix.
    pub fn user_message(&self) -> String {
        match self {
            ClinicError::ValidationError(message)
            | ClinicError::NotFoundError(message)
            | ClinicError::AuthError(message)
            | ClinicError::ForbiddenError(message)
            | ClinicError::ConflictError(message)
            | ClinicError::LoadError(message) => message.clone(),
            ClinicError::HttpError(_) | ClinicError::TimeoutError(_) => NO_RESPONSE.to_string(),
            other => other.to_string(),
        }
    }
}

/// A trait for mapping errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for ClinicError {
    fn status_code(&self) -> u16 {
        match self {
            ClinicError::HttpError(_) => 502,
            ClinicError::ParseError(_) => 400,
            ClinicError::ConfigError(_) => 500,
            ClinicError::AuthError(_) => 401,
            ClinicError::ForbiddenError(_) => 403,
            ClinicError::ValidationError(_) => 400,
            ClinicError::ApiError { status, .. } => *status,
            ClinicError::ConflictError(_) => 409,
            ClinicError::NotFoundError(_) => 404,
            ClinicError::TimeoutError(_) => 504,
            ClinicError::InternalError(_) => 500,
            ClinicError::LoadError(_) => 502,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, ClinicError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, ClinicError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, ClinicError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| ClinicError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, ClinicError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| ClinicError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for ClinicError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClinicError::TimeoutError(err.to_string())
        } else if err.is_decode() {
            ClinicError::ParseError(err.to_string())
        } else {
            ClinicError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClinicError {
    fn from(err: serde_json::Error) -> Self {
        ClinicError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for ClinicError {
    fn from(err: std::io::Error) -> Self {
        ClinicError::InternalError(err.to_string())
    }
}

impl From<SlotRejection> for ClinicError {
    fn from(err: SlotRejection) -> Self {
        ClinicError::ValidationError(err.to_string())
    }
}

impl From<SlotError> for ClinicError {
    fn from(err: SlotError) -> Self {
        ClinicError::ValidationError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> ClinicError {
    ClinicError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> ClinicError {
    ClinicError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> ClinicError {
    ClinicError::NotFoundError(message.to_string())
}

pub fn auth_error<T: fmt::Display>(message: T) -> ClinicError {
    ClinicError::AuthError(message.to_string())
}

pub fn forbidden<T: fmt::Display>(message: T) -> ClinicError {
    ClinicError::ForbiddenError(message.to_string())
}

pub fn internal_error<T: fmt::Display>(message: T) -> ClinicError {
    ClinicError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_slots::TimeSlot;

    #[test]
    fn test_status_codes() {
        assert_eq!(auth_error("expired").status_code(), 401);
        assert_eq!(forbidden("admin only").status_code(), 403);
        assert_eq!(
            ClinicError::ApiError {
                status: 422,
                message: "bad".to_string()
            }
            .status_code(),
            422
        );
    }

    #[test]
    fn test_slot_rejection_becomes_validation_message() {
        let err: ClinicError = SlotRejection::OutsideBusinessHours {
            opens: TimeSlot::new(8, 0).unwrap(),
            closes: TimeSlot::new(20, 0).unwrap(),
        }
        .into();
        assert_eq!(
            err.user_message(),
            "El horario de atención es de Lunes a Viernes de 08:00 a 20:00"
        );
        assert!(!err.is_auth());
    }

    #[test]
    fn test_api_error_message() {
        let err = ClinicError::ApiError {
            status: 409,
            message: "Horario ocupado".to_string(),
        };
        assert_eq!(err.user_message(), "Error 409: Horario ocupado");
    }

    #[test]
    fn test_unreachable_backend_message() {
        let err = ClinicError::TimeoutError("operation timed out".to_string());
        assert_eq!(err.user_message(), NO_RESPONSE);
        assert_eq!(err.status_code(), 504);
    }

    #[test]
    fn test_context_wraps_source() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = result.context("reading session").unwrap_err();
        assert_eq!(err.to_string(), "Internal error: reading session: missing");
    }
}
