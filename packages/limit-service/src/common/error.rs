//! Typed service errors.
//!
//! Every failure raised by the dispatcher, domain service, repository, or
//! user directory is one of these variants, carrying a stable code, an
//! HTTP-equivalent status, a retryable hint, and a catastrophic flag for the
//! outer process-level handler. Stream transport errors never reach this
//! type: the stream adapter absorbs them at its own boundary.

use std::error::Error as StdError;

use thiserror::Error;
use tracing::error;

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Unknown stream event type: a producer/consumer version mismatch,
    /// not a transient fault.
    #[error("unknown event type {event_type}")]
    UnknownEventType { event_type: String },

    /// Client-caused, recoverable by the caller.
    #[error("{message}")]
    Validation { code: &'static str, message: String },

    /// Unknown owner or unknown entity id.
    #[error("{message}")]
    NotFound {
        code: &'static str,
        message: String,
        status: u16,
    },

    /// Directory or storage call failed for reasons unrelated to the
    /// payload's validity.
    #[error("{message}")]
    Upstream {
        code: &'static str,
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// The process should consider itself in a bad state.
    #[error("{message}")]
    Internal { code: &'static str, message: String },
}

impl ServiceError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
            status: 404,
        }
    }

    /// Not-found carrying the upstream status it was observed with.
    pub fn not_found_with_status(
        code: &'static str,
        message: impl Into<String>,
        status: u16,
    ) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
            status,
        }
    }

    pub fn upstream(code: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn upstream_with_source(
        code: &'static str,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Upstream {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::Internal {
            code,
            message: message.into(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &str {
        match self {
            Self::UnknownEventType { .. } => "unknown-event-type",
            Self::Validation { code, .. }
            | Self::NotFound { code, .. }
            | Self::Upstream { code, .. }
            | Self::Internal { code, .. } => code,
        }
    }

    /// HTTP-equivalent status for API-facing callers.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UnknownEventType { .. } => 500,
            Self::Validation { .. } => 400,
            Self::NotFound { status, .. } => *status,
            Self::Upstream { .. } => 503,
            Self::Internal { .. } => 500,
        }
    }

    /// Whether retrying the same input could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    /// Whether the process should consider itself in a bad state.
    pub fn is_catastrophic(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Central error reporter: all absorbed errors funnel through here so they
/// get logged with the same structured shape.
pub fn report(error: &ServiceError) {
    error!(
        code = error.code(),
        status = error.http_status(),
        retryable = error.is_retryable(),
        catastrophic = error.is_catastrophic(),
        error = %error,
        "service error"
    );
}
