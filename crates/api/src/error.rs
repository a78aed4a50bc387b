//! The JSON error boundary.
//!
//! Handlers return `Result<_, ApiError>`; every error reaching the client
//! goes through the `IntoResponse` impl below.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use balanco_core::invoice::InvoiceError;
use balanco_core::ledger::LedgerError;
use balanco_core::profile::ProfileError;
use balanco_core::recurrence::UnknownFrequency;
use balanco_core::reports::ReportError;
use balanco_db::RepositoryError;
use balanco_shared::{AppError, JwtError};
use serde::Serialize;

use crate::payments::PaymentError;

/// Error returned by handlers and middleware.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Message safe to show to users.
    pub error: String,
    /// Machine-readable code.
    pub code: &'static str,
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 400 with `message`.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 401 with `message`.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// 500; `detail` is logged, never shown.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self(AppError::Internal(detail.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_server_error() {
            tracing::error!(error = %self.0, code = self.0.error_code(), "request failed");
        } else {
            tracing::debug!(error = %self.0, code = self.0.error_code(), "request rejected");
        }

        let body = ErrorBody {
            error: self.0.public_message(),
            code: self.0.error_code(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self(match err {
            RepositoryError::NotFound(msg) => AppError::NotFound(msg),
            RepositoryError::Forbidden(msg) => AppError::Forbidden(msg),
            RepositoryError::Conflict(msg) => AppError::Conflict(msg),
            RepositoryError::Validation(msg) => AppError::Validation(msg),
            RepositoryError::Database(e) => AppError::Database(e.to_string()),
        })
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        let message = match err {
            JwtError::Expired => "Sessão expirada. Faça login novamente.",
            JwtError::Invalid | JwtError::DecodingError(_) | JwtError::EncodingError(_) => {
                "Token de autenticação inválido."
            }
        };
        Self::unauthorized(message)
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self(AppError::ExternalService(err.to_string()))
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<InvoiceError> for ApiError {
    fn from(err: InvoiceError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<UnknownFrequency> for ApiError {
    fn from(err: UnknownFrequency) -> Self {
        Self::validation(format!(
            "Frequência inválida: {}. Use weekly, monthly ou yearly.",
            err.0
        ))
    }
}
