use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::response::ErrorResponse;
use thiserror::Error;

use crate::ledger::LedgerError;

/// HTTP 层错误
///
/// | 变体 | 状态码 |
/// |------|--------|
/// | InvalidInput | 400 |
/// | InvalidSlot | 400 |
/// | NotFound | 404 |
/// | Conflict | 409 |
/// | Internal | 500 |
#[derive(Error, Debug)]
pub enum ServerError {
    /// 缺少或格式错误的字段
    #[error("{0}")]
    InvalidInput(String),

    /// 日期或时段不存在
    #[error("{0}")]
    InvalidSlot(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

impl From<LedgerError> for ServerError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InvalidInput(msg) => ServerError::InvalidInput(msg),
            LedgerError::SlotNotFound => ServerError::InvalidSlot(e.to_string()),
            LedgerError::ReservationNotFound(_) => ServerError::NotFound(e.to_string()),
            LedgerError::DuplicateReservation | LedgerError::InsufficientAvailability { .. } => {
                ServerError::Conflict(e.to_string())
            }
            LedgerError::InvariantViolation(_) | LedgerError::Storage(_) => {
                ServerError::Internal(anyhow::anyhow!(e.to_string()))
            }
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(e: JsonRejection) -> Self {
        ServerError::InvalidInput(e.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(e: QueryRejection) -> Self {
        ServerError::InvalidInput(e.body_text())
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidInput(_) | ServerError::InvalidSlot(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServerError::Internal(err) => {
                // 记录内部错误但不暴露详细信息
                tracing::error!(error = ?err, "Internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// 处理器的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
