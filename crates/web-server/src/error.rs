use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::CoreError;
use database::DbError;
use reporting::error::ReportError;
use serde_json::json;
use thiserror::Error;

// User-facing messages. The front end shows these verbatim.
pub const MSG_NOT_FOUND: &str = "Не найдено";
pub const MSG_USER_EXISTS: &str = "Пользователь уже существует";
const MSG_DUPLICATE: &str = "Запись уже существует";
const MSG_INTERNAL: &str = "Внутренняя ошибка сервера";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Duplicate: {0}")]
    Duplicate(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Validation(err.to_string())
    }
}

pub const MSG_BAD_BODY: &str = "Некорректное тело запроса";
pub const MSG_BAD_QUERY: &str = "Некорректные параметры запроса";
pub const MSG_BAD_ID: &str = "Некорректный идентификатор";

/// Extractor rejections carry English detail from axum; it goes to the log only.
fn rejected(message: &str, detail: String) -> AppError {
    tracing::debug!(%detail, "{message}");
    AppError::Validation(message.to_string())
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        rejected(MSG_BAD_BODY, rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        rejected(MSG_BAD_QUERY, rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        rejected(MSG_BAD_ID, rejection.body_text())
    }
}

/// Status and message for a store failure.
fn classify_db_error(err: &DbError) -> (StatusCode, String) {
    match err {
        DbError::NotFound(_) => (StatusCode::NOT_FOUND, MSG_NOT_FOUND.to_string()),
        DbError::Duplicate(_) => (StatusCode::BAD_REQUEST, MSG_DUPLICATE.to_string()),
        DbError::ForeignKey(detail) => (
            StatusCode::BAD_REQUEST,
            format!("Связанная запись не найдена ({detail})"),
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.to_string()),
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Database(db_err) | AppError::Report(ReportError::Store(db_err)) => {
                classify_db_error(db_err)
            }
            AppError::Report(ReportError::InvalidQuery(core_err)) => {
                (StatusCode::BAD_REQUEST, core_err.to_string())
            }
            AppError::Report(ReportError::Overflow) => {
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.to_string())
            }
            AppError::Validation(message) | AppError::Duplicate(message) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed.");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected.");
        }

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
