use crate::render;
use api_client::error::ApiError;
use axum::{
    extract::rejection::{FormRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use core_types::CoreError;
use thiserror::Error;

pub const MSG_BAD_CREDENTIALS: &str = "Неверный логин или пароль";
pub const MSG_FORBIDDEN: &str = "Доступ запрещён";
const MSG_UNAVAILABLE: &str = "Сервис недоступен";
const MSG_INTERNAL: &str = "Внутренняя ошибка сервера";

#[derive(Error, Debug)]
pub enum FrontError {
    /// No valid session cookie; the visitor is sent to the login page.
    #[error("Login required")]
    LoginRequired,
    #[error("Bad credentials")]
    BadCredentials,
    #[error("Forbidden")]
    Forbidden,
    #[error("Bad form: {0}")]
    BadForm(String),
    #[error("API call failed: {0}")]
    Api(#[from] ApiError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for FrontError {
    fn from(err: CoreError) -> Self {
        FrontError::BadForm(err.to_string())
    }
}

/// Extractor rejections carry English detail from axum; it goes to the log only.
fn rejected(message: &str, detail: String) -> FrontError {
    tracing::debug!(%detail, "{message}");
    FrontError::BadForm(message.to_string())
}

impl From<FormRejection> for FrontError {
    fn from(rejection: FormRejection) -> Self {
        rejected("Некорректные данные формы", rejection.body_text())
    }
}

impl From<QueryRejection> for FrontError {
    fn from(rejection: QueryRejection) -> Self {
        rejected("Некорректные параметры запроса", rejection.body_text())
    }
}

impl From<PathRejection> for FrontError {
    fn from(rejection: PathRejection) -> Self {
        rejected("Некорректный идентификатор", rejection.body_text())
    }
}

impl IntoResponse for FrontError {
    fn into_response(self) -> Response {
        match self {
            FrontError::LoginRequired => Redirect::to("/login").into_response(),
            FrontError::BadCredentials => (StatusCode::UNAUTHORIZED, MSG_BAD_CREDENTIALS).into_response(),
            FrontError::Forbidden => (StatusCode::FORBIDDEN, MSG_FORBIDDEN).into_response(),
            FrontError::BadForm(message) => {
                tracing::warn!(%message, "Form rejected.");
                (StatusCode::BAD_REQUEST, render::message_page("Ошибка", &message)).into_response()
            }
            FrontError::Api(ApiError::Rejected { status, message }) if status.is_client_error() => {
                tracing::warn!(status = status.as_u16(), %message, "API rejected the request.");
                (status, render::message_page("Ошибка", &message)).into_response()
            }
            FrontError::Api(err) => {
                tracing::error!(error = %err, "API call failed.");
                (StatusCode::BAD_GATEWAY, render::message_page("Ошибка", MSG_UNAVAILABLE)).into_response()
            }
            FrontError::Internal(detail) => {
                tracing::error!(%detail, "Request failed.");
                (StatusCode::INTERNAL_SERVER_ERROR, render::message_page("Ошибка", MSG_INTERNAL)).into_response()
            }
        }
    }
}
