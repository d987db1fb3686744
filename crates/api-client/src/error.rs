use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to reach the API: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered 4xx/5xx; `message` is its localized `error` text.
    #[error("The API rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Rejected { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// The text worth showing to a person, without transport details.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Rejected { message, .. } => message,
            _ => "Сервис недоступен",
        }
    }
}
