use serde::Deserialize;

/// The body of every non-2xx response from the API: `{"error": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// The acknowledgement returned by `POST /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResponse {
    pub msg: String,
}
