use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A field failed validation; carries the field name and a user-facing message.
    #[error("Некорректное значение поля «{0}»: {1}")]
    InvalidInput(String, String),
}

impl CoreError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        CoreError::InvalidInput(field.to_string(), message.into())
    }
}
