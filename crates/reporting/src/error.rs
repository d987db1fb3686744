use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    /// The report parameters could not be parsed or are inconsistent.
    #[error("Invalid report parameters: {0}")]
    InvalidQuery(#[from] core_types::CoreError),

    /// A total left the representable range of `Decimal`.
    #[error("Report total overflowed")]
    Overflow,

    #[error("Database error: {0}")]
    Store(#[from] database::DbError),
}
