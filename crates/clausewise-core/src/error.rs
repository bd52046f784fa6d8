use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Summary not found: {0}")]
    SummaryNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
