use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("database lock poisoned")]
    Lock,

    #[error("trade {0} not found")]
    TradeNotFound(i64),

    #[error("serialization error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("import failed: {0}")]
    Import(String),
}

pub type Result<T> = std::result::Result<T, JournalError>;
