/// Failure taxonomy for the backing ledger/roster service.
///
/// Every variant is locally containable: reads degrade to empty flagged
/// views, rollover appends propagate with the live counter preserved, and
/// roster writes are absorbed. Nothing here is fatal to the process.
#[derive(Clone, Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl StoreError {
    /// Whether a retry of the same call can be expected to succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Database(_) => "database",
            Self::Io(_) => "io",
        }
    }
}
