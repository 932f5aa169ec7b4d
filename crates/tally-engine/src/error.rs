use tally_core::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Whether retrying the failed operation can be expected to succeed.
    /// End-week preserves the live counter on failure, so a retry never
    /// loses an in-progress week.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(e) => e.is_transient(),
        }
    }
}
