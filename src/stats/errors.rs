use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum StatsError {
    /// The outcome broke its contract; nothing was recorded.
    #[error("Invalid match outcome: {0}")]
    InvalidOutcome(String),

    #[error("Repository error: {0}")]
    Store(#[from] StoreError),
}
