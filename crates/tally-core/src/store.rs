use async_trait::async_trait;

use crate::errors::StoreError;
use crate::keys::{OwnerId, StudentName};
use crate::records::{LedgerRecord, RawLedgerRow, RosterRow};

/// Append-only store of finalized weekly totals.
///
/// Reads return loose rows: the backing service holds heterogeneous legacy
/// history, and one corrupt row must never block the rest of a read.
/// Appends never deduplicate — collapsing duplicate weeks is a read-path
/// concern, because concurrent or retried appends must be kept, not lost.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Raw ledger rows, optionally filtered to one owner.
    async fn read_rows(&self, owner: Option<&OwnerId>) -> Result<Vec<RawLedgerRow>, StoreError>;

    /// Append one immutable record.
    async fn append(&self, record: &LedgerRecord) -> Result<(), StoreError>;
}

/// Durable list of known students per owner.
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Raw roster rows. `None` returns every row, legacy entries included.
    async fn read_rows(&self, owner: Option<&OwnerId>) -> Result<Vec<RosterRow>, StoreError>;

    /// Append one (owner, student) entry. Callers tolerate duplicates.
    async fn append(&self, owner: &OwnerId, student: &StudentName) -> Result<(), StoreError>;
}
