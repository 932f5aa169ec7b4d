pub mod errors;
pub mod keys;
pub mod records;
pub mod store;
pub mod week;

pub use errors::StoreError;
pub use keys::{CounterKey, OwnerId, StudentName};
pub use records::{
    HistoryView, LedgerRecord, RawLedgerRow, RolloverReceipt, RosterRow, RosterView, WeekSummary,
};
pub use store::{LedgerStore, RosterStore};
pub use week::week_ending;
