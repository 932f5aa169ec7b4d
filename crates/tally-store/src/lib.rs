pub mod database;
pub mod ledger;
pub mod roster;
pub mod schema;

pub use database::Database;
pub use ledger::SqliteLedger;
pub use roster::SqliteRoster;
