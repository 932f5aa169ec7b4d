use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use tally_core::{LedgerRecord, LedgerStore, OwnerId, RawLedgerRow, StoreError};

use crate::database::{db_err, Database};

// CAST on every data column: legacy rows can hold numeric or blob cells,
// and a read must surface them as text rather than fail on type affinity.
const SELECT_ROWS: &str = "SELECT CAST(owner AS TEXT), CAST(student AS TEXT), \
     CAST(week_ending AS TEXT), CAST(count AS TEXT), CAST(note_summary AS TEXT) \
     FROM ledger";

/// Append-only weekly-total ledger backed by SQLite.
pub struct SqliteLedger {
    db: Database,
}

impl SqliteLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerStore for SqliteLedger {
    #[instrument(skip(self), fields(owner = owner.map(|o| o.as_str())))]
    async fn read_rows(&self, owner: Option<&OwnerId>) -> Result<Vec<RawLedgerRow>, StoreError> {
        self.db.with_conn(|conn| {
            let (sql, params) = match owner {
                // TRIM + NOCASE: rows written before owner normalization
                // may carry padding or mixed case.
                Some(o) => (
                    format!("{SELECT_ROWS} WHERE TRIM(owner) = ?1 COLLATE NOCASE ORDER BY id"),
                    vec![o.as_str().to_string()],
                ),
                None => (format!("{SELECT_ROWS} ORDER BY id"), Vec::new()),
            };

            let mut stmt = conn.prepare(&sql).map_err(db_err)?;
            let param_refs: Vec<&dyn rusqlite::types::ToSql> =
                params.iter().map(|p| p as &dyn rusqlite::types::ToSql).collect();
            let rows = stmt
                .query_map(param_refs.as_slice(), |row| {
                    Ok(RawLedgerRow {
                        owner: row.get(0)?,
                        student: row.get(1)?,
                        week_ending: row.get(2)?,
                        count: row.get(3)?,
                        note_summary: row.get(4)?,
                    })
                })
                .map_err(db_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
        })
    }

    #[instrument(
        skip(self, record),
        fields(owner = %record.owner, student = %record.student, week_ending = %record.week_ending, count = record.count)
    )]
    async fn append(&self, record: &LedgerRecord) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO ledger (owner, student, week_ending, count, note_summary, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    record.owner.as_str(),
                    record.student.as_str(),
                    record.week_ending.format("%Y-%m-%d").to_string(),
                    record.count.to_string(),
                    record.note_summary,
                    now,
                ],
            )
            .map_err(db_err)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tally_core::StudentName;

    fn record(owner: &str, student: &str, week: &str, count: u32) -> LedgerRecord {
        LedgerRecord {
            owner: OwnerId::new(owner).unwrap(),
            student: StudentName::new(student).unwrap(),
            week_ending: NaiveDate::parse_from_str(week, "%Y-%m-%d").unwrap(),
            count,
            note_summary: String::new(),
        }
    }

    #[tokio::test]
    async fn append_then_read_roundtrip() {
        let ledger = SqliteLedger::new(Database::in_memory().unwrap());
        ledger.append(&record("alice", "Sam", "2024-03-15", 4)).await.unwrap();

        let rows = ledger.read_rows(None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].owner.as_deref(), Some("alice"));
        assert_eq!(rows[0].student.as_deref(), Some("Sam"));
        assert_eq!(rows[0].week_ending.as_deref(), Some("2024-03-15"));
        assert_eq!(rows[0].count.as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn owner_filter_is_trimmed_and_case_insensitive() {
        let db = Database::in_memory().unwrap();
        let ledger = SqliteLedger::new(db.clone());

        // A row written by an older tool, before owner normalization.
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO ledger (owner, student, week_ending, count, note_summary, created_at)
                 VALUES ('  Alice ', 'Sam', '2024-03-08', '3', '', '2024-03-08T00:00:00Z')",
                [],
            )
            .map_err(db_err)?;
            Ok(())
        })
        .unwrap();
        ledger.append(&record("bob", "Kim", "2024-03-15", 2)).await.unwrap();

        let rows = ledger
            .read_rows(Some(&OwnerId::new("alice").unwrap()))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student.as_deref(), Some("Sam"));
    }

    #[tokio::test]
    async fn reads_tolerate_null_and_numeric_cells() {
        let db = Database::in_memory().unwrap();
        let ledger = SqliteLedger::new(db.clone());

        db.with_conn(|conn| {
            // No owner, integer-typed count cell, missing week
            conn.execute(
                "INSERT INTO ledger (owner, student, week_ending, count, note_summary, created_at)
                 VALUES (NULL, 'Orphan', NULL, 7, NULL, '2024-01-01T00:00:00Z')",
                [],
            )
            .map_err(db_err)?;
            Ok(())
        })
        .unwrap();

        let rows = ledger.read_rows(None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].owner.is_none());
        assert!(rows[0].week_ending.is_none());
        assert_eq!(rows[0].count.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn duplicate_appends_are_kept() {
        let ledger = SqliteLedger::new(Database::in_memory().unwrap());
        ledger.append(&record("alice", "Sam", "2024-03-15", 3)).await.unwrap();
        ledger.append(&record("alice", "Sam", "2024-03-15", 5)).await.unwrap();

        let rows = ledger.read_rows(None).await.unwrap();
        assert_eq!(rows.len(), 2);
    }
}
