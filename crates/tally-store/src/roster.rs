use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use tally_core::{OwnerId, RosterRow, RosterStore, StoreError, StudentName};

use crate::database::{db_err, Database};

const SELECT_ROWS: &str =
    "SELECT CAST(owner AS TEXT), CAST(student AS TEXT) FROM roster";

/// Durable per-owner student roster backed by SQLite. Rows with a NULL
/// owner are legacy entries from before owner scoping.
pub struct SqliteRoster {
    db: Database,
}

impl SqliteRoster {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RosterStore for SqliteRoster {
    #[instrument(skip(self), fields(owner = owner.map(|o| o.as_str())))]
    async fn read_rows(&self, owner: Option<&OwnerId>) -> Result<Vec<RosterRow>, StoreError> {
        self.db.with_conn(|conn| {
            let (sql, params) = match owner {
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
                    Ok(RosterRow {
                        owner: row.get(0)?,
                        student: row.get(1)?,
                    })
                })
                .map_err(db_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
        })
    }

    #[instrument(skip(self), fields(owner = %owner, student = %student))]
    async fn append(&self, owner: &OwnerId, student: &StudentName) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO roster (owner, student, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![owner.as_str(), student.as_str(), now],
            )
            .map_err(db_err)?;
            Ok(())
        })
    }
}
