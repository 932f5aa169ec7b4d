/// SQL DDL for the tally backing store.
/// WAL mode + busy timeout applied at connection time.
pub const SCHEMA_VERSION: u32 = 1;

/// Data columns on `ledger` and `roster` are nullable TEXT on purpose:
/// both tables mirror a legacy sheet-shaped service, so rows may lack an
/// owner, hold non-numeric counts, or carry padded values. Reads surface
/// them as-is; the engine's read path owns parsing and skipping.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS ledger (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner TEXT,
    student TEXT,
    week_ending TEXT,
    count TEXT,
    note_summary TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS roster (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner TEXT,
    student TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ledger_owner ON ledger(owner);
CREATE INDEX IF NOT EXISTS idx_ledger_owner_student ON ledger(owner, student);
CREATE INDEX IF NOT EXISTS idx_roster_owner ON roster(owner);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);
"#;

pub const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
"#;
