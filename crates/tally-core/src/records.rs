use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::keys::{OwnerId, StudentName};

/// One finalized weekly total, as appended to the ledger.
///
/// Records are immutable once written. Multiple records for the same
/// (owner, student, week_ending) are expected — retried rollovers append
/// rather than overwrite — and are collapsed on the read path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub owner: OwnerId,
    pub student: StudentName,
    pub week_ending: NaiveDate,
    pub count: u32,
    pub note_summary: String,
}

/// A ledger row as the backing store actually returns it.
///
/// The store keeps sheet-shaped legacy history: any field may be missing
/// or junk. Parsing and per-row skipping happen on the engine's read path,
/// never here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawLedgerRow {
    pub owner: Option<String>,
    pub student: Option<String>,
    pub week_ending: Option<String>,
    pub count: Option<String>,
    pub note_summary: Option<String>,
}

/// A roster row. `owner == None` marks a legacy entry that predates owner
/// scoping; such rows are visible only as a fallback tier.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RosterRow {
    pub owner: Option<String>,
    pub student: Option<String>,
}

/// One reconciled week — exactly one per distinct week-ending date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSummary {
    pub week_ending: NaiveDate,
    pub count: u32,
    pub note_summary: String,
}

/// Result of a successful end-week rollover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverReceipt {
    pub week_ending: NaiveDate,
    pub count: u32,
}

/// Reconciled history plus a marker for absorbed read failures.
/// `degraded` tells the presentation layer to show its banner instead of
/// treating the empty list as truth.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistoryView {
    pub weeks: Vec<WeekSummary>,
    pub degraded: bool,
}

/// Resolved student listing plus a degraded marker.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RosterView {
    pub students: Vec<String>,
    pub degraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_record_serde_roundtrip() {
        let record = LedgerRecord {
            owner: OwnerId::new("alice").unwrap(),
            student: StudentName::new("Sam").unwrap(),
            week_ending: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            count: 4,
            note_summary: "great focus; helped a classmate".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: LedgerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn raw_row_accepts_any_gaps() {
        let json = r#"{"owner":null,"student":"Sam","week_ending":"not a date","count":"four","note_summary":null}"#;
        let row: RawLedgerRow = serde_json::from_str(json).unwrap();
        assert!(row.owner.is_none());
        assert_eq!(row.count.as_deref(), Some("four"));
    }

    #[test]
    fn default_views_are_empty_and_not_degraded() {
        let history = HistoryView::default();
        assert!(history.weeks.is_empty());
        assert!(!history.degraded);

        let roster = RosterView::default();
        assert!(roster.students.is_empty());
        assert!(!roster.degraded);
    }
}
