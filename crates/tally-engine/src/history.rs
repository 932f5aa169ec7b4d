use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use tally_core::{LedgerRecord, OwnerId, RawLedgerRow, StudentName, WeekSummary};

/// Parse one loose ledger row. `None` means the row is malformed —
/// missing owner or student, unparseable week date, non-numeric count —
/// and is skipped. A corrupt row never aborts the batch it arrived in.
fn parse_row(raw: &RawLedgerRow) -> Option<LedgerRecord> {
    let owner = OwnerId::new(raw.owner.as_deref()?)?;
    let student = StudentName::new(raw.student.as_deref()?)?;
    let week_ending =
        NaiveDate::parse_from_str(raw.week_ending.as_deref()?.trim(), "%Y-%m-%d").ok()?;
    let count: u32 = raw.count.as_deref()?.trim().parse().ok()?;
    Some(LedgerRecord {
        owner,
        student,
        week_ending,
        count,
        note_summary: raw.note_summary.clone().unwrap_or_default(),
    })
}

/// Collapse raw ledger rows for one (owner, student) into exactly one
/// entry per distinct week, most recent week first.
///
/// The week total is the maximum observed count, first-seen record winning
/// ties. Retried rollovers double-append rather than overwrite, so the
/// higher number is the one the owner actually reached: this is an
/// observed-max merge, not last-write-wins.
pub fn reconcile(
    rows: &[RawLedgerRow],
    owner: &OwnerId,
    student: &StudentName,
) -> Vec<WeekSummary> {
    let mut by_week: BTreeMap<NaiveDate, WeekSummary> = BTreeMap::new();
    let mut skipped = 0usize;

    for raw in rows {
        let Some(record) = parse_row(raw) else {
            skipped += 1;
            continue;
        };
        // Owner matching is normalized; student matching is exact after
        // trimming, mirroring how counter keys are built.
        if record.owner != *owner || record.student.as_str() != student.as_str() {
            continue;
        }
        match by_week.get_mut(&record.week_ending) {
            None => {
                by_week.insert(
                    record.week_ending,
                    WeekSummary {
                        week_ending: record.week_ending,
                        count: record.count,
                        note_summary: record.note_summary,
                    },
                );
            }
            Some(existing) if record.count > existing.count => {
                existing.count = record.count;
                existing.note_summary = record.note_summary;
            }
            Some(_) => {}
        }
    }

    if skipped > 0 {
        debug!(skipped, "skipped malformed ledger rows during reconciliation");
    }
    by_week.into_values().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId::new("alice").unwrap()
    }

    fn student() -> StudentName {
        StudentName::new("Sam").unwrap()
    }

    fn row(owner: &str, student: &str, week: &str, count: &str) -> RawLedgerRow {
        RawLedgerRow {
            owner: Some(owner.into()),
            student: Some(student.into()),
            week_ending: Some(week.into()),
            count: Some(count.into()),
            note_summary: None,
        }
    }

    fn noted(mut raw: RawLedgerRow, note: &str) -> RawLedgerRow {
        raw.note_summary = Some(note.into());
        raw
    }

    #[test]
    fn duplicate_weeks_reconcile_to_the_max() {
        let rows = vec![
            row("alice", "Sam", "2024-03-15", "3"),
            row("alice", "Sam", "2024-03-15", "5"),
        ];
        let weeks = reconcile(&rows, &owner(), &student());
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].count, 5);

        // Same result with the appends in the other order
        let rows = vec![
            row("alice", "Sam", "2024-03-15", "5"),
            row("alice", "Sam", "2024-03-15", "3"),
        ];
        let weeks = reconcile(&rows, &owner(), &student());
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].count, 5);
    }

    #[test]
    fn ties_keep_the_first_seen_record() {
        let rows = vec![
            noted(row("alice", "Sam", "2024-03-15", "4"), "first"),
            noted(row("alice", "Sam", "2024-03-15", "4"), "second"),
        ];
        let weeks = reconcile(&rows, &owner(), &student());
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].note_summary, "first");
    }

    #[test]
    fn winning_record_brings_its_note_summary() {
        let rows = vec![
            noted(row("alice", "Sam", "2024-03-15", "2"), "partial save"),
            noted(row("alice", "Sam", "2024-03-15", "5"), "full week"),
        ];
        let weeks = reconcile(&rows, &owner(), &student());
        assert_eq!(weeks[0].note_summary, "full week");
    }

    #[test]
    fn most_recent_week_first() {
        let rows = vec![
            row("alice", "Sam", "2024-03-01", "2"),
            row("alice", "Sam", "2024-03-15", "4"),
            row("alice", "Sam", "2024-03-08", "1"),
        ];
        let weeks = reconcile(&rows, &owner(), &student());
        let dates: Vec<String> = weeks.iter().map(|w| w.week_ending.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-15", "2024-03-08", "2024-03-01"]);
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let rows = vec![
            row("alice", "Sam", "2024-03-15", "4"),
            row("alice", "Sam", "2024-03-08", "four"), // non-numeric count
            row("alice", "Sam", "not a date", "2"),    // bad week
            RawLedgerRow::default(),                   // everything missing
            RawLedgerRow {
                owner: None, // tenant-less ledger row
                student: Some("Sam".into()),
                week_ending: Some("2024-03-01".into()),
                count: Some("3".into()),
                note_summary: None,
            },
        ];
        let weeks = reconcile(&rows, &owner(), &student());
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].count, 4);
    }

    #[test]
    fn negative_counts_are_malformed() {
        let rows = vec![
            row("alice", "Sam", "2024-03-15", "-2"),
            row("alice", "Sam", "2024-03-15", "1"),
        ];
        let weeks = reconcile(&rows, &owner(), &student());
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].count, 1);
    }

    #[test]
    fn padded_cells_still_parse() {
        let rows = vec![row("  Alice ", " Sam ", " 2024-03-15 ", " 4 ")];
        let weeks = reconcile(&rows, &owner(), &student());
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].count, 4);
    }

    #[test]
    fn other_owners_and_students_are_excluded() {
        let rows = vec![
            row("alice", "Sam", "2024-03-15", "4"),
            row("bob", "Sam", "2024-03-15", "9"),
            row("alice", "Kim", "2024-03-15", "9"),
            // Student matching is case-sensitive: "sam" is a different key
            row("alice", "sam", "2024-03-15", "9"),
        ];
        let weeks = reconcile(&rows, &owner(), &student());
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].count, 4);
    }

    #[test]
    fn empty_input_reconciles_to_empty() {
        assert!(reconcile(&[], &owner(), &student()).is_empty());
    }
}
