use std::collections::HashSet;

use tally_core::{OwnerId, RawLedgerRow, RosterRow, RosterStore, StoreError, StudentName};

/// Placeholder synthesized when an owner has no students anywhere, so the
/// presentation layer never faces an empty selection set.
pub const DEFAULT_STUDENT: &str = "Student 1";

fn push_unique(name: &str, students: &mut Vec<String>, seen: &mut HashSet<String>) {
    let Some(student) = StudentName::new(name) else {
        return;
    };
    // Display grouping is case-insensitive; the first-seen casing is kept.
    if seen.insert(student.folded()) {
        students.push(student.as_str().to_string());
    }
}

fn is_legacy(row: &RosterRow) -> bool {
    row.owner.as_deref().map_or(true, |o| o.trim().is_empty())
}

/// Merge the roster sources visible to one owner: explicit entries, legacy
/// owner-less entries (only when the owner has no explicit entries of
/// their own), and students observed in the owner's ledger rows. Sorted
/// case-insensitively; never empty.
pub fn resolve(
    roster_rows: &[RosterRow],
    ledger_rows: &[RawLedgerRow],
    owner: &OwnerId,
) -> Vec<String> {
    let mut students = Vec::new();
    let mut seen = HashSet::new();

    let explicit: Vec<&RosterRow> = roster_rows
        .iter()
        .filter(|r| r.owner.as_deref().is_some_and(|o| owner.matches_raw(o)))
        .collect();

    if explicit.is_empty() {
        // Legacy tier: rows from before owner scoping act as a shared
        // fallback for owners with no entries of their own.
        for row in roster_rows.iter().filter(|r| is_legacy(r)) {
            if let Some(name) = row.student.as_deref() {
                push_unique(name, &mut students, &mut seen);
            }
        }
    } else {
        for row in &explicit {
            if let Some(name) = row.student.as_deref() {
                push_unique(name, &mut students, &mut seen);
            }
        }
    }

    // A student with ledger history is always visible, registered or not.
    for raw in ledger_rows {
        let (Some(o), Some(name)) = (raw.owner.as_deref(), raw.student.as_deref()) else {
            continue;
        };
        if owner.matches_raw(o) {
            push_unique(name, &mut students, &mut seen);
        }
    }

    if students.is_empty() {
        students.push(DEFAULT_STUDENT.to_string());
    }
    students.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
    students
}

/// Register a student for an owner unless an explicit entry already
/// matches case-insensitively.
///
/// Check-then-append is not atomic against concurrent callers; a duplicate
/// roster row is a tolerated outcome, absorbed by [`resolve`]'s set-union
/// semantics.
pub async fn ensure_registered(
    store: &dyn RosterStore,
    owner: &OwnerId,
    student: &StudentName,
) -> Result<(), StoreError> {
    let rows = store.read_rows(Some(owner)).await?;
    let folded = student.folded();
    let exists = rows.iter().any(|r| {
        r.owner.as_deref().is_some_and(|o| owner.matches_raw(o))
            && r.student
                .as_deref()
                .is_some_and(|s| s.trim().to_lowercase() == folded)
    });
    if exists {
        return Ok(());
    }
    store.append(owner, student).await
}
