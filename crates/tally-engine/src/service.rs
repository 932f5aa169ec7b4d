use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{instrument, warn};

use tally_core::{
    week_ending, CounterKey, HistoryView, LedgerRecord, LedgerStore, OwnerId, RolloverReceipt,
    RosterStore, RosterView, StudentName,
};

use crate::counter::CounterBoard;
use crate::error::EngineError;
use crate::history;
use crate::policy::{self, WritePolicy};
use crate::roster;

/// Engine configuration.
pub struct EngineConfig {
    /// Weekly check-in cap; increments saturate here silently. Deployments
    /// have historically run 4 or 5.
    pub weekly_cap: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { weekly_cap: 5 }
    }
}

/// Facade over the counter board and the backing stores — the engine's
/// entire public surface for the presentation layer.
///
/// Counter operations are synchronous and lock-free beyond the board's
/// per-key shards. Store-touching operations are async; the store awaits
/// are the only suspension points, and no in-process lock is held across
/// them. Blank owner or student input is rejected as a no-op at every
/// entry point.
pub struct CheckInService {
    board: CounterBoard,
    ledger: Arc<dyn LedgerStore>,
    roster: Arc<dyn RosterStore>,
    config: EngineConfig,
}

impl CheckInService {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        roster: Arc<dyn RosterStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            board: CounterBoard::new(),
            ledger,
            roster,
            config,
        }
    }

    fn key(owner: &str, student: &str) -> Option<CounterKey> {
        Some(CounterKey::new(
            OwnerId::new(owner)?,
            StudentName::new(student)?,
        ))
    }

    /// Current-week count. Blank input reads as zero.
    pub fn current_count(&self, owner: &str, student: &str) -> u32 {
        match Self::key(owner, student) {
            Some(key) => self.board.count(&key),
            None => 0,
        }
    }

    /// Record one check-in with an optional free-text note. Returns the
    /// new count, saturating silently at the weekly cap.
    #[instrument(skip(self, note), fields(owner, student))]
    pub fn add_check_in(&self, owner: &str, student: &str, note: Option<&str>) -> u32 {
        let Some(key) = Self::key(owner, student) else {
            return 0;
        };
        let count = self.board.check_in(&key, self.config.weekly_cap);
        if let Some(text) = note {
            self.board.add_note(&key, text);
        }
        count
    }

    /// Throw away the current week's count and notes.
    pub fn clear_week(&self, owner: &str, student: &str) {
        if let Some(key) = Self::key(owner, student) {
            self.board.reset(&key);
        }
    }

    /// Register a student explicitly. Best-effort: a store failure is
    /// logged and absorbed, since any student with ledger history is
    /// re-derived by the roster union anyway.
    #[instrument(skip(self), fields(owner, student))]
    pub async fn register_student(&self, owner: &str, student: &str) {
        let Some(key) = Self::key(owner, student) else {
            return;
        };
        let result = roster::ensure_registered(self.roster.as_ref(), &key.owner, &key.student).await;
        let _ = policy::apply(WritePolicy::BestEffort, "roster registration", result);
    }

    /// Finalize the current week: append the live count to the ledger
    /// under `now`'s week-ending Friday, then reset the counter.
    ///
    /// Returns `Ok(None)` for blank input. On append failure the counter
    /// is deliberately left untouched — the caller retries without losing
    /// an in-progress week, and the duplicate append a retry can produce
    /// is collapsed by read-time reconciliation.
    #[instrument(skip(self), fields(owner, student, %now))]
    pub async fn end_week(
        &self,
        owner: &str,
        student: &str,
        now: NaiveDate,
    ) -> Result<Option<RolloverReceipt>, EngineError> {
        let Some(key) = Self::key(owner, student) else {
            return Ok(None);
        };

        // 1. Best-effort roster registration.
        let registered =
            roster::ensure_registered(self.roster.as_ref(), &key.owner, &key.student).await;
        policy::apply(WritePolicy::BestEffort, "roster registration", registered)?;

        // 2. Snapshot the live counter.
        let (count, note_summary) = self.board.snapshot(&key);

        // 3. Week-ending date for `now`.
        let week = week_ending(now);

        // 4. All-or-nothing ledger append.
        let record = LedgerRecord {
            owner: key.owner.clone(),
            student: key.student.clone(),
            week_ending: week,
            count,
            note_summary,
        };
        policy::apply(
            WritePolicy::AllOrNothing,
            "ledger append",
            self.ledger.append(&record).await,
        )?;

        // 5. Reset only after the append landed.
        self.board.reset(&key);

        Ok(Some(RolloverReceipt {
            week_ending: week,
            count,
        }))
    }

    /// Reconciled weekly history, most recent week first. A failed read
    /// degrades to an empty flagged view instead of an error.
    #[instrument(skip(self), fields(owner, student))]
    pub async fn weekly_history(&self, owner: &str, student: &str) -> HistoryView {
        let Some(key) = Self::key(owner, student) else {
            return HistoryView::default();
        };
        match self.ledger.read_rows(Some(&key.owner)).await {
            Ok(rows) => HistoryView {
                weeks: history::reconcile(&rows, &key.owner, &key.student),
                degraded: false,
            },
            Err(e) => {
                warn!(error = %e, kind = e.error_kind(), "ledger read failed; serving empty history");
                HistoryView {
                    weeks: Vec::new(),
                    degraded: true,
                }
            }
        }
    }

    /// Students visible to an owner: explicit roster entries, the legacy
    /// fallback tier, and anyone present in ledger history. A failed
    /// source contributes an empty set and flags the view degraded.
    #[instrument(skip(self), fields(owner))]
    pub async fn list_students(&self, owner: &str) -> RosterView {
        let Some(owner) = OwnerId::new(owner) else {
            return RosterView::default();
        };

        let mut degraded = false;
        let roster_rows = match self.roster.read_rows(None).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, kind = e.error_kind(), "roster read failed; resolving without explicit entries");
                degraded = true;
                Vec::new()
            }
        };
        let ledger_rows = match self.ledger.read_rows(Some(&owner)).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, kind = e.error_kind(), "ledger read failed; resolving without history-derived students");
                degraded = true;
                Vec::new()
            }
        };

        RosterView {
            students: roster::resolve(&roster_rows, &ledger_rows, &owner),
            degraded,
        }
    }
}
