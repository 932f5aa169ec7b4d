use tracing::warn;

use tally_core::StoreError;

use crate::error::EngineError;

/// Failure-handling policy for one rollover sub-operation.
///
/// Roster registration runs `BestEffort`: losing a registration row is
/// cosmetic, because the union read path re-derives any student with
/// ledger history. The ledger append runs `AllOrNothing`: its failure
/// fails the rollover, and the live counter must survive for a retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WritePolicy {
    BestEffort,
    AllOrNothing,
}

/// Apply a policy to a store write result.
pub(crate) fn apply(
    policy: WritePolicy,
    op: &'static str,
    result: Result<(), StoreError>,
) -> Result<(), EngineError> {
    match (policy, result) {
        (_, Ok(())) => Ok(()),
        (WritePolicy::BestEffort, Err(e)) => {
            warn!(op, error = %e, kind = e.error_kind(), "best-effort write failed; continuing");
            Ok(())
        }
        (WritePolicy::AllOrNothing, Err(e)) => Err(EngineError::Store(e)),
    }
}
