use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::stores::store::Store;
use crate::wal::wal::WalOperation;

/// Counts from one WAL replay
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub skipped: usize,
}

// this runs at boot time
pub fn apply_wal_operations(store: &Store, operations: &[WalOperation]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for (index, op) in operations.iter().enumerate() {
        if store.restore(op) {
            summary.applied += 1;
        } else {
            summary.skipped += 1;
            warn!(
                operation = index + 1,
                op = ?op,
                "WAL operation conflicts with restored state, skipping"
            );
        }
    }

    summary
}

/// Replay the store's WAL into memory
pub fn restore_store(store: &Store) -> Result<ReplaySummary> {
    let Some(wal) = store.wal() else {
        return Ok(ReplaySummary::default());
    };

    info!(wal_path = %wal.path().display(), "Replaying WAL operations");

    let operations = wal.replay().context("Failed to replay WAL")?;
    let summary = apply_wal_operations(store, &operations);

    info!(
        operations_replayed = summary.applied,
        operations_skipped = summary.skipped,
        users_loaded = store.user_count(),
        timetable_entries_loaded = store.slot_count(),
        attendance_records_loaded = store.attendance_count(),
        "WAL replay completed"
    );

    Ok(summary)
}
