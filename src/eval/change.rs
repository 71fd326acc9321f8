//! The change-detection state machine behind the config node.
//!
//! Per provider path the state is either unknown (no prior entry) or a
//! last-observed value with the timestamp of its last real change. Each pass
//! produces a complete replacement snapshot; nothing is merged in place.

use crate::graph::{DetectionMode, DetectionSettings};
use crate::value::Value;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Last observed value and change time for one provider path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub value: Value,
    pub timestamp_ms: u64,
}

/// Mapping from provider path to its last observation. Carried between
/// evaluations by the owning [`StatefulLogicGraph`](crate::runtime::StatefulLogicGraph).
pub type Snapshot = AHashMap<String, SnapshotEntry>;

/// Runs one detection pass over the live provider observations.
///
/// Returns the boolean verdict and the fresh snapshot. An inactive node
/// always reports `false` but still refreshes every entry with the live
/// value and the current timestamp, so the snapshot stays warm for later
/// reactivation. An active pass keeps the old timestamp for unchanged
/// entries, which makes the time window measure the recency of the last
/// real change rather than of this pass.
pub(crate) fn detect(
    settings: &DetectionSettings,
    observations: Vec<(String, Value)>,
    previous: &Snapshot,
    now_ms: u64,
) -> (bool, Snapshot) {
    if !settings.active {
        let snapshot = observations
            .into_iter()
            .map(|(path, value)| {
                (
                    path,
                    SnapshotEntry {
                        value,
                        timestamp_ms: now_ms,
                    },
                )
            })
            .collect();
        return (false, snapshot);
    }

    let total = observations.len();
    let window_start = now_ms.saturating_sub(settings.time_window_millis);
    let mut changed_count = 0usize;
    let mut recent_count = 0usize;
    let mut snapshot = Snapshot::with_capacity(total);

    for (path, live) in observations {
        let timestamp_ms = match previous.get(&path) {
            Some(entry) if entry.value == live => entry.timestamp_ms,
            _ => {
                changed_count += 1;
                now_ms
            }
        };
        if timestamp_ms >= window_start {
            recent_count += 1;
        }
        snapshot.insert(
            path,
            SnapshotEntry {
                value: live,
                timestamp_ms,
            },
        );
    }

    let decisive = if settings.time_window_enabled {
        recent_count
    } else {
        changed_count
    };
    let verdict = match settings.mode {
        DetectionMode::Or => decisive > 0,
        DetectionMode::And => total > 0 && decisive == total,
    };
    (verdict, snapshot)
}
