//! Per-eye exam log upsert.
//!
//! An evaluation stores its exam findings as a flat list of [`EyeLog`]s keyed
//! by `(eye, kind)`. Clients send an [`EyeLogsPatch`] with only the sections
//! they touched; [`apply_eye_logs`] folds it into the stored list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::evaluation::{EyeLog, EyeLogKind};
use crate::models::eye::Eye;

/// Section values keyed by kind, one map per eye.
///
/// A missing key leaves the stored log untouched, a blank value deletes it
/// and anything else upserts it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EyeLogsPatch {
    #[serde(default)]
    pub right: BTreeMap<EyeLogKind, String>,
    #[serde(default)]
    pub left: BTreeMap<EyeLogKind, String>,
}

impl EyeLogsPatch {
    pub fn for_eye(&self, eye: Eye) -> &BTreeMap<EyeLogKind, String> {
        match eye {
            Eye::Right => &self.right,
            Eye::Left => &self.left,
        }
    }

    pub fn set(&mut self, eye: Eye, kind: EyeLogKind, value: impl Into<String>) -> &mut Self {
        let map = match eye {
            Eye::Right => &mut self.right,
            Eye::Left => &mut self.left,
        };
        map.insert(kind, value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.right.is_empty() && self.left.is_empty()
    }
}

/// Outcome counts of one [`apply_eye_logs`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EyeLogChanges {
    pub inserted: usize,
    pub updated: usize,
    pub removed: usize,
}

impl EyeLogChanges {
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.removed
    }
}

/// Fold `patch` into `logs`.
///
/// Values are trimmed. A log whose value does not change keeps its
/// `updated_at`. The result is ordered right eye first, then by kind.
pub fn apply_eye_logs(
    logs: &mut Vec<EyeLog>,
    patch: &EyeLogsPatch,
    now: jiff::Timestamp,
) -> EyeLogChanges {
    let mut changes = EyeLogChanges::default();

    for eye in Eye::ALL {
        let section = patch.for_eye(eye);
        for kind in EyeLogKind::ALL {
            let Some(raw) = section.get(&kind) else {
                continue;
            };
            let value = raw.trim();
            let existing = logs.iter().position(|l| l.eye == eye && l.kind == kind);

            match (existing, value.is_empty()) {
                (Some(pos), true) => {
                    logs.remove(pos);
                    changes.removed += 1;
                }
                (None, true) => {}
                (Some(pos), false) => {
                    let log = &mut logs[pos];
                    if log.value != value {
                        log.value = value.to_string();
                        log.updated_at = now;
                        changes.updated += 1;
                    }
                }
                (None, false) => {
                    logs.push(EyeLog {
                        eye,
                        kind,
                        value: value.to_string(),
                        updated_at: now,
                    });
                    changes.inserted += 1;
                }
            }
        }
    }

    logs.sort_by_key(|l| (l.eye, l.kind));
    changes
}
