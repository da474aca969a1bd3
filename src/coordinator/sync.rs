use std::collections::BTreeMap;
use std::fs;

use chrono::Utc;
use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::lock;
use crate::marker;
use crate::models::{Status, SyncedState};
use crate::plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    FromBase,
    ToBase,
    Both,
    Scan,
}

impl SyncDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "from-base" => Some(Self::FromBase),
            "to-base" => Some(Self::ToBase),
            "both" => Some(Self::Both),
            "scan" => Some(Self::Scan),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FromBase => "from-base",
            Self::ToBase => "to-base",
            Self::Both => "both",
            Self::Scan => "scan",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanUpdate {
    pub epic: String,
    pub old_status: Status,
    pub new_status: Status,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SyncOutcome {
    Worktree { epic: String, direction: String, synced: SyncedState },
    Base { scanned: usize, updates: Vec<ScanUpdate> },
}

impl Coordinator {
    /// Auto-detects direction when none is supplied: `both` from a
    /// worktree, `scan` from a base. Explicit directions are validated
    /// against the calling context (*DirectionMismatch* otherwise).
    pub fn sync(&self, direction: Option<SyncDirection>) -> Result<SyncOutcome, CoordinatorError> {
        if marker::is_worktree_root(&self.root) {
            self.sync_from_worktree(direction)
        } else {
            match direction {
                None | Some(SyncDirection::Scan) => self.sync_scan_from_base(),
                Some(other) => Err(CoordinatorError::direction_mismatch("a base project", other.as_str())),
            }
        }
    }

    fn sync_from_worktree(&self, direction: Option<SyncDirection>) -> Result<SyncOutcome, CoordinatorError> {
        let direction = direction.unwrap_or(SyncDirection::Both);
        if direction == SyncDirection::Scan {
            return Err(CoordinatorError::direction_mismatch("a worktree", "scan"));
        }

        let mut local_marker = marker::read_marker(&self.root)?;
        let base_root = self.locate_base()?;

        if matches!(direction, SyncDirection::FromBase | SyncDirection::Both) {
            let base_graph = plan::load(&base_root)?;
            let epic = base_graph
                .epic(&local_marker.epic)
                .ok_or_else(|| CoordinatorError::not_found("epic", &local_marker.epic))?;

            let mut dependencies = BTreeMap::new();
            for dep in &epic.depends_on {
                if let Some(dep_epic) = base_graph.epic(dep) {
                    dependencies.insert(dep.clone(), dep_epic.status);
                }
            }
            let dependents: Vec<String> = base_graph
                .epics
                .iter()
                .filter(|e| e.depends_on.iter().any(|d| d == &local_marker.epic))
                .map(|e| e.id.clone())
                .collect();
            let blocked_by: Vec<String> = epic
                .depends_on
                .iter()
                .filter(|d| dependencies.get(*d).map(|s| *s != Status::Completed).unwrap_or(false))
                .cloned()
                .collect();
            let dag_status = epic.status;

            local_marker.synced = Some(SyncedState {
                last_sync: Utc::now(),
                dependencies,
                dependents,
                blocked_by,
                dag_status,
            });
            marker::write_marker(&self.root, &local_marker)?;
        }

        if matches!(direction, SyncDirection::ToBase | SyncDirection::Both) {
            let epic_id = local_marker.epic.clone();
            let local_status = local_marker.local.status;
            lock::with_lock(&base_root, None, || {
                let mut base_graph = plan::load(&base_root)?;
                let needs_update = match base_graph.epic(&epic_id) {
                    Some(epic) => epic.status != local_status,
                    None => return Err(CoordinatorError::not_found("epic", &epic_id)),
                };
                if needs_update {
                    if let Some(epic) = base_graph.epic_mut(&epic_id) {
                        epic.status = local_status;
                    }
                    plan::save(&base_root, &base_graph)?;
                }
                Ok(())
            })?;
        }

        let synced = local_marker.synced.clone().unwrap_or_else(|| SyncedState {
            last_sync: Utc::now(),
            dependencies: BTreeMap::new(),
            dependents: Vec::new(),
            blocked_by: Vec::new(),
            dag_status: local_marker.local.status,
        });

        Ok(SyncOutcome::Worktree { epic: local_marker.epic, direction: direction.as_str().to_string(), synced })
    }

    fn sync_scan_from_base(&self) -> Result<SyncOutcome, CoordinatorError> {
        lock::with_lock(&self.root, None, || {
            let mut g = plan::load(&self.root)?;
            let worktrees_dir = self.root.join(".worktrees");

            let mut scanned = 0usize;
            let mut updates = Vec::new();

            if worktrees_dir.is_dir() {
                let mut entries: Vec<_> = fs::read_dir(&worktrees_dir)?.filter_map(|e| e.ok()).collect();
                entries.sort_by_key(|e| e.file_name());

                for entry in entries {
                    let path = entry.path();
                    if !path.is_dir() || !marker::is_worktree_root(&path) {
                        continue;
                    }
                    let Ok(local_marker) = marker::read_marker(&path) else { continue };
                    scanned += 1;

                    if let Some(epic) = g.epic(&local_marker.epic) {
                        if epic.status != local_marker.local.status {
                            updates.push(ScanUpdate {
                                epic: local_marker.epic.clone(),
                                old_status: epic.status,
                                new_status: local_marker.local.status,
                            });
                        }
                    }
                }
            }

            for update in &updates {
                if let Some(epic) = g.epic_mut(&update.epic) {
                    epic.status = update.new_status;
                }
            }
            if !updates.is_empty() {
                plan::save(&self.root, &g)?;
            }

            Ok(SyncOutcome::Base { scanned, updates })
        })
    }
}
