use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Status;

#[derive(Debug, Clone, Serialize)]
pub struct LocalState {
    pub status: Status,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncedState {
    pub last_sync: DateTime<Utc>,
    pub dependencies: BTreeMap<String, Status>,
    pub dependents: Vec<String>,
    pub blocked_by: Vec<String>,
    pub dag_status: Status,
}

/// Per-worktree record written at `<worktree>/.epic-marker`. Its mere
/// presence at a project root is the "am I a worktree?" sentinel.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub epic: String,
    pub base_worktree: String,
    pub base_branch: String,
    pub local: LocalState,
    pub synced: Option<SyncedState>,
}
