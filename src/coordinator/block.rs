use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::lock;
use crate::models::{BlockedEntry, Status};
use crate::plan;

#[derive(Debug, Clone, Serialize)]
pub struct BlockOutcome {
    pub task_id: String,
    pub reason: String,
    pub blocked_at: DateTime<Utc>,
}

impl Coordinator {
    /// Under lock: find the task by id (*NotFound* otherwise), set it to
    /// `blocked`, and append a `BlockedEntry` with the current UTC
    /// timestamp and the supplied reason. Also prunes any stale `blocked`
    /// entries left behind by earlier writers before saving.
    pub fn block(&self, task_id: &str, reason: &str) -> Result<BlockOutcome, CoordinatorError> {
        lock::with_lock(&self.root, None, || {
            let mut g = plan::load(&self.root)?;

            let found = if let Some(epic) = g.epic_mut(task_id) {
                epic.status = Status::Blocked;
                true
            } else {
                let mut found = false;
                for epic in &mut g.epics {
                    if let Some(feature) = epic.feature_mut(task_id) {
                        feature.status = Status::Blocked;
                        found = true;
                        break;
                    }
                }
                found
            };

            if !found {
                return Err(CoordinatorError::not_found("task", task_id));
            }

            let blocked_at = Utc::now();
            g.blocked.push(BlockedEntry {
                task_id: task_id.to_string(),
                reason: reason.to_string(),
                blocked_at,
                attempts: Vec::new(),
            });

            g.prune_stale_blocked();
            plan::save(&self.root, &g)?;
            Ok(BlockOutcome { task_id: task_id.to_string(), reason: reason.to_string(), blocked_at })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn blocks_a_task_and_records_an_entry() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("plan.yaml"), "epics:\n  - id: a\n").unwrap();
        let coordinator = Coordinator::new(dir.path().to_path_buf());
        coordinator.block("a", "waiting on design review").unwrap();
        let graph = coordinator.status().unwrap();
        assert_eq!(graph.epics[0].status, Status::Blocked);
        assert_eq!(graph.blocked.len(), 1);
        assert_eq!(graph.blocked[0].reason, "waiting on design review");
    }

    #[test]
    fn unknown_task_id_is_not_found() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("plan.yaml"), "epics:\n  - id: a\n").unwrap();
        let coordinator = Coordinator::new(dir.path().to_path_buf());
        assert!(coordinator.block("ghost", "why").is_err());
    }
}
