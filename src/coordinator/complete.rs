use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::lock;
use crate::models::Status;
use crate::plan;

#[derive(Debug, Clone, Serialize)]
pub struct CompleteOutcome {
    pub task_id: String,
    pub new_status: Status,
    pub epic_completed: Option<String>,
}

impl Coordinator {
    /// Under lock: find the task by id (*NotFound* otherwise), set it to
    /// `completed`. If it's a Feature and every sibling Feature in its
    /// Epic is now `completed`, the Epic transitions to `completed` too
    /// (status coherence invariant, §3). Prunes any now-stale `blocked`
    /// entry for this task before saving.
    pub fn complete(&self, task_id: &str) -> Result<CompleteOutcome, CoordinatorError> {
        lock::with_lock(&self.root, None, || {
            let mut g = plan::load(&self.root)?;

            if g.epic_mut(task_id).is_some() {
                let epic = g.epic_mut(task_id).unwrap();
                epic.status = Status::Completed;
                g.prune_stale_blocked();
                plan::save(&self.root, &g)?;
                return Ok(CompleteOutcome { task_id: task_id.to_string(), new_status: Status::Completed, epic_completed: None });
            }

            let mut epic_completed = None;
            let mut found = false;
            for epic in &mut g.epics {
                if let Some(feature) = epic.feature_mut(task_id) {
                    feature.status = Status::Completed;
                    found = true;
                    if epic.all_features_completed() {
                        epic.status = Status::Completed;
                        epic_completed = Some(epic.id.clone());
                    }
                    break;
                }
            }

            if !found {
                return Err(CoordinatorError::not_found("task", task_id));
            }

            g.prune_stale_blocked();
            plan::save(&self.root, &g)?;
            Ok(CompleteOutcome { task_id: task_id.to_string(), new_status: Status::Completed, epic_completed })
        })
    }
}
