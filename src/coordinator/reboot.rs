use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::models::Status;
use crate::plan;

#[derive(Debug, Clone, Serialize)]
pub struct RebootSummary {
    pub completed_features: usize,
    pub remaining_features: usize,
    pub blocked_count: usize,
    pub project_goal: Option<String>,
    pub research_artifacts: Vec<String>,
}

impl Coordinator {
    /// Pure read: a small summary an agent can use to reorient itself
    /// after a restart — counts, not the full graph. `project_goal` comes
    /// from the external `ProjectGoalSource`, never hardcoded.
    pub fn reboot(&self) -> Result<RebootSummary, CoordinatorError> {
        let g = plan::load(&self.root)?;

        let mut completed_features = 0;
        let mut remaining_features = 0;
        for epic in &g.epics {
            for feature in &epic.features {
                if feature.status == Status::Completed {
                    completed_features += 1;
                } else {
                    remaining_features += 1;
                }
            }
        }

        Ok(RebootSummary {
            completed_features,
            remaining_features,
            blocked_count: g.blocked.len(),
            project_goal: self.goal_source.project_goal(&self.root),
            research_artifacts: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn counts_completed_and_remaining_features() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("plan.yaml"),
            "epics:\n  - id: a\n    features:\n      - id: a-1\n        status: completed\n      - id: a-2\n",
        )
        .unwrap();
        let coordinator = Coordinator::new(dir.path().to_path_buf());
        let summary = coordinator.reboot().unwrap();
        assert_eq!(summary.completed_features, 1);
        assert_eq!(summary.remaining_features, 1);
        assert_eq!(summary.blocked_count, 0);
        assert!(summary.project_goal.is_none());
        assert!(summary.research_artifacts.is_empty());
    }

    #[test]
    fn surfaces_project_goal_when_present() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("plan.yaml"),
            "epics:\n  - id: a\nproject_goal: ship the v2 scheduler\n",
        )
        .unwrap();
        let coordinator = Coordinator::new(dir.path().to_path_buf());
        let summary = coordinator.reboot().unwrap();
        assert_eq!(summary.project_goal.as_deref(), Some("ship the v2 scheduler"));
    }
}
