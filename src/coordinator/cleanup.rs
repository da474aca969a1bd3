use std::fs;

use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::git;
use crate::lock;
use crate::models::Status;
use crate::plan;

#[derive(Debug, Clone, Serialize)]
pub struct CleanupOutcome {
    pub removed: Vec<String>,
}

impl Coordinator {
    /// Under lock: for each target epic (explicit list, or every
    /// `completed` epic when none given), remove its worktree registration
    /// and any residual directory, then clear the epic's `worktree` field.
    /// Fails *RemoveFailed* on the first git error and reports only the
    /// paths actually removed before that point.
    pub fn cleanup(&self, epics: Option<Vec<String>>) -> Result<CleanupOutcome, CoordinatorError> {
        lock::with_lock(&self.root, None, || {
            let mut g = plan::load(&self.root)?;

            let target_ids: Vec<String> = match epics {
                Some(ids) => ids,
                None => g.epics.iter().filter(|e| e.status == Status::Completed).map(|e| e.id.clone()).collect(),
            };

            let mut removed = Vec::new();
            for epic_id in &target_ids {
                let relative = match g.epic(epic_id).and_then(|e| e.worktree.clone()) {
                    Some(w) => w,
                    None => continue,
                };

                let path = self.root.join(&relative);
                let output = git::remove(&self.root, &path);
                if !output.status_success {
                    if !removed.is_empty() {
                        plan::save(&self.root, &g)?;
                    }
                    return Err(CoordinatorError::remove_failed(epic_id, &output.combined()));
                }

                if path.exists() {
                    let _ = fs::remove_dir_all(&path);
                }

                if let Some(epic) = g.epic_mut(epic_id) {
                    epic.worktree = None;
                }
                removed.push(relative);
            }

            if !removed.is_empty() {
                plan::save(&self.root, &g)?;
            }

            Ok(CleanupOutcome { removed })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::expand::VerifyRequest;
    use std::path::Path;
    use std::process::Command as StdCommand;
    use tempfile::tempdir;

    fn init_repo(root: &Path) {
        StdCommand::new("git").arg("init").current_dir(root).output().unwrap();
        StdCommand::new("git").args(["config", "user.email", "test@example.com"]).current_dir(root).output().unwrap();
        StdCommand::new("git").args(["config", "user.name", "Test"]).current_dir(root).output().unwrap();
        fs::write(root.join("plan.yaml"), "epics:\n  - id: a\n").unwrap();
        StdCommand::new("git").args(["add", "."]).current_dir(root).output().unwrap();
        StdCommand::new("git").args(["commit", "-m", "init"]).current_dir(root).output().unwrap();
    }

    #[test]
    fn removes_a_completed_epics_worktree() {
        let dir = tempdir().unwrap();
        init_repo(dir.path());
        let coordinator = Coordinator::new(dir.path().to_path_buf());
        coordinator.expand(VerifyRequest::None).unwrap();
        coordinator.complete("a").unwrap();

        let outcome = coordinator.cleanup(None).unwrap();
        assert_eq!(outcome.removed, vec![".worktrees/a".to_string()]);
        assert!(!dir.path().join(".worktrees/a").exists());
        let graph = coordinator.status().unwrap();
        assert!(graph.epics[0].worktree.is_none());
    }
}
