use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::git;
use crate::graph;
use crate::lock;
use crate::marker;
use crate::models::{LocalState, Marker, Status};
use crate::plan;

/// What `expand --verify` should run, resolved from the CLI flag:
/// absent, present with no explicit command (fall back to the external
/// `VerifyCommandSource`), or present with an explicit argv.
pub enum VerifyRequest {
    None,
    Default,
    Explicit(Vec<String>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpandedEpic {
    pub id: String,
    pub path: PathBuf,
    pub branch: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpandOutcome {
    pub created: Vec<ExpandedEpic>,
}

impl Coordinator {
    /// Create an isolated per-epic worktree for every epic that is
    /// currently ready. Runs entirely under the plan lock, since the git
    /// calls mutate repository state the plan writes observe. May persist
    /// partial progress: if a later epic fails, epics already created and
    /// saved earlier in this call remain (§4.6, §9).
    pub fn expand(&self, verify: VerifyRequest) -> Result<ExpandOutcome, CoordinatorError> {
        lock::with_lock(&self.root, None, || self.expand_locked(verify))
    }

    fn expand_locked(&self, verify: VerifyRequest) -> Result<ExpandOutcome, CoordinatorError> {
        let mut g = plan::load(&self.root)?;
        let ready_ids: Vec<String> = graph::parallel_tasks(&g).into_iter().map(|e| e.id.clone()).collect();

        let worktrees_dir = self.root.join(".worktrees");
        fs::create_dir_all(&worktrees_dir)?;
        self.ensure_worktrees_ignored()?;

        let current_branch = git::current_branch(&self.root).ok_or_else(|| {
            CoordinatorError::git_failed(
                &["rev-parse".to_string(), "--abbrev-ref".to_string(), "HEAD".to_string()],
                "HEAD is detached; expand requires a named branch",
            )
        })?;

        let mut created = Vec::new();

        for epic_id in ready_ids {
            if g.epic(&epic_id).and_then(|e| e.worktree.as_ref()).is_some() {
                continue;
            }

            let path = worktrees_dir.join(&epic_id);
            let output = git::add(&self.root, &path, &epic_id);
            if !output.status_success {
                plan::save(&self.root, &g)?;
                return Err(CoordinatorError::git_failed(
                    &["worktree".to_string(), "add".to_string(), "-B".to_string(), epic_id.clone(), path.display().to_string()],
                    &output.combined(),
                ));
            }

            let marker = Marker {
                epic: epic_id.clone(),
                base_worktree: self.root.display().to_string(),
                base_branch: current_branch.clone(),
                local: LocalState { status: Status::InProgress, started_at: Utc::now() },
                synced: None,
            };
            marker::write_marker(&path, &marker)?;

            let relative = format!(".worktrees/{epic_id}");
            if let Some(epic) = g.epic_mut(&epic_id) {
                epic.worktree = Some(relative);
                epic.status = Status::InProgress;
            }
            plan::save(&self.root, &g)?;

            created.push(ExpandedEpic { id: epic_id.clone(), path, branch: epic_id });
        }

        if let Some(cmd) = self.resolve_verify_command(verify) {
            for epic in &created {
                let (ok, output) = run_verify_command(&cmd, &epic.path);
                if !ok {
                    return Err(CoordinatorError::baseline_failed(&epic.id, &output));
                }
            }
        }

        Ok(ExpandOutcome { created })
    }

    fn resolve_verify_command(&self, verify: VerifyRequest) -> Option<Vec<String>> {
        match verify {
            VerifyRequest::None => None,
            VerifyRequest::Default => self.verify_source.default_command(&self.root),
            VerifyRequest::Explicit(cmd) => Some(cmd),
        }
    }

    fn ensure_worktrees_ignored(&self) -> Result<(), CoordinatorError> {
        if git::check_ignored(&self.root, ".worktrees") {
            return Ok(());
        }

        let ignore_path = self.root.join(".gitignore");
        let mut contents = fs::read_to_string(&ignore_path).unwrap_or_default();
        if !contents.is_empty() && !contents.ends_with('\n') {
            contents.push('\n');
        }
        contents.push_str(".worktrees\n");
        fs::write(&ignore_path, contents)?;

        let output = git::add_and_commit(&self.root, ".gitignore", "chore: ignore .worktrees directory");
        if !output.status_success {
            return Err(CoordinatorError::ignore_update_failed(&output.combined()));
        }
        Ok(())
    }
}

fn run_verify_command(cmd: &[String], cwd: &Path) -> (bool, String) {
    if cmd.is_empty() {
        return (true, String::new());
    }
    match std::process::Command::new(&cmd[0]).args(&cmd[1..]).current_dir(cwd).output() {
        Ok(output) => {
            let combined = format!(
                "{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
            (output.status.success(), combined)
        }
        Err(e) => (false, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command as StdCommand;
    use tempfile::tempdir;

    fn init_repo(root: &Path) {
        StdCommand::new("git").arg("init").current_dir(root).output().unwrap();
        StdCommand::new("git").args(["config", "user.email", "test@example.com"]).current_dir(root).output().unwrap();
        StdCommand::new("git").args(["config", "user.name", "Test"]).current_dir(root).output().unwrap();
        fs::write(root.join("plan.yaml"), "epics:\n  - id: a\n  - id: b\n    depends_on: [a]\n").unwrap();
        StdCommand::new("git").args(["add", "."]).current_dir(root).output().unwrap();
        StdCommand::new("git").args(["commit", "-m", "init"]).current_dir(root).output().unwrap();
    }

    #[test]
    fn creates_a_worktree_for_each_ready_epic() {
        let dir = tempdir().unwrap();
        init_repo(dir.path());
        let coordinator = Coordinator::new(dir.path().to_path_buf());
        let outcome = coordinator.expand(VerifyRequest::None).unwrap();
        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.created[0].id, "a");
        assert!(dir.path().join(".worktrees/a/.epic-marker").is_file());

        let graph = coordinator.status().unwrap();
        assert_eq!(graph.epics[0].status, Status::InProgress);
        assert_eq!(graph.epics[0].worktree.as_deref(), Some(".worktrees/a"));
    }

    #[test]
    fn is_idempotent_for_an_already_expanded_epic() {
        let dir = tempdir().unwrap();
        init_repo(dir.path());
        let coordinator = Coordinator::new(dir.path().to_path_buf());
        coordinator.expand(VerifyRequest::None).unwrap();
        let second = coordinator.expand(VerifyRequest::None).unwrap();
        assert!(second.created.is_empty());
    }

    #[test]
    fn explicit_verify_failure_reports_baseline_failed_but_keeps_worktree() {
        let dir = tempdir().unwrap();
        init_repo(dir.path());
        let coordinator = Coordinator::new(dir.path().to_path_buf());
        let err = coordinator
            .expand(VerifyRequest::Explicit(vec!["test".to_string(), "-f".to_string(), "NEVER".to_string()]))
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::BaselineFailed);
        assert!(dir.path().join(".worktrees/a").is_dir());
    }
}
