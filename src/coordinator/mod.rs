//! Ties the Plan Store, Lock Service, Plan Model, Marker Store, and Git
//! Driver together: scheduling, state transitions, worktree lifecycle, and
//! bidirectional sync. One method per verb in the command surface; each
//! returns a structured result consumed by both the text and JSON renderers.

pub mod block;
pub mod cleanup;
pub mod complete;
pub mod expand;
pub mod init;
pub mod merge;
pub mod next;
pub mod parallel;
pub mod reboot;
pub mod status;
pub mod sync;

pub use block::BlockOutcome;
pub use cleanup::CleanupOutcome;
pub use complete::CompleteOutcome;
pub use expand::{ExpandOutcome, ExpandedEpic, VerifyRequest};
pub use init::InitOutcome;
pub use merge::{MergeOptions, MergeOutcome};
pub use next::NextTask;
pub use parallel::ParallelEpic;
pub use reboot::RebootSummary;
pub use sync::{ScanUpdate, SyncDirection, SyncOutcome};

use std::env;
use std::path::{Path, PathBuf};

use crate::error::CoordinatorError;
use crate::git;
use crate::plan;

/// A pluggable source for the default verification command `expand
/// --verify` runs when no explicit command is supplied. The Coordinator
/// Core never guesses a package-manager/test-runner command itself —
/// that detection is an out-of-scope external collaborator.
pub trait VerifyCommandSource {
    fn default_command(&self, root: &Path) -> Option<Vec<String>>;
}

/// The CLI's built-in answer: it has no opinion. `expand --verify` with no
/// explicit command and no external detector wired in is a no-op verify.
pub struct NoDefaultVerify;

impl VerifyCommandSource for NoDefaultVerify {
    fn default_command(&self, _root: &Path) -> Option<Vec<String>> {
        None
    }
}

/// A pluggable source for the informational `project_goal` string `reboot`
/// surfaces. The CLI's built-in implementation reads it straight out of
/// `plan.yaml`'s top-level mapping.
pub trait ProjectGoalSource {
    fn project_goal(&self, root: &Path) -> Option<String>;
}

pub struct PlanProjectGoal;

impl ProjectGoalSource for PlanProjectGoal {
    fn project_goal(&self, root: &Path) -> Option<String> {
        plan::load(root).ok().and_then(|g| g.project_goal)
    }
}

/// Bound to a single filesystem root — either a base project or one of its
/// worktrees. All in-memory state here is per-invocation; the plan and
/// marker files are the only state that outlives a command.
pub struct Coordinator {
    pub root: PathBuf,
    verify_source: Box<dyn VerifyCommandSource>,
    goal_source: Box<dyn ProjectGoalSource>,
}

impl Coordinator {
    pub fn new(root: PathBuf) -> Self {
        Self { root, verify_source: Box::new(NoDefaultVerify), goal_source: Box::new(PlanProjectGoal) }
    }

    pub fn with_sources(
        root: PathBuf,
        verify_source: Box<dyn VerifyCommandSource>,
        goal_source: Box<dyn ProjectGoalSource>,
    ) -> Self {
        Self { root, verify_source, goal_source }
    }

    /// A fresh Coordinator bound to a different root. Used for the base
    /// delegation `merge`/`sync` perform when invoked from inside a
    /// worktree: the mutation must land on the authoritative plan, not the
    /// worktree's (nonexistent) copy of it.
    fn at(&self, root: PathBuf) -> Coordinator {
        Coordinator::new(root)
    }

    /// Resolve the base project path via `git worktree list`: the first
    /// listed path that isn't under `.worktrees`. Used whenever a command
    /// invoked from inside a worktree must delegate to the authoritative
    /// plan (§4.6, §9 "Coordinator delegation").
    pub(crate) fn locate_base(&self) -> Result<PathBuf, CoordinatorError> {
        let paths = git::list(&self.root).map_err(|o| {
            CoordinatorError::git_failed(
                &["worktree".to_string(), "list".to_string(), "--porcelain".to_string()],
                &o.combined(),
            )
        })?;
        paths
            .into_iter()
            .find(|p| !p.components().any(|c| c.as_os_str() == ".worktrees"))
            .ok_or_else(CoordinatorError::base_not_found)
    }
}

/// Walk up from `start` (or the explicit override) looking for `.git`,
/// mirroring the teacher's git-root discovery. Works from both a base
/// project and a worktree: git worktrees carry their own `.git` file
/// pointing back at the shared git dir, so this finds whichever root the
/// caller is actually standing in rather than always resolving to base.
pub fn find_project_root(explicit: Option<&Path>) -> Result<PathBuf, CoordinatorError> {
    if let Some(p) = explicit {
        return std::fs::canonicalize(p)
            .map_err(|e| CoordinatorError::invalid_input(format!("invalid --root '{}': {e}", p.display())));
    }
    let mut dir = env::current_dir()?;
    loop {
        if dir.join(".git").exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(CoordinatorError::invalid_input(
                "not inside a git repository (no .git found in any parent directory)",
            ));
        }
    }
}
