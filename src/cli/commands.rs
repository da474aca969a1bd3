use clap::{Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "epictask",
    version = VERSION,
    about = "DAG-based task coordinator with git-worktree orchestration",
    after_help = "\
NOTE:
  Requires a git repository with a plan.yaml at its root (or a worktree
  created by `expand`, identified by a .epic-marker file).

EXIT CODES:
  0  Success
  1  Error (see the printed error code and message)

COMMANDS THAT MUTATE THE PLAN:
  complete, block, expand, merge, cleanup, sync (to-base/both)
  all acquire the advisory .plan-lock before touching plan.yaml.

WORKTREE AWARENESS:
  `merge` and `sync`, run from inside a `.worktrees/<epic>` directory,
  delegate to the base project automatically — the epic id comes from
  the local .epic-marker, not from an explicit argument."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Operate against this project root instead of discovering one from
    /// the current directory by walking up for `.git`
    #[arg(long, global = true)]
    pub root: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty plan.yaml at the project root
    Init,

    /// Show the full plan: every epic, its features, and blocked entries
    Status,

    /// Report the single next task to work on, by the scheduling tie-break
    Next,

    /// List every pending epic that is currently ready to expand
    Parallel,

    /// Mark a task completed; an epic completes once all its features do
    Complete {
        /// Epic or feature id
        id: String,
    },

    /// Mark a task blocked and record a reason
    Block {
        /// Epic or feature id
        id: String,
        /// Why it's blocked
        reason: String,
    },

    /// Create a worktree for every ready epic
    #[command(after_help = "\
NOTE:
  --verify with no command falls back to an external default-command
  detector; with no detector wired in, that is a no-op verify.
  --verify <cmd...> runs that exact command inside each newly created
  worktree; a nonzero exit fails the command but does not remove the
  worktree (left for inspection).")]
    Expand {
        /// Run a verification command inside each newly created worktree
        #[arg(long, num_args = 0.., allow_hyphen_values = true, value_name = "CMD")]
        verify: Option<Vec<String>>,
    },

    /// Integrate one or more completed epics' branches back to a base branch
    Merge {
        /// Target branch to merge into (defaults to the current branch)
        #[arg(long)]
        base: Option<String>,
        /// Epic ids to merge (defaults to every completed epic)
        epics: Vec<String>,
    },

    /// Remove worktrees for completed epics (or the ones named)
    Cleanup {
        /// Epic ids to clean up (defaults to every completed epic)
        epics: Vec<String>,
    },

    /// Reconcile a worktree's marker with the base plan, or scan from base
    #[command(after_help = "\
DIRECTIONS:
  from-base  pull dependency/status info down into the local marker
  to-base    push the local marker's status up into the base plan
  both       do both, in that order (default from a worktree)
  scan       base-only: read every worktree marker and apply status
             changes to the base plan (default from a base)")]
    Sync {
        #[arg(long)]
        direction: Option<String>,
    },

    /// Summarize progress for reorienting after a restart
    Reboot,
}
