use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of a git invocation: never panics on nonzero exit, just reports
/// it alongside whatever the process printed.
pub struct GitOutput {
    pub status_success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn combined(&self) -> String {
        if self.stderr.trim().is_empty() {
            self.stdout.clone()
        } else if self.stdout.trim().is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout.trim(), self.stderr.trim())
        }
    }
}

/// Every call goes through `std::process::Command` with an argv array —
/// never a shell string — and reports its result instead of panicking.
fn run(root: &Path, args: &[&str]) -> GitOutput {
    let output = Command::new("git").args(args).current_dir(root).output();
    match output {
        Ok(output) => GitOutput {
            status_success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Err(e) => GitOutput { status_success: false, stdout: String::new(), stderr: e.to_string() },
    }
}

pub fn is_git_repo(root: &Path) -> bool {
    run(root, &["rev-parse", "--is-inside-work-tree"]).status_success
}

/// Create a worktree at `worktree_path` on a new branch `branch`, from
/// the caller's current HEAD.
pub fn add(root: &Path, worktree_path: &Path, branch: &str) -> GitOutput {
    run(root, &["worktree", "add", "-B", branch, &worktree_path.to_string_lossy()])
}

/// Ordered sequence of worktree paths, parsed from the porcelain listing
/// by pulling out every line starting with the literal `worktree ` prefix.
pub fn list(root: &Path) -> Result<Vec<PathBuf>, GitOutput> {
    let output = run(root, &["worktree", "list", "--porcelain"]);
    if !output.status_success {
        return Err(output);
    }
    Ok(output
        .stdout
        .lines()
        .filter_map(|line| line.strip_prefix("worktree "))
        .map(PathBuf::from)
        .collect())
}

pub fn remove(root: &Path, worktree_path: &Path) -> GitOutput {
    run(root, &["worktree", "remove", "--force", &worktree_path.to_string_lossy()])
}

pub fn checkout(root: &Path, branch: &str) -> GitOutput {
    run(root, &["checkout", branch])
}

/// `merge --no-ff` to preserve a visible record of each epic's history.
pub fn merge(root: &Path, branch: &str, message: &str) -> GitOutput {
    run(root, &["merge", "--no-ff", branch, "-m", message])
}

/// Resolves HEAD to a branch name. `None` if HEAD is detached (empty or
/// literal `HEAD`).
pub fn current_branch(root: &Path) -> Option<String> {
    let output = run(root, &["rev-parse", "--abbrev-ref", "HEAD"]);
    if !output.status_success {
        return None;
    }
    let branch = output.stdout.trim();
    if branch.is_empty() || branch == "HEAD" {
        None
    } else {
        Some(branch.to_string())
    }
}

pub fn check_ignored(root: &Path, path: &str) -> bool {
    run(root, &["check-ignore", "-q", path]).status_success
}

pub fn add_and_commit(root: &Path, path: &str, message: &str) -> GitOutput {
    let staged = run(root, &["add", path]);
    if !staged.status_success {
        return staged;
    }
    run(root, &["commit", "-m", message])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command as StdCommand;
    use tempfile::tempdir;

    fn init_repo(root: &Path) {
        StdCommand::new("git").arg("init").current_dir(root).output().unwrap();
        StdCommand::new("git")
            .args(["config", "user.email", "test@example.com"])
            .current_dir(root)
            .output()
            .unwrap();
        StdCommand::new("git").args(["config", "user.name", "Test"]).current_dir(root).output().unwrap();
        std::fs::write(root.join("README.md"), "hello\n").unwrap();
        StdCommand::new("git").args(["add", "."]).current_dir(root).output().unwrap();
        StdCommand::new("git")
            .args(["commit", "-m", "init"])
            .current_dir(root)
            .output()
            .unwrap();
    }

    #[test]
    fn detects_git_repos() {
        let dir = tempdir().unwrap();
        assert!(!is_git_repo(dir.path()));
        init_repo(dir.path());
        assert!(is_git_repo(dir.path()));
    }

    #[test]
    fn add_and_list_round_trip() {
        let dir = tempdir().unwrap();
        init_repo(dir.path());
        let worktree = dir.path().join(".worktrees").join("a");
        std::fs::create_dir_all(worktree.parent().unwrap()).unwrap();
        let output = add(dir.path(), &worktree, "a");
        assert!(output.status_success, "{}", output.combined());
        let paths = list(dir.path()).unwrap();
        assert!(paths.iter().any(|p| p == &worktree || p.ends_with("a")));
    }

    #[test]
    fn current_branch_resolves_head() {
        let dir = tempdir().unwrap();
        init_repo(dir.path());
        assert!(current_branch(dir.path()).is_some());
    }
}
