#[allow(deprecated)]
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        git(dir.path(), &["init"]);
        git(dir.path(), &["config", "user.email", "test@example.com"]);
        git(dir.path(), &["config", "user.name", "Test"]);
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn cmd_in(&self, cwd: &Path) -> Command {
        let mut cmd = Command::cargo_bin("epictask").expect("binary");
        cmd.current_dir(cwd);
        cmd
    }

    fn run_json_in(&self, cwd: &Path, args: &[&str]) -> (Value, i32) {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd_in(cwd).args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        let v = serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"));
        (v, output.status.code().unwrap_or(-1))
    }

    fn run_json(&self, args: &[&str]) -> (Value, i32) {
        self.run_json_in(self.root(), args)
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let (v, code) = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        assert_eq!(code, 0, "expected exit 0");
        v
    }

    fn run_ok_in(&self, cwd: &Path, args: &[&str]) -> Value {
        let (v, code) = self.run_json_in(cwd, args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        assert_eq!(code, 0, "expected exit 0");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let (v, code) = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        assert_ne!(code, 0, "expected nonzero exit");
        v
    }

    fn write_plan(&self, content: &str) {
        fs::write(self.root().join("plan.yaml"), content).expect("write plan.yaml");
    }

    fn commit_all(&self, message: &str) {
        git(self.root(), &["add", "."]);
        git(self.root(), &["commit", "-m", message]);
    }
}

fn git(root: &Path, args: &[&str]) {
    let output = StdCommand::new("git").args(args).current_dir(root).output().expect("run git");
    assert!(output.status.success(), "git {args:?} failed: {}", String::from_utf8_lossy(&output.stderr));
}

// ─── 1. init ───────────────────────────────────────────────────────

#[test]
fn test_init_creates_empty_plan() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    let path = v["data"]["path"].as_str().unwrap();
    assert!(PathBuf::from(path).exists());

    let v = env.run_ok(&["status"]);
    assert_eq!(v["data"]["epics"].as_array().unwrap().len(), 0);
}

#[test]
fn test_init_refuses_to_overwrite() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["init"]);
    assert_eq!(v["error"]["code"], "ALREADY_INITIALIZED");
}

// ─── 2. status / next / parallel ────────────────────────────────────

#[test]
fn test_next_and_parallel_reflect_readiness() {
    let env = TestEnv::new();
    env.write_plan("epics:\n  - id: a\n  - id: b\n    depends_on: [a]\n");

    let v = env.run_ok(&["next"]);
    assert_eq!(v["data"]["id"], "a");

    let v = env.run_ok(&["parallel"]);
    let ids: Vec<&str> = v["data"].as_array().unwrap().iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a"]);
}

#[test]
fn test_next_is_null_when_nothing_is_ready() {
    let env = TestEnv::new();
    env.write_plan("epics:\n  - id: a\n    status: completed\n");
    let v = env.run_ok(&["next"]);
    assert!(v["data"].is_null());
}

// ─── 3. complete / block ────────────────────────────────────────────

#[test]
fn test_complete_unknown_task_is_not_found() {
    let env = TestEnv::new();
    env.write_plan("epics:\n  - id: a\n");
    let v = env.run_err(&["complete", "ghost"]);
    assert_eq!(v["error"]["code"], "NOT_FOUND");
}

#[test]
fn test_block_records_a_reason() {
    let env = TestEnv::new();
    env.write_plan("epics:\n  - id: a\n");
    let v = env.run_ok(&["block", "a", "waiting on design review"]);
    assert_eq!(v["data"]["reason"], "waiting on design review");

    let v = env.run_ok(&["status"]);
    assert_eq!(v["data"]["epics"][0]["status"], "blocked");
    assert_eq!(v["data"]["blocked"].as_array().unwrap().len(), 1);
}

// ─── 4. ready epic, expand, merge (scenario 1) ──────────────────────

#[test]
fn test_ready_epic_expand_complete_merge() {
    let env = TestEnv::new();
    env.write_plan("epics:\n  - id: a\n    features:\n      - id: a-1\n  - id: b\n    depends_on: [a]\n");
    env.commit_all("initial plan");

    let v = env.run_ok(&["expand"]);
    let created = v["data"]["created"].as_array().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["id"], "a");
    assert!(env.root().join(".worktrees/a/.epic-marker").is_file());

    let v = env.run_ok(&["status"]);
    assert_eq!(v["data"]["epics"][0]["status"], "in_progress");

    env.run_ok(&["complete", "a-1"]);
    let v = env.run_ok(&["status"]);
    assert_eq!(v["data"]["epics"][0]["status"], "completed");

    let v = env.run_ok(&["merge"]);
    assert_eq!(v["data"]["merged"].as_array().unwrap(), &vec![Value::String("a".to_string())]);
}

// ─── 5. blocked on dependency, sync from worktree (scenario 2) ─────

#[test]
fn test_sync_from_worktree_reports_blocked_dependency() {
    let env = TestEnv::new();
    env.write_plan("epics:\n  - id: a\n  - id: b\n    depends_on: [a]\n");
    env.commit_all("initial plan");
    env.run_ok(&["expand"]);

    let worktree_b = env.root().join(".worktrees/b");
    fs::create_dir_all(&worktree_b).unwrap();
    fs::write(
        worktree_b.join(".epic-marker"),
        format!(
            "epic: b\nbase_worktree: {}\nbase_branch: main\nlocal:\n  status: in_progress\n  started_at: \"1970-01-01T00:00:00+00:00\"\n",
            env.root().display()
        ),
    )
    .unwrap();

    let v = env.run_ok_in(&worktree_b, &["sync"]);
    assert_eq!(v["data"]["epic"], "b");
    assert_eq!(v["data"]["direction"], "both");
    assert_eq!(v["data"]["synced"]["blocked_by"].as_array().unwrap(), &vec![Value::String("a".to_string())]);
    assert_eq!(v["data"]["synced"]["dependencies"]["a"], "in_progress");
}

// ─── 6. stale lock recovery (scenario 3) ────────────────────────────

#[test]
fn test_stale_lock_is_reclaimed() {
    let env = TestEnv::new();
    env.write_plan("epics:\n  - id: a\n");

    let lock_path = env.root().join(".plan-lock");
    fs::write(&lock_path, "stale").unwrap();
    let touch = StdCommand::new("touch")
        .args(["-d", "60 seconds ago"])
        .arg(&lock_path)
        .output()
        .expect("touch");
    assert!(touch.status.success());

    let v = env.run_ok(&["complete", "a"]);
    assert_eq!(v["data"]["new_status"], "completed");
}

// ─── 7. cycle rejected at load (scenario 4) ─────────────────────────

#[test]
fn test_cyclic_plan_is_rejected() {
    let env = TestEnv::new();
    env.write_plan("epics:\n  - id: a\n    depends_on: [b]\n  - id: b\n    depends_on: [a]\n");
    let v = env.run_err(&["status"]);
    assert_eq!(v["error"]["code"], "SCHEMA_ERROR");
    assert!(v["error"]["message"].as_str().unwrap().contains("cyclic epic dependency"));
}

// ─── 8. verified expand failure (scenario 5) ────────────────────────

#[test]
fn test_expand_with_failing_verify_reports_baseline_failed() {
    let env = TestEnv::new();
    env.write_plan("epics:\n  - id: c\n");
    env.commit_all("initial plan");

    let v = env.run_err(&["expand", "--verify", "test", "-f", "NEVER"]);
    assert_eq!(v["error"]["code"], "BASELINE_FAILED");
    assert!(env.root().join(".worktrees/c").is_dir());

    let v = env.run_ok(&["status"]);
    assert_eq!(v["data"]["epics"][0]["status"], "in_progress");
}

// ─── 9. scan sync from base (scenario 6) ────────────────────────────

#[test]
fn test_scan_sync_from_base_applies_worktree_status() {
    let env = TestEnv::new();
    env.write_plan("epics:\n  - id: d\n");
    env.commit_all("initial plan");
    env.run_ok(&["expand"]);

    let worktree_d = env.root().join(".worktrees/d");
    fs::write(
        worktree_d.join(".epic-marker"),
        format!(
            "epic: d\nbase_worktree: {}\nbase_branch: main\nlocal:\n  status: completed\n  started_at: \"1970-01-01T00:00:00+00:00\"\n",
            env.root().display()
        ),
    )
    .unwrap();

    let v = env.run_ok(&["sync"]);
    assert_eq!(v["data"]["scanned"], 1);
    let updates = v["data"]["updates"].as_array().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["epic"], "d");
    assert_eq!(updates[0]["old_status"], "in_progress");
    assert_eq!(updates[0]["new_status"], "completed");

    let v = env.run_ok(&["status"]);
    assert_eq!(v["data"]["epics"][0]["status"], "completed");
}

// ─── 10. reboot summary ─────────────────────────────────────────────

#[test]
fn test_reboot_summarizes_progress() {
    let env = TestEnv::new();
    env.write_plan(
        "epics:\n  - id: a\n    features:\n      - id: a-1\n        status: completed\n      - id: a-2\nproject_goal: ship the v2 scheduler\n",
    );

    let v = env.run_ok(&["reboot"]);
    assert_eq!(v["data"]["completed_features"], 1);
    assert_eq!(v["data"]["remaining_features"], 1);
    assert_eq!(v["data"]["project_goal"], "ship the v2 scheduler");
}

// ─── 11. cleanup ─────────────────────────────────────────────────────

#[test]
fn test_cleanup_removes_completed_epic_worktree() {
    let env = TestEnv::new();
    env.write_plan("epics:\n  - id: a\n");
    env.commit_all("initial plan");
    env.run_ok(&["expand"]);
    env.run_ok(&["complete", "a"]);

    let v = env.run_ok(&["cleanup"]);
    assert_eq!(v["data"]["removed"].as_array().unwrap(), &vec![Value::String(".worktrees/a".to_string())]);
    assert!(!env.root().join(".worktrees/a").exists());
}

// ─── 12. not a git repository ───────────────────────────────────────

#[test]
fn test_status_outside_a_git_repo_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("epictask").expect("binary");
    cmd.current_dir(dir.path()).args(["status", "--json"]);
    let output = cmd.output().expect("run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let v: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v["success"], false);
    assert_eq!(v["error"]["code"], "INVALID_INPUT");
}
