use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use crate::error::CoordinatorError;

const STALE_THRESHOLD: Duration = Duration::from_secs(30);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const INITIAL_BACKOFF: Duration = Duration::from_millis(50);
const MAX_BACKOFF: Duration = Duration::from_millis(500);

fn lock_path(root: &Path) -> PathBuf {
    root.join(".plan-lock")
}

/// Run `f` while holding the file-based advisory lock at
/// `<root>/.plan-lock`. The lock is released (best-effort) whether `f`
/// succeeds or fails. Keep `f` small: read, compute, write.
pub fn with_lock<T>(
    root: &Path,
    timeout: Option<Duration>,
    f: impl FnOnce() -> Result<T, CoordinatorError>,
) -> Result<T, CoordinatorError> {
    acquire(root, timeout.unwrap_or(DEFAULT_TIMEOUT))?;
    let result = f();
    release(root);
    result
}

fn acquire(root: &Path, timeout: Duration) -> Result<(), CoordinatorError> {
    let path = lock_path(root);
    let deadline = Instant::now() + timeout;
    let mut backoff = INITIAL_BACKOFF;

    loop {
        match create_exclusive(&path) {
            Ok(()) => return Ok(()),
            Err(_) => {
                if is_stale(&path) {
                    reclaim(&path);
                    continue;
                }
                if Instant::now() >= deadline {
                    return Err(CoordinatorError::lock_timeout(root));
                }
                std::thread::sleep(backoff.min(deadline.saturating_duration_since(Instant::now())));
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }
}

fn create_exclusive(path: &Path) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let metadata = format!(
        "pid={}\nacquired_at={}\nhostname={}\n",
        std::process::id(),
        now_iso8601(),
        hostname(),
    );
    file.write_all(metadata.as_bytes())?;
    Ok(())
}

fn is_stale(path: &Path) -> bool {
    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => match modified.elapsed() {
            Ok(elapsed) => elapsed > STALE_THRESHOLD,
            Err(_) => false,
        },
        Err(_) => false,
    }
}

/// Atomically rename the existing lock file aside so a subsequent
/// exclusive-create attempt can proceed. If another process wins this
/// race, the rename fails silently and the caller just retries.
fn reclaim(path: &Path) {
    let side = path.with_extension(format!("stale.{}", std::process::id()));
    let _ = fs::rename(path, side);
}

fn release(root: &Path) {
    let _ = fs::remove_file(lock_path(root));
}

fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Set a lock file's modification time into the past, for tests that need
/// to exercise stale-lock reclaim without sleeping 30 seconds.
#[cfg(test)]
fn backdate(path: &Path, age: Duration) {
    let past = SystemTime::now() - age;
    let file = OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(past).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn acquires_and_releases_lock() {
        let dir = tempdir().unwrap();
        let result = with_lock(dir.path(), None, || Ok::<_, CoordinatorError>(42));
        assert_eq!(result.unwrap(), 42);
        assert!(!lock_path(dir.path()).exists());
    }

    #[test]
    fn releases_lock_even_on_failure() {
        let dir = tempdir().unwrap();
        let result: Result<(), CoordinatorError> =
            with_lock(dir.path(), None, || Err(CoordinatorError::invalid_input("boom")));
        assert!(result.is_err());
        assert!(!lock_path(dir.path()).exists());
    }

    #[test]
    fn reclaims_stale_lock() {
        let dir = tempdir().unwrap();
        create_exclusive(&lock_path(dir.path())).unwrap();
        backdate(&lock_path(dir.path()), Duration::from_secs(60));
        let result = with_lock(dir.path(), Some(Duration::from_millis(500)), || {
            Ok::<_, CoordinatorError>(())
        });
        assert!(result.is_ok());
    }

    #[test]
    fn times_out_on_a_fresh_contended_lock() {
        let dir = tempdir().unwrap();
        create_exclusive(&lock_path(dir.path())).unwrap();
        let result = with_lock(dir.path(), Some(Duration::from_millis(120)), || {
            Ok::<_, CoordinatorError>(())
        });
        assert!(result.is_err());
        let _ = fs::remove_file(lock_path(dir.path()));
    }
}
