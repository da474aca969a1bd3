use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AlreadyInitialized,
    NotFound,
    Malformed,
    SchemaError,
    LockTimeout,
    GitFailed,
    CheckoutFailed,
    MergeFailed,
    RemoveFailed,
    IgnoreUpdateFailed,
    BaselineFailed,
    NotAWorktree,
    BaseNotFound,
    DirectionMismatch,
    InvalidInput,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::NotFound => "NOT_FOUND",
            Self::Malformed => "MALFORMED",
            Self::SchemaError => "SCHEMA_ERROR",
            Self::LockTimeout => "LOCK_TIMEOUT",
            Self::GitFailed => "GIT_FAILED",
            Self::CheckoutFailed => "CHECKOUT_FAILED",
            Self::MergeFailed => "MERGE_FAILED",
            Self::RemoveFailed => "REMOVE_FAILED",
            Self::IgnoreUpdateFailed => "IGNORE_UPDATE_FAILED",
            Self::BaselineFailed => "BASELINE_FAILED",
            Self::NotAWorktree => "NOT_A_WORKTREE",
            Self::BaseNotFound => "BASE_NOT_FOUND",
            Self::DirectionMismatch => "DIRECTION_MISMATCH",
            Self::InvalidInput => "INVALID_INPUT",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct CoordinatorError {
    pub code: ErrorCode,
    pub message: String,
}

impl CoordinatorError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn already_initialized(path: &std::path::Path) -> Self {
        Self::new(
            ErrorCode::AlreadyInitialized,
            format!("a plan already exists at {}", path.display()),
        )
    }

    pub fn not_found(what: &str, reference: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("{what} not found: {reference}"))
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::Malformed, reason.into())
    }

    pub fn schema(errors: &[String]) -> Self {
        Self::new(
            ErrorCode::SchemaError,
            format!("plan failed validation:\n  - {}", errors.join("\n  - ")),
        )
    }

    pub fn lock_timeout(root: &std::path::Path) -> Self {
        Self::new(
            ErrorCode::LockTimeout,
            format!("timed out acquiring plan lock at {}", root.display()),
        )
    }

    pub fn git_failed(argv: &[String], output: &str) -> Self {
        Self::new(
            ErrorCode::GitFailed,
            format!("git {} failed: {}", argv.join(" "), output.trim()),
        )
    }

    pub fn checkout_failed(branch: &str, output: &str) -> Self {
        Self::new(
            ErrorCode::CheckoutFailed,
            format!("checkout of '{branch}' failed: {}", output.trim()),
        )
    }

    pub fn merge_failed(epic_id: &str, output: &str) -> Self {
        Self::new(
            ErrorCode::MergeFailed,
            format!("merge of epic '{epic_id}' failed: {}", output.trim()),
        )
    }

    pub fn remove_failed(epic_id: &str, output: &str) -> Self {
        Self::new(
            ErrorCode::RemoveFailed,
            format!("worktree removal for epic '{epic_id}' failed: {}", output.trim()),
        )
    }

    pub fn ignore_update_failed(output: &str) -> Self {
        Self::new(
            ErrorCode::IgnoreUpdateFailed,
            format!("could not stage/commit ignore-file update: {}", output.trim()),
        )
    }

    pub fn baseline_failed(epic_id: &str, output: &str) -> Self {
        Self::new(
            ErrorCode::BaselineFailed,
            format!("verification failed for epic '{epic_id}': {}", output.trim()),
        )
    }

    pub fn not_a_worktree() -> Self {
        Self::new(
            ErrorCode::NotAWorktree,
            "current directory is not an epic worktree (no .epic-marker found)",
        )
    }

    pub fn base_not_found() -> Self {
        Self::new(
            ErrorCode::BaseNotFound,
            "could not locate the base project from this worktree",
        )
    }

    pub fn direction_mismatch(context: &str, direction: &str) -> Self {
        Self::new(
            ErrorCode::DirectionMismatch,
            format!("direction '{direction}' is not valid from {context}"),
        )
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message.into())
    }
}

impl From<std::io::Error> for CoordinatorError {
    fn from(e: std::io::Error) -> Self {
        Self::malformed(e.to_string())
    }
}
