use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::models::Graph;
use crate::plan;

#[derive(Debug, Clone, Serialize)]
pub struct InitOutcome {
    pub path: String,
}

impl Coordinator {
    /// Write a fresh, empty `plan.yaml` at the root. *AlreadyInitialized*
    /// if one exists there already; this never overwrites a plan.
    pub fn init(&self) -> Result<InitOutcome, CoordinatorError> {
        let path = plan::plan_path(&self.root);
        if path.exists() {
            return Err(CoordinatorError::already_initialized(&path));
        }
        let graph = Graph { epics: Vec::new(), blocked: Vec::new(), project_goal: None };
        plan::save(&self.root, &graph)?;
        Ok(InitOutcome { path: path.display().to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_an_empty_plan() {
        let dir = tempdir().unwrap();
        let coordinator = Coordinator::new(dir.path().to_path_buf());
        coordinator.init().unwrap();
        let graph = coordinator.status().unwrap();
        assert!(graph.epics.is_empty());
    }

    #[test]
    fn refuses_to_overwrite_an_existing_plan() {
        let dir = tempdir().unwrap();
        let coordinator = Coordinator::new(dir.path().to_path_buf());
        coordinator.init().unwrap();
        let err = coordinator.init().unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::AlreadyInitialized);
    }
}
