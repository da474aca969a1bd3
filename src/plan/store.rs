use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CoordinatorError;
use crate::models::Graph;
use crate::plan::encode::graph_to_value;
use crate::plan::validate::decode_and_validate;
use crate::yaml;

pub fn plan_path(root: &Path) -> PathBuf {
    root.join("plan.yaml")
}

/// Read and validate `plan.yaml` at `root`. *NotFound* if absent,
/// *Malformed* if unparsable, *SchemaError* if validation fails.
pub fn load(root: &Path) -> Result<Graph, CoordinatorError> {
    let path = plan_path(root);
    if !path.exists() {
        return Err(CoordinatorError::not_found("plan", &path.display().to_string()));
    }
    let text = fs::read_to_string(&path)?;
    let value = yaml::parse(&text).map_err(|e| CoordinatorError::malformed(e.to_string()))?;
    decode_and_validate(&value)
}

/// Serialize `graph` deterministically and write it atomically. Callers
/// must hold the plan lock.
pub fn save(root: &Path, graph: &Graph) -> Result<(), CoordinatorError> {
    let path = plan_path(root);
    let value = graph_to_value(graph);
    let text = yaml::to_string(&value);
    write_atomic(&path, &text)
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), CoordinatorError> {
    let tmp = path.with_extension("yaml.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("plan.yaml"),
            "epics:\n  - id: a\n    name: Epic A\n",
        )
        .unwrap();
        let graph = load(dir.path()).unwrap();
        save(dir.path(), &graph).unwrap();
        let reloaded = load(dir.path()).unwrap();
        assert_eq!(reloaded.epics[0].id, "a");
    }

    #[test]
    fn save_then_load_round_trips_features_and_dependencies() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("plan.yaml"),
            "epics:\n  - id: a\n    features:\n      - id: a-1\n      - id: a-2\n        depends_on: [a-1]\n  - id: b\n    depends_on: [a]\n",
        )
        .unwrap();
        let graph = load(dir.path()).unwrap();
        save(dir.path(), &graph).unwrap();
        let reloaded = load(dir.path()).unwrap();
        assert_eq!(reloaded.epics.len(), 2);
        assert_eq!(reloaded.epics[0].features.len(), 2);
        assert_eq!(reloaded.epics[0].features[1].depends_on, vec!["a-1".to_string()]);
        assert_eq!(reloaded.epics[1].depends_on, vec!["a".to_string()]);
    }

    #[test]
    fn load_missing_plan_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }
}
