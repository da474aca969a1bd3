use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::graph;
use crate::plan;

#[derive(Debug, Clone, Serialize)]
pub struct ParallelEpic {
    pub id: String,
    pub name: String,
    pub depends_on: Vec<String>,
}

impl Coordinator {
    /// Pure read; no lock required. Every ready pending epic, i.e. every
    /// epic `expand` would create a worktree for right now.
    pub fn parallel(&self) -> Result<Vec<ParallelEpic>, CoordinatorError> {
        let g = plan::load(&self.root)?;
        Ok(graph::parallel_tasks(&g)
            .into_iter()
            .map(|e| ParallelEpic { id: e.id.clone(), name: e.name.clone(), depends_on: e.depends_on.clone() })
            .collect())
    }
}
