use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::graph;
use crate::models::{Status, TaskRef};
use crate::plan;

#[derive(Debug, Clone, Serialize)]
pub struct NextTask {
    pub id: String,
    pub kind: &'static str,
    pub epic_id: String,
    pub status: Status,
    pub depends_on: Vec<String>,
}

impl<'a> From<(TaskRef<'a>, &'a str)> for NextTask {
    fn from((task, epic_id): (TaskRef<'a>, &'a str)) -> Self {
        let kind = match task {
            TaskRef::Epic(_) => "epic",
            TaskRef::Feature { .. } => "feature",
        };
        NextTask {
            id: task.id().to_string(),
            kind,
            epic_id: epic_id.to_string(),
            status: task.status(),
            depends_on: task.depends_on().to_vec(),
        }
    }
}

impl Coordinator {
    /// Pure read; no lock required. `None` means nothing is ready right
    /// now — everything is either blocked, completed, or waiting on a
    /// dependency.
    pub fn next(&self) -> Result<Option<NextTask>, CoordinatorError> {
        let g = plan::load(&self.root)?;
        Ok(graph::next_task(&g).map(|task| {
            let epic_id = match task {
                TaskRef::Epic(e) => e.id.as_str(),
                TaskRef::Feature { epic, .. } => epic.id.as_str(),
            };
            NextTask::from((task, epic_id))
        }))
    }
}
