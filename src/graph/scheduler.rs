use crate::graph::readiness::{completed_epics, completed_features, epic_ready, feature_ready};
use crate::models::{Graph, Status, TaskRef};

/// First match wins, in this order:
/// 1. any Feature currently `in_progress` (first in document order within
///    the first `in_progress` epic that has one);
/// 2. any ready Feature inside an `in_progress` epic;
/// 3. any ready Epic in `pending` state.
pub fn next_task(g: &Graph) -> Option<TaskRef<'_>> {
    for epic in &g.epics {
        if epic.status != Status::InProgress {
            continue;
        }
        if let Some(feature) = epic.features.iter().find(|f| f.status == Status::InProgress) {
            return Some(TaskRef::Feature { epic, feature });
        }
    }

    for epic in &g.epics {
        if epic.status != Status::InProgress {
            continue;
        }
        let completed_in_epic = completed_features(epic);
        if let Some(feature) = epic
            .features
            .iter()
            .find(|f| feature_ready(epic, &f.id, &completed_in_epic))
        {
            return Some(TaskRef::Feature { epic, feature });
        }
    }

    let completed = completed_epics(g);
    g.epics
        .iter()
        .find(|epic| epic.status == Status::Pending && epic_ready(epic, &completed))
        .map(TaskRef::Epic)
}

/// All ready epics currently in `pending` state.
pub fn parallel_tasks(g: &Graph) -> Vec<&crate::models::Epic> {
    let completed = completed_epics(g);
    g.epics
        .iter()
        .filter(|epic| epic.status == Status::Pending && epic_ready(epic, &completed))
        .collect()
}
