use std::collections::HashSet;

use crate::models::{Epic, Graph, Status, TaskRef};

/// Ids of epics currently `completed`.
pub fn completed_epics(g: &Graph) -> HashSet<&str> {
    g.epics
        .iter()
        .filter(|e| e.status == Status::Completed)
        .map(|e| e.id.as_str())
        .collect()
}

/// Ids of features currently `completed` within a single epic.
pub fn completed_features<'a>(epic: &'a Epic) -> HashSet<&'a str> {
    epic.features
        .iter()
        .filter(|f| f.status == Status::Completed)
        .map(|f| f.id.as_str())
        .collect()
}

pub fn epic_ready(epic: &Epic, completed_epics: &HashSet<&str>) -> bool {
    TaskRef::Epic(epic).is_ready(completed_epics)
}

pub fn feature_ready(epic: &Epic, feature_id: &str, completed_in_epic: &HashSet<&str>) -> bool {
    match epic.feature(feature_id) {
        Some(feature) => TaskRef::Feature { epic, feature }.is_ready(completed_in_epic),
        None => false,
    }
}

/// Ids of tasks that became ready as a side effect of `just_completed_id`
/// finishing: epics newly ready at the top level, plus features inside
/// in-progress epics that listed `just_completed_id` as a dependency.
pub fn newly_available(g: &Graph, just_completed_id: &str) -> Vec<String> {
    let mut out = Vec::new();
    let completed = completed_epics(g);
    for epic in &g.epics {
        if epic.status == Status::Pending
            && epic.depends_on.iter().any(|d| d == just_completed_id)
            && epic_ready(epic, &completed)
        {
            out.push(epic.id.clone());
        }
        if epic.status == Status::InProgress {
            let completed_in_epic = completed_features(epic);
            for feature in &epic.features {
                if feature.status == Status::Pending
                    && feature.depends_on.iter().any(|d| d == just_completed_id)
                    && feature_ready(epic, &feature.id, &completed_in_epic)
                {
                    out.push(feature.id.clone());
                }
            }
        }
    }
    out
}
