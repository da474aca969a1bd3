use crate::models::{BlockedEntry, Epic, Feature, Graph, Status};
use crate::yaml::Value;

/// Serialize a `Graph` back to the `Value` tree the writer renders,
/// matching the field order the plan file's schema example uses so a
/// human-authored file keeps a familiar shape after a round trip.
pub fn graph_to_value(graph: &Graph) -> Value {
    let mut top = Vec::new();
    top.push(("epics".to_string(), Value::Seq(graph.epics.iter().map(epic_to_value).collect())));
    top.push((
        "blocked".to_string(),
        Value::Seq(graph.blocked.iter().map(blocked_entry_to_value).collect()),
    ));
    if let Some(goal) = &graph.project_goal {
        top.push(("project_goal".to_string(), Value::Str(goal.clone())));
    }
    Value::Map(top)
}

fn epic_to_value(epic: &Epic) -> Value {
    let mut fields = vec![
        ("id".to_string(), Value::Str(epic.id.clone())),
        ("name".to_string(), Value::Str(epic.name.clone())),
        ("status".to_string(), Value::Str(epic.status.as_str().to_string())),
    ];
    if let Some(spec_path) = &epic.spec_path {
        fields.push(("spec_path".to_string(), Value::Str(spec_path.clone())));
    }
    fields.push((
        "worktree".to_string(),
        match &epic.worktree {
            Some(w) => Value::Str(w.clone()),
            None => Value::Null,
        },
    ));
    fields.push((
        "depends_on".to_string(),
        Value::Seq(epic.depends_on.iter().map(|d| Value::Str(d.clone())).collect()),
    ));
    fields.push((
        "features".to_string(),
        Value::Seq(epic.features.iter().map(feature_to_value).collect()),
    ));
    Value::Map(fields)
}

fn feature_to_value(feature: &Feature) -> Value {
    let mut fields = vec![
        ("id".to_string(), Value::Str(feature.id.clone())),
        ("name".to_string(), Value::Str(feature.name.clone())),
        ("status".to_string(), Value::Str(feature.status.as_str().to_string())),
        (
            "depends_on".to_string(),
            Value::Seq(feature.depends_on.iter().map(|d| Value::Str(d.clone())).collect()),
        ),
    ];
    if let Some(source) = &feature.source_requirement {
        fields.push(("source_requirement".to_string(), Value::Str(source.clone())));
    }
    Value::Map(fields)
}

fn blocked_entry_to_value(entry: &BlockedEntry) -> Value {
    Value::Map(vec![
        ("task_id".to_string(), Value::Str(entry.task_id.clone())),
        ("reason".to_string(), Value::Str(entry.reason.clone())),
        ("blocked_at".to_string(), Value::Str(entry.blocked_at.to_rfc3339())),
        (
            "attempts".to_string(),
            Value::Seq(
                entry
                    .attempts
                    .iter()
                    .map(|a| {
                        Value::Map(vec![
                            ("attempt_at".to_string(), Value::Str(a.attempt_at.to_rfc3339())),
                            ("action".to_string(), Value::Str(a.action.clone())),
                            ("result".to_string(), Value::Str(a.result.clone())),
                        ])
                    })
                    .collect(),
            ),
        ),
    ])
}

pub fn status_to_value(status: Status) -> Value {
    Value::Str(status.as_str().to_string())
}
