use chrono::{DateTime, TimeZone, Utc};

use crate::error::CoordinatorError;
use crate::graph::detect_cycle;
use crate::models::{Attempt, BlockedEntry, Epic, Feature, Graph, Status};
use crate::yaml::Value;

const TOP_LEVEL_FIELDS: &[&str] = &["epics", "blocked", "project_goal"];

/// Decode a parsed plan document into a `Graph`, collecting every schema
/// violation along the way rather than stopping at the first one. Returns
/// `SchemaError` listing all of them, or the fully decoded graph.
pub fn decode_and_validate(value: &Value) -> Result<Graph, CoordinatorError> {
    let mut errors = Vec::new();

    let top = match value.as_map() {
        Some(m) => m,
        None => return Err(CoordinatorError::malformed("plan root must be a mapping")),
    };

    for (key, _) in top {
        if !TOP_LEVEL_FIELDS.contains(&key.as_str()) {
            errors.push(format!("unknown top-level field '{key}'"));
        }
    }

    let epics_value = value.get("epics");
    let epics: Vec<Epic> = match epics_value.and_then(Value::as_seq) {
        Some(seq) => seq
            .iter()
            .enumerate()
            .map(|(idx, v)| decode_epic(v, idx, &mut errors))
            .collect(),
        None => {
            errors.push("missing required field 'epics'".to_string());
            Vec::new()
        }
    };

    let blocked: Vec<BlockedEntry> = value
        .get("blocked")
        .and_then(Value::as_seq)
        .map(|seq| {
            seq.iter()
                .enumerate()
                .map(|(idx, v)| decode_blocked_entry(v, idx, &mut errors))
                .collect()
        })
        .unwrap_or_default();

    let project_goal = value.get("project_goal").and_then(Value::as_str).map(String::from);

    validate_epics(&epics, &mut errors);

    if !errors.is_empty() {
        return Err(CoordinatorError::schema(&errors));
    }

    Ok(Graph { epics, blocked, project_goal })
}

fn validate_epics(epics: &[Epic], errors: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    for epic in epics {
        if !seen.insert(epic.id.as_str()) {
            errors.push(format!("duplicate epic id '{}'", epic.id));
        }
    }
    let epic_ids: std::collections::HashSet<&str> = epics.iter().map(|e| e.id.as_str()).collect();

    for epic in epics {
        for dep in &epic.depends_on {
            if !epic_ids.contains(dep.as_str()) {
                errors.push(format!("epic '{}' depends_on unknown epic '{dep}'", epic.id));
            }
        }

        let mut seen_features = std::collections::HashSet::new();
        for feature in &epic.features {
            if !seen_features.insert(feature.id.as_str()) {
                errors.push(format!("duplicate feature id '{}' in epic '{}'", feature.id, epic.id));
            }
        }
        let feature_ids: std::collections::HashSet<&str> =
            epic.features.iter().map(|f| f.id.as_str()).collect();
        for feature in &epic.features {
            for dep in &feature.depends_on {
                if !feature_ids.contains(dep.as_str()) {
                    errors.push(format!(
                        "feature '{}' in epic '{}' depends_on unknown feature '{dep}'",
                        feature.id, epic.id
                    ));
                }
            }
        }

        if let Some(cycle) = detect_cycle(
            &epic.features.iter().map(|f| f.id.clone()).collect::<Vec<_>>(),
            &epic
                .features
                .iter()
                .flat_map(|f| f.depends_on.iter().map(move |d| (f.id.clone(), d.clone())))
                .collect::<Vec<_>>(),
        ) {
            errors.push(format!(
                "cyclic feature dependency in epic '{}': {}",
                epic.id,
                describe_cycle(&cycle)
            ));
        }
    }

    let epic_nodes: Vec<String> = epics.iter().map(|e| e.id.clone()).collect();
    let epic_edges: Vec<(String, String)> = epics
        .iter()
        .flat_map(|e| e.depends_on.iter().map(move |d| (e.id.clone(), d.clone())))
        .collect();
    if let Some(cycle) = detect_cycle(&epic_nodes, &epic_edges) {
        errors.push(format!("cyclic epic dependency: {}", describe_cycle(&cycle)));
    }
}

fn describe_cycle(edges: &[(String, String)]) -> String {
    edges
        .iter()
        .map(|(a, b)| format!("{a} -> {b}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn decode_epic(value: &Value, idx: usize, errors: &mut Vec<String>) -> Epic {
    let id = match value.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            errors.push(format!("epics[{idx}]: missing required field 'id'"));
            format!("<missing-id-{idx}>")
        }
    };
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| id.clone());
    let spec_path = value.get("spec_path").and_then(Value::as_str).map(String::from);
    let status = decode_status(value, &id, errors);
    let worktree = value.get("worktree").and_then(Value::as_str).map(String::from);
    let depends_on = decode_string_seq(value.get("depends_on"));
    let features = value
        .get("features")
        .and_then(Value::as_seq)
        .map(|seq| {
            seq.iter()
                .enumerate()
                .map(|(fidx, v)| decode_feature(v, &id, fidx, errors))
                .collect()
        })
        .unwrap_or_default();

    Epic { id, name, spec_path, status, worktree, depends_on, features }
}

fn decode_feature(value: &Value, epic_id: &str, idx: usize, errors: &mut Vec<String>) -> Feature {
    let id = match value.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            errors.push(format!("epic '{epic_id}' features[{idx}]: missing required field 'id'"));
            format!("<missing-id-{idx}>")
        }
    };
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| id.clone());
    let status = decode_status(value, &id, errors);
    let depends_on = decode_string_seq(value.get("depends_on"));
    let source_requirement = value.get("source_requirement").and_then(Value::as_str).map(String::from);

    Feature { id, name, status, depends_on, source_requirement }
}

fn decode_status(value: &Value, context_id: &str, errors: &mut Vec<String>) -> Status {
    match value.get("status").and_then(Value::as_str) {
        Some(s) => Status::parse(s).unwrap_or_else(|| {
            errors.push(format!("'{context_id}': invalid status '{s}'"));
            Status::Pending
        }),
        None => Status::Pending,
    }
}

fn decode_string_seq(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_seq)
        .map(|seq| seq.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default()
}

fn decode_blocked_entry(value: &Value, idx: usize, errors: &mut Vec<String>) -> BlockedEntry {
    let task_id = match value.get("task_id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            errors.push(format!("blocked[{idx}]: missing required field 'task_id'"));
            format!("<missing-task-id-{idx}>")
        }
    };
    let reason = value.get("reason").and_then(Value::as_str).unwrap_or("").to_string();
    let blocked_at = decode_timestamp(value.get("blocked_at"), &task_id, errors);
    let attempts = value
        .get("attempts")
        .and_then(Value::as_seq)
        .map(|seq| {
            seq.iter()
                .map(|v| Attempt {
                    attempt_at: decode_timestamp(v.get("attempt_at"), &task_id, errors),
                    action: v.get("action").and_then(Value::as_str).unwrap_or("").to_string(),
                    result: v.get("result").and_then(Value::as_str).unwrap_or("").to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    BlockedEntry { task_id, reason, blocked_at, attempts }
}

fn decode_timestamp(value: Option<&Value>, context_id: &str, errors: &mut Vec<String>) -> DateTime<Utc> {
    match value.and_then(Value::as_str) {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| {
                errors.push(format!("'{context_id}': invalid timestamp '{s}'"));
                Utc.timestamp_opt(0, 0).unwrap()
            }),
        None => Utc.timestamp_opt(0, 0).unwrap(),
    }
}
