use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};

use crate::error::CoordinatorError;
use crate::models::{LocalState, Marker, Status, SyncedState};
use crate::yaml::{self, Value};

const MARKER_FILE: &str = ".epic-marker";

pub fn marker_path(worktree_root: &Path) -> PathBuf {
    worktree_root.join(MARKER_FILE)
}

/// A worktree root is identified purely by the marker file's presence.
pub fn is_worktree_root(root: &Path) -> bool {
    marker_path(root).is_file()
}

pub fn read_marker(worktree_root: &Path) -> Result<Marker, CoordinatorError> {
    let path = marker_path(worktree_root);
    let text = fs::read_to_string(&path)
        .map_err(|_| CoordinatorError::not_found("marker", &path.display().to_string()))?;
    let value = yaml::parse(&text).map_err(|e| CoordinatorError::malformed(e.to_string()))?;
    decode_marker(&value)
}

pub fn write_marker(worktree_root: &Path, marker: &Marker) -> Result<(), CoordinatorError> {
    let value = encode_marker(marker);
    let text = yaml::to_string(&value);
    fs::write(marker_path(worktree_root), text)?;
    Ok(())
}

fn decode_marker(value: &Value) -> Result<Marker, CoordinatorError> {
    let epic = value
        .get("epic")
        .and_then(Value::as_str)
        .ok_or_else(|| CoordinatorError::malformed("marker missing 'epic'"))?
        .to_string();
    let base_worktree = value
        .get("base_worktree")
        .and_then(Value::as_str)
        .ok_or_else(|| CoordinatorError::malformed("marker missing 'base_worktree'"))?
        .to_string();
    let base_branch = value
        .get("base_branch")
        .and_then(Value::as_str)
        .ok_or_else(|| CoordinatorError::malformed("marker missing 'base_branch'"))?
        .to_string();

    let local_value = value
        .get("local")
        .ok_or_else(|| CoordinatorError::malformed("marker missing 'local'"))?;
    let local = LocalState {
        status: local_value
            .get("status")
            .and_then(Value::as_str)
            .and_then(Status::parse)
            .ok_or_else(|| CoordinatorError::malformed("marker 'local.status' missing or invalid"))?,
        started_at: parse_timestamp(local_value.get("started_at"))
            .ok_or_else(|| CoordinatorError::malformed("marker 'local.started_at' missing or invalid"))?,
    };

    let synced = match value.get("synced") {
        Some(v) if !v.is_null() => Some(SyncedState {
            last_sync: parse_timestamp(v.get("last_sync")).unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap()),
            dependencies: v
                .get("dependencies")
                .and_then(Value::as_map)
                .map(|m| {
                    m.iter()
                        .filter_map(|(k, v)| Status::parse(v.as_str()?).map(|s| (k.clone(), s)))
                        .collect()
                })
                .unwrap_or_default(),
            dependents: string_seq(v.get("dependents")),
            blocked_by: string_seq(v.get("blocked_by")),
            dag_status: v
                .get("dag_status")
                .and_then(Value::as_str)
                .and_then(Status::parse)
                .unwrap_or(Status::Pending),
        }),
        _ => None,
    };

    Ok(Marker { epic, base_worktree, base_branch, local, synced })
}

fn string_seq(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_seq)
        .map(|seq| seq.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default()
}

fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let s = value?.as_str()?;
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc))
}

fn encode_marker(marker: &Marker) -> Value {
    let mut fields = vec![
        ("epic".to_string(), Value::Str(marker.epic.clone())),
        ("base_worktree".to_string(), Value::Str(marker.base_worktree.clone())),
        ("base_branch".to_string(), Value::Str(marker.base_branch.clone())),
        (
            "local".to_string(),
            Value::Map(vec![
                ("status".to_string(), Value::Str(marker.local.status.as_str().to_string())),
                ("started_at".to_string(), Value::Str(marker.local.started_at.to_rfc3339())),
            ]),
        ),
    ];
    fields.push((
        "synced".to_string(),
        match &marker.synced {
            Some(s) => encode_synced(s),
            None => Value::Null,
        },
    ));
    Value::Map(fields)
}

fn encode_synced(synced: &SyncedState) -> Value {
    let dependencies: BTreeMap<String, Value> = synced
        .dependencies
        .iter()
        .map(|(id, status)| (id.clone(), Value::Str(status.as_str().to_string())))
        .collect();
    Value::Map(vec![
        ("last_sync".to_string(), Value::Str(synced.last_sync.to_rfc3339())),
        (
            "dependencies".to_string(),
            Value::Map(dependencies.into_iter().collect()),
        ),
        (
            "dependents".to_string(),
            Value::Seq(synced.dependents.iter().map(|d| Value::Str(d.clone())).collect()),
        ),
        (
            "blocked_by".to_string(),
            Value::Seq(synced.blocked_by.iter().map(|d| Value::Str(d.clone())).collect()),
        ),
        ("dag_status".to_string(), Value::Str(synced.dag_status.as_str().to_string())),
    ])
}
