use chrono::{DateTime, Utc};
use serde::Serialize;

/// The four-value lifecycle every Epic and Feature moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
            Status::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Status::Pending),
            "in_progress" => Some(Status::InProgress),
            "completed" => Some(Status::Completed),
            "blocked" => Some(Status::Blocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub depends_on: Vec<String>,
    pub source_requirement: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Epic {
    pub id: String,
    pub name: String,
    pub spec_path: Option<String>,
    pub status: Status,
    pub worktree: Option<String>,
    pub depends_on: Vec<String>,
    pub features: Vec<Feature>,
}

impl Epic {
    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn feature_mut(&mut self, id: &str) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| f.id == id)
    }

    pub fn all_features_completed(&self) -> bool {
        !self.features.is_empty() && self.features.iter().all(|f| f.status == Status::Completed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    pub attempt_at: DateTime<Utc>,
    pub action: String,
    pub result: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockedEntry {
    pub task_id: String,
    pub reason: String,
    pub blocked_at: DateTime<Utc>,
    pub attempts: Vec<Attempt>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    pub epics: Vec<Epic>,
    pub blocked: Vec<BlockedEntry>,
    pub project_goal: Option<String>,
}

impl Graph {
    pub fn epic(&self, id: &str) -> Option<&Epic> {
        self.epics.iter().find(|e| e.id == id)
    }

    pub fn epic_mut(&mut self, id: &str) -> Option<&mut Epic> {
        self.epics.iter_mut().find(|e| e.id == id)
    }

    pub fn task_by_id(&self, id: &str) -> Option<TaskRef<'_>> {
        task_by_id_in(&self.epics, id)
    }

    /// Drop any `blocked` entry whose task is no longer `blocked` (§3
    /// "Blocked registry": stale entries are "expected to be cleaned by
    /// writers"). Called by every writer that moves a task away from
    /// `blocked`.
    pub fn prune_stale_blocked(&mut self) {
        let epics = &self.epics;
        self.blocked.retain(|entry| {
            matches!(task_by_id_in(epics, &entry.task_id).map(|t| t.status()), Some(Status::Blocked))
        });
    }
}

fn task_by_id_in<'a>(epics: &'a [Epic], id: &str) -> Option<TaskRef<'a>> {
    if let Some(epic) = epics.iter().find(|e| e.id == id) {
        return Some(TaskRef::Epic(epic));
    }
    for epic in epics {
        if let Some(feature) = epic.feature(id) {
            return Some(TaskRef::Feature { epic, feature });
        }
    }
    None
}

/// A closed, two-variant sum over the only task kinds in the graph,
/// exposing the interface scheduling and status code care about without
/// forcing callers to match on `Epic`/`Feature` themselves.
#[derive(Debug, Clone, Copy)]
pub enum TaskRef<'a> {
    Epic(&'a Epic),
    Feature { epic: &'a Epic, feature: &'a Feature },
}

impl<'a> TaskRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            TaskRef::Epic(e) => &e.id,
            TaskRef::Feature { feature, .. } => &feature.id,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            TaskRef::Epic(e) => e.status,
            TaskRef::Feature { feature, .. } => feature.status,
        }
    }

    pub fn depends_on(&self) -> &'a [String] {
        match self {
            TaskRef::Epic(e) => &e.depends_on,
            TaskRef::Feature { feature, .. } => &feature.depends_on,
        }
    }

    /// `true` iff every dependency id in `completed` is satisfied.
    /// `completed` is the completed-epics set when `self` is an `Epic`,
    /// and the completed-features-within-this-epic set when `self` is a
    /// `Feature` — callers get these from `graph::readiness`.
    pub fn is_ready(&self, completed: &std::collections::HashSet<&str>) -> bool {
        self.status() == Status::Pending && self.depends_on().iter().all(|d| completed.contains(d.as_str()))
    }
}
