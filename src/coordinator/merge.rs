use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::git;
use crate::lock;
use crate::marker;
use crate::models::Status;
use crate::plan;

#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub base_branch: Option<String>,
    pub epics: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    pub merged: Vec<String>,
    pub target_branch: String,
}

impl Coordinator {
    /// Integrate one or more completed epics' branches back to a base
    /// branch. If invoked from within a worktree, the epic id is inferred
    /// from the marker and the call is delegated to a Coordinator bound to
    /// the base, so the plan mutation lands at the authoritative location
    /// (§4.6, §9).
    pub fn merge(&self, opts: MergeOptions) -> Result<MergeOutcome, CoordinatorError> {
        if marker::is_worktree_root(&self.root) {
            let local_marker = marker::read_marker(&self.root)?;
            let base_root = self.locate_base()?;
            let base = self.at(base_root);
            let epics = match opts.epics {
                Some(ids) if !ids.is_empty() => ids,
                _ => vec![local_marker.epic.clone()],
            };
            return base.merge_at_base(MergeOptions { base_branch: opts.base_branch, epics: Some(epics) });
        }
        self.merge_at_base(opts)
    }

    fn merge_at_base(&self, opts: MergeOptions) -> Result<MergeOutcome, CoordinatorError> {
        lock::with_lock(&self.root, None, || {
            let mut g = plan::load(&self.root)?;

            let target_epics: Vec<String> = match opts.epics {
                Some(ids) => ids,
                None => g.epics.iter().filter(|e| e.status == Status::Completed).map(|e| e.id.clone()).collect(),
            };

            let missing: Vec<&str> =
                target_epics.iter().filter(|id| g.epic(id).is_none()).map(|s| s.as_str()).collect();
            if !missing.is_empty() {
                return Err(CoordinatorError::not_found("epic", &missing.join(", ")));
            }

            let target_branch = match opts.base_branch {
                Some(b) => b,
                None => git::current_branch(&self.root)
                    .ok_or_else(|| CoordinatorError::checkout_failed("HEAD", "HEAD is detached"))?,
            };

            let checkout = git::checkout(&self.root, &target_branch);
            if !checkout.status_success {
                return Err(CoordinatorError::checkout_failed(&target_branch, &checkout.combined()));
            }

            let mut merged = Vec::new();
            for epic_id in &target_epics {
                let message = format!("feat: integrate {epic_id} epic");
                let output = git::merge(&self.root, epic_id, &message);
                if !output.status_success {
                    if !merged.is_empty() {
                        plan::save(&self.root, &g)?;
                    }
                    return Err(CoordinatorError::merge_failed(epic_id, &output.combined()));
                }
                if let Some(epic) = g.epic_mut(epic_id) {
                    epic.status = Status::Completed;
                }
                merged.push(epic_id.clone());
            }

            if !merged.is_empty() {
                plan::save(&self.root, &g)?;
            }

            Ok(MergeOutcome { merged, target_branch })
        })
    }
}
