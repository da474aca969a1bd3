use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::models::Graph;
use crate::plan;

/// Pure read; no lock required. The whole plan is a small enough
/// structured view that `status` just hands back the decoded `Graph` for
/// the renderer to summarize.
impl Coordinator {
    pub fn status(&self) -> Result<Graph, CoordinatorError> {
        plan::load(&self.root)
    }
}
