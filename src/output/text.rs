use crate::coordinator::{
    BlockOutcome, CleanupOutcome, CompleteOutcome, ExpandOutcome, InitOutcome, MergeOutcome, NextTask,
    ParallelEpic, RebootSummary, ScanUpdate, SyncOutcome,
};
use crate::models::Graph;

pub fn print_init(outcome: &InitOutcome) {
    println!("Initialized plan at {}", outcome.path);
}

pub fn print_status(g: &Graph) {
    for epic in &g.epics {
        println!("[{}] {} ({})", epic.status.as_str(), epic.name, epic.id);
        if let Some(worktree) = &epic.worktree {
            println!("    worktree: {worktree}");
        }
        for feature in &epic.features {
            println!("    [{}] {} ({})", feature.status.as_str(), feature.name, feature.id);
        }
    }
    if !g.blocked.is_empty() {
        println!("\nBlocked:");
        for entry in &g.blocked {
            println!("  {} - {} (since {})", entry.task_id, entry.reason, entry.blocked_at);
        }
    }
}

pub fn print_next(task: &Option<NextTask>) {
    match task {
        Some(t) => println!("Next {}: {} (epic {})", t.kind, t.id, t.epic_id),
        None => println!("No ready tasks."),
    }
}

pub fn print_parallel(epics: &[ParallelEpic]) {
    if epics.is_empty() {
        println!("No epics are ready to run in parallel.");
        return;
    }
    for epic in epics {
        println!("{} ({})", epic.name, epic.id);
    }
}

pub fn print_complete(outcome: &CompleteOutcome) {
    println!("Completed {} -> {}", outcome.task_id, outcome.new_status.as_str());
    if let Some(epic_id) = &outcome.epic_completed {
        println!("  all features done, epic {epic_id} is now completed");
    }
}

pub fn print_block(outcome: &BlockOutcome) {
    println!("Blocked {}: {} (at {})", outcome.task_id, outcome.reason, outcome.blocked_at);
}

pub fn print_expand(outcome: &ExpandOutcome) {
    if outcome.created.is_empty() {
        println!("No ready epics to expand.");
        return;
    }
    for epic in &outcome.created {
        println!("Created worktree for {} at {} (branch {})", epic.id, epic.path.display(), epic.branch);
    }
}

pub fn print_merge(outcome: &MergeOutcome) {
    if outcome.merged.is_empty() {
        println!("Nothing to merge.");
        return;
    }
    println!("Merged into {}: {}", outcome.target_branch, outcome.merged.join(", "));
}

pub fn print_cleanup(outcome: &CleanupOutcome) {
    if outcome.removed.is_empty() {
        println!("Nothing to clean up.");
        return;
    }
    println!("Removed: {}", outcome.removed.join(", "));
}

pub fn print_reboot(summary: &RebootSummary) {
    if let Some(goal) = &summary.project_goal {
        println!("Project goal: {goal}");
    }
    println!("Features: {} completed, {} remaining", summary.completed_features, summary.remaining_features);
    println!("Blocked entries: {}", summary.blocked_count);
}

pub fn print_sync(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Worktree { epic, direction, synced } => {
            println!("Synced epic {epic} ({direction})");
            println!("  dag_status: {}", synced.dag_status.as_str());
            if !synced.blocked_by.is_empty() {
                println!("  blocked_by: {}", synced.blocked_by.join(", "));
            }
        }
        SyncOutcome::Base { scanned, updates } => {
            println!("Scanned {scanned} worktree(s)");
            for update in updates {
                print_scan_update(update);
            }
        }
    }
}

fn print_scan_update(update: &ScanUpdate) {
    println!("  {}: {} -> {}", update.epic, update.old_status.as_str(), update.new_status.as_str());
}
