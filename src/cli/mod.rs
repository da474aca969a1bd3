pub mod block;
pub mod cleanup;
pub mod commands;
pub mod complete;
pub mod expand;
pub mod init;
pub mod merge;
pub mod next;
pub mod parallel;
pub mod reboot;
pub mod status;
pub mod sync;

use std::path::Path;

use crate::coordinator::{self, Coordinator};
use crate::error::CoordinatorError;
use crate::output;

fn build_coordinator(root: Option<&str>) -> Result<Coordinator, CoordinatorError> {
    let root_path = coordinator::find_project_root(root.map(Path::new))?;
    Ok(Coordinator::new(root_path))
}

/// Shared `Result -> exit code` rendering every verb module uses: JSON
/// envelope or a text printer on success, the typed error either way on
/// failure. Exit code is 0 on success, 1 on any `CoordinatorError`.
fn render<T: serde::Serialize>(
    json_output: bool,
    result: Result<T, CoordinatorError>,
    text_printer: impl FnOnce(&T),
) -> i32 {
    match result {
        Ok(value) => {
            if json_output {
                output::json::print_success(&value);
            } else {
                text_printer(&value);
            }
            0
        }
        Err(e) => {
            if json_output {
                output::json::print_error(&e);
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}
