use crate::cli::{build_coordinator, render};
use crate::coordinator::SyncDirection;
use crate::error::CoordinatorError;
use crate::output::text;

pub fn run(direction: Option<String>, json_output: bool, root: Option<&str>) -> i32 {
    let result = (|| {
        let direction = match direction {
            None => None,
            Some(s) => Some(
                SyncDirection::parse(&s)
                    .ok_or_else(|| CoordinatorError::invalid_input(format!("unknown sync direction '{s}'")))?,
            ),
        };
        build_coordinator(root)?.sync(direction)
    })();
    render(json_output, result, text::print_sync)
}
