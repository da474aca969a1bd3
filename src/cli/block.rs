use crate::cli::{build_coordinator, render};
use crate::output::text;

pub fn run(id: &str, reason: &str, json_output: bool, root: Option<&str>) -> i32 {
    let result = build_coordinator(root).and_then(|c| c.block(id, reason));
    render(json_output, result, text::print_block)
}
