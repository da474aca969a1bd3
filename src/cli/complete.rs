use crate::cli::{build_coordinator, render};
use crate::output::text;

pub fn run(id: &str, json_output: bool, root: Option<&str>) -> i32 {
    let result = build_coordinator(root).and_then(|c| c.complete(id));
    render(json_output, result, text::print_complete)
}
