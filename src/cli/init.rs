use crate::cli::{build_coordinator, render};
use crate::output::text;

pub fn run(json_output: bool, root: Option<&str>) -> i32 {
    let result = build_coordinator(root).and_then(|c| c.init());
    render(json_output, result, text::print_init)
}
