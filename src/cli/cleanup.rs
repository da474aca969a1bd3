use crate::cli::{build_coordinator, render};
use crate::output::text;

pub fn run(epics: Vec<String>, json_output: bool, root: Option<&str>) -> i32 {
    let epics = if epics.is_empty() { None } else { Some(epics) };
    let result = build_coordinator(root).and_then(|c| c.cleanup(epics));
    render(json_output, result, text::print_cleanup)
}
