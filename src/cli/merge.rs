use crate::cli::{build_coordinator, render};
use crate::coordinator::MergeOptions;
use crate::output::text;

pub fn run(base: Option<String>, epics: Vec<String>, json_output: bool, root: Option<&str>) -> i32 {
    let epics = if epics.is_empty() { None } else { Some(epics) };
    let result = build_coordinator(root).and_then(|c| c.merge(MergeOptions { base_branch: base, epics }));
    render(json_output, result, text::print_merge)
}
