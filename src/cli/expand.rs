use crate::cli::{build_coordinator, render};
use crate::coordinator::VerifyRequest;
use crate::output::text;

pub fn run(verify: Option<Vec<String>>, json_output: bool, root: Option<&str>) -> i32 {
    let verify = match verify {
        None => VerifyRequest::None,
        Some(cmd) if cmd.is_empty() => VerifyRequest::Default,
        Some(cmd) => VerifyRequest::Explicit(cmd),
    };
    let result = build_coordinator(root).and_then(|c| c.expand(verify));
    render(json_output, result, text::print_expand)
}
