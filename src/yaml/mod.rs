//! A small, dependency-free reader/writer for the restricted YAML subset
//! `plan.yaml` and `.epic-marker` are written in: scalar key/value pairs,
//! nested mappings, sequences of scalars or of maps, `#` comments, and
//! null/bool/number/plain-or-quoted-string scalars.
//!
//! This is deliberately not a general YAML implementation. It exists because
//! the plan format is simple enough that a full YAML crate would be
//! overkill, and because the plan/marker files need to stay legible and
//! diff-friendly for humans reviewing an agent's progress.

mod parser;
mod value;
mod writer;

pub use parser::{parse, ParseError};
pub use value::Value;
pub use writer::to_string;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_nested_structure() {
        let input = "\
epics:
  - id: a
    name: Epic A
    status: pending
    worktree: null
    depends_on: []
    features:
      - id: a-1
        name: Feature One
        status: pending
        depends_on: [a-0]
blocked: []
";
        let value = parse(input).expect("parse");
        let rendered = to_string(&value);
        let reparsed = parse(&rendered).expect("reparse");
        assert_eq!(value, reparsed);
    }

    #[test]
    fn quotes_strings_needing_it_on_write() {
        let mut map = Vec::new();
        map.push(("reason".to_string(), Value::Str("blocked: needs review".into())));
        map.push(("empty".to_string(), Value::Str(String::new())));
        map.push(("padded".to_string(), Value::Str(" leading space".into())));
        let value = Value::Map(map);
        let rendered = to_string(&value);
        assert!(rendered.contains("reason: \"blocked: needs review\""));
        assert!(rendered.contains("empty: \"\""));
        assert!(rendered.contains("padded: \" leading space\""));
    }
}
