use super::value::Value;

/// Render a `Value` back to the on-disk text form. Mappings and sequences
/// are indented two spaces per level; scalar strings are quoted only when
/// a plain scalar would be ambiguous or lossy on re-parse.
pub fn to_string(value: &Value) -> String {
    let mut out = String::new();
    write_block(&mut out, value, 0);
    out
}

fn write_block(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Map(entries) => write_map(out, entries, indent),
        Value::Seq(items) => write_seq(out, items, indent),
        other => {
            out.push_str(&pad(indent));
            out.push_str(&scalar_to_string(other));
            out.push('\n');
        }
    }
}

fn write_map(out: &mut String, entries: &[(String, Value)], indent: usize) {
    if entries.is_empty() {
        out.push_str(&pad(indent));
        out.push_str("{}\n");
        return;
    }
    for (key, value) in entries {
        match value {
            Value::Map(m) if !m.is_empty() => {
                out.push_str(&pad(indent));
                out.push_str(key);
                out.push_str(":\n");
                write_map(out, m, indent + 2);
            }
            Value::Seq(s) if !s.is_empty() && contains_map(s) => {
                out.push_str(&pad(indent));
                out.push_str(key);
                out.push_str(":\n");
                write_seq(out, s, indent + 2);
            }
            _ => {
                out.push_str(&pad(indent));
                out.push_str(key);
                out.push_str(": ");
                out.push_str(&inline_value(value));
                out.push('\n');
            }
        }
    }
}

fn write_seq(out: &mut String, items: &[Value], indent: usize) {
    if items.is_empty() {
        out.push_str(&pad(indent));
        out.push_str("[]\n");
        return;
    }
    for item in items {
        match item {
            Value::Map(m) if !m.is_empty() => {
                let mut lines = String::new();
                write_map(&mut lines, m, indent + 2);
                let mut lines = lines.lines();
                let first = lines.next().unwrap_or("");
                out.push_str(&pad(indent));
                out.push_str("- ");
                out.push_str(first.trim_start());
                out.push('\n');
                for line in lines {
                    out.push_str(line);
                    out.push('\n');
                }
            }
            _ => {
                out.push_str(&pad(indent));
                out.push_str("- ");
                out.push_str(&inline_value(item));
                out.push('\n');
            }
        }
    }
}

fn contains_map(items: &[Value]) -> bool {
    items.iter().any(|v| matches!(v, Value::Map(m) if !m.is_empty()))
}

/// Render a value that sits on the same line as its key or dash: scalars
/// inline directly, empty containers as `{}`/`[]`, non-empty flat
/// sequences of scalars as `[a, b]`.
fn inline_value(value: &Value) -> String {
    match value {
        Value::Map(m) if m.is_empty() => "{}".to_string(),
        Value::Seq(s) if s.is_empty() => "[]".to_string(),
        Value::Seq(s) if !contains_map(s) => {
            let items: Vec<String> = s.iter().map(scalar_to_string).collect();
            format!("[{}]", items.join(", "))
        }
        other => scalar_to_string(other),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Str(s) => quote_if_needed(s),
        Value::Seq(_) | Value::Map(_) => inline_value(value),
    }
}

fn quote_if_needed(s: &str) -> String {
    if needs_quoting(s) {
        format!("\"{}\"", escape(s))
    } else {
        s.to_string()
    }
}

fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s.starts_with(' ') || s.ends_with(' ') {
        return true;
    }
    if s.contains(':') || s.contains('#') || s.contains('"') || s.contains('\'') || s.contains('\n') {
        return true;
    }
    if s == "null" || s == "~" || s == "true" || s == "false" {
        return true;
    }
    if s.parse::<i64>().is_ok() || s.parse::<f64>().is_ok() {
        return true;
    }
    if s.starts_with('-') || s.starts_with('[') || s.starts_with('{') || s.starts_with('&') || s.starts_with('*') {
        return true;
    }
    false
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn pad(indent: usize) -> String {
    " ".repeat(indent)
}
