use super::value::Value;

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

type Line = (usize, String);

/// Parse a whole document into a single `Value` (a `Map` for every plan
/// and marker file this crate writes).
pub fn parse(input: &str) -> Result<Value, ParseError> {
    let lines = tokenize(input)?;
    if lines.is_empty() {
        return Ok(Value::Map(Vec::new()));
    }
    let base_indent = lines[0].0;
    let (value, next) = parse_block(&lines, 0, base_indent)?;
    if next != lines.len() {
        return Err(ParseError::new(format!(
            "unexpected indentation at line {}: '{}'",
            next + 1,
            lines[next].1
        )));
    }
    Ok(value)
}

fn tokenize(input: &str) -> Result<Vec<Line>, ParseError> {
    let mut out = Vec::new();
    for raw in input.lines() {
        let no_comment = strip_comment(raw);
        let trimmed_end = no_comment.trim_end();
        if trimmed_end.trim().is_empty() {
            continue;
        }
        let indent = trimmed_end.len() - trimmed_end.trim_start().len();
        if trimmed_end[..indent].contains('\t') {
            return Err(ParseError::new("tabs are not allowed for indentation"));
        }
        out.push((indent, trimmed_end[indent..].to_string()));
    }
    Ok(out)
}

fn strip_comment(line: &str) -> &str {
    let mut in_squote = false;
    let mut in_dquote = false;
    let bytes = line.as_bytes();
    for (i, c) in line.char_indices() {
        match c {
            '\'' if !in_dquote => in_squote = !in_squote,
            '"' if !in_squote => in_dquote = !in_dquote,
            '#' if !in_squote && !in_dquote => {
                if i == 0 || bytes[i - 1] == b' ' || bytes[i - 1] == b'\t' {
                    return &line[..i];
                }
            }
            _ => {}
        }
    }
    line
}

/// Parse a block (mapping or sequence) whose entries all sit at `indent`,
/// starting at `pos`. Returns the parsed value and the index of the first
/// line not consumed.
fn parse_block(lines: &[Line], pos: usize, indent: usize) -> Result<(Value, usize), ParseError> {
    if pos >= lines.len() || lines[pos].0 < indent {
        return Ok((Value::Map(Vec::new()), pos));
    }
    if lines[pos].0 > indent {
        return Err(ParseError::new(format!(
            "unexpected indentation at line '{}'",
            lines[pos].1
        )));
    }
    if is_seq_item(&lines[pos].1) {
        parse_seq(lines, pos, indent)
    } else {
        parse_map(lines, pos, indent)
    }
}

fn is_seq_item(content: &str) -> bool {
    content == "-" || content.starts_with("- ")
}

fn parse_map(lines: &[Line], mut pos: usize, indent: usize) -> Result<(Value, usize), ParseError> {
    let mut entries = Vec::new();
    while pos < lines.len() && lines[pos].0 == indent {
        let content = lines[pos].1.clone();
        if is_seq_item(&content) {
            break;
        }
        let (key, rest) = split_key_value(&content)?;
        pos += 1;
        if rest.trim().is_empty() {
            if pos < lines.len() && lines[pos].0 > indent {
                let child_indent = lines[pos].0;
                let (child, next) = parse_block(lines, pos, child_indent)?;
                entries.push((key, child));
                pos = next;
            } else {
                entries.push((key, Value::Null));
            }
        } else {
            entries.push((key, parse_scalar_or_inline(rest.trim())?));
        }
    }
    Ok((Value::Map(entries), pos))
}

fn parse_seq(lines: &[Line], mut pos: usize, indent: usize) -> Result<(Value, usize), ParseError> {
    let mut items = Vec::new();
    let item_indent = indent + 2;
    while pos < lines.len() && lines[pos].0 == indent && is_seq_item(&lines[pos].1) {
        let content = lines[pos].1.clone();
        let after_dash = if content == "-" { "" } else { &content[2..] };
        pos += 1;
        if after_dash.trim().is_empty() {
            if pos < lines.len() && lines[pos].0 > indent {
                let child_indent = lines[pos].0;
                let (child, next) = parse_block(lines, pos, child_indent)?;
                items.push(child);
                pos = next;
            } else {
                items.push(Value::Null);
            }
            continue;
        }
        if looks_like_map_entry(after_dash) {
            let (key, rest) = split_key_value(after_dash)?;
            let mut map_entries = Vec::new();
            if rest.trim().is_empty() {
                if pos < lines.len() && lines[pos].0 > item_indent {
                    let child_indent = lines[pos].0;
                    let (child, next) = parse_block(lines, pos, child_indent)?;
                    map_entries.push((key, child));
                    pos = next;
                } else {
                    map_entries.push((key, Value::Null));
                }
            } else {
                map_entries.push((key, parse_scalar_or_inline(rest.trim())?));
            }
            while pos < lines.len() && lines[pos].0 == item_indent {
                let content2 = lines[pos].1.clone();
                let (key2, rest2) = split_key_value(&content2)?;
                pos += 1;
                if rest2.trim().is_empty() {
                    if pos < lines.len() && lines[pos].0 > item_indent {
                        let child_indent = lines[pos].0;
                        let (child, next) = parse_block(lines, pos, child_indent)?;
                        map_entries.push((key2, child));
                        pos = next;
                    } else {
                        map_entries.push((key2, Value::Null));
                    }
                } else {
                    map_entries.push((key2, parse_scalar_or_inline(rest2.trim())?));
                }
            }
            items.push(Value::Map(map_entries));
        } else {
            items.push(parse_scalar_or_inline(after_dash.trim())?);
        }
    }
    Ok((Value::Seq(items), pos))
}

/// Heuristic: a sequence item line is a one-line map entry (`- key: value`)
/// rather than a bare scalar (`- value`) iff it contains an unquoted colon
/// followed by a space or end of line before any quote starts.
fn looks_like_map_entry(s: &str) -> bool {
    split_key_value(s).is_ok() && {
        let bytes = s.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] as char {
                '"' | '\'' => return false,
                ':' if i + 1 == bytes.len() || bytes[i + 1] == b' ' => return true,
                _ => {}
            }
            i += 1;
        }
        false
    }
}

fn split_key_value(content: &str) -> Result<(String, String), ParseError> {
    let bytes = content.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b':' && (i + 1 == bytes.len() || bytes[i + 1] == b' ') {
            let key = content[..i].trim().to_string();
            let rest = if i + 1 == bytes.len() {
                String::new()
            } else {
                content[i + 2..].to_string()
            };
            if key.is_empty() {
                return Err(ParseError::new(format!("empty key in '{content}'")));
            }
            return Ok((key, rest));
        }
    }
    Err(ParseError::new(format!("expected 'key: value' in '{content}'")))
}

fn parse_scalar_or_inline(s: &str) -> Result<Value, ParseError> {
    let trimmed = s.trim();
    if trimmed == "[]" {
        return Ok(Value::Seq(Vec::new()));
    }
    if trimmed == "{}" {
        return Ok(Value::Map(Vec::new()));
    }
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        let inner = &trimmed[1..trimmed.len() - 1];
        let items = split_flow_items(inner);
        let parsed = items
            .iter()
            .map(|i| parse_scalar(i.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Value::Seq(parsed));
    }
    parse_scalar(trimmed)
}

fn split_flow_items(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    let mut items = Vec::new();
    let mut depth = 0i32;
    let mut in_squote = false;
    let mut in_dquote = false;
    let mut current = String::new();
    for c in inner.chars() {
        match c {
            '\'' if !in_dquote => {
                in_squote = !in_squote;
                current.push(c);
            }
            '"' if !in_squote => {
                in_dquote = !in_dquote;
                current.push(c);
            }
            '[' if !in_squote && !in_dquote => {
                depth += 1;
                current.push(c);
            }
            ']' if !in_squote && !in_dquote => {
                depth -= 1;
                current.push(c);
            }
            ',' if !in_squote && !in_dquote && depth == 0 => {
                items.push(current.clone());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        items.push(current);
    }
    items
}

fn parse_scalar(s: &str) -> Result<Value, ParseError> {
    if s.is_empty() || s == "null" || s == "~" {
        return Ok(Value::Null);
    }
    if s == "true" {
        return Ok(Value::Bool(true));
    }
    if s == "false" {
        return Ok(Value::Bool(false));
    }
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        return Ok(Value::Str(unescape(&s[1..s.len() - 1])));
    }
    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        return Ok(Value::Str(s[1..s.len() - 1].replace("''", "'")));
    }
    if let Ok(i) = s.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    if let Ok(f) = s.parse::<f64>() {
        return Ok(Value::Float(f));
    }
    Ok(Value::Str(s.to_string()))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
