//! Line-level helpers for scanning Python source text
//!
//! Shared by the queryset and template-library scanners. These mirror what
//! `inspect.signature` and `inspect.getdoc` produced for the completion
//! stream, but work on source text alone.

/// A parsed `def` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefSig {
    pub name: String,
    /// Parameter list text with whitespace collapsed, e.g. `self, *args`
    pub params: String,
    /// Index of the line containing the closing `)` of the header
    pub end_line: usize,
}

/// Parse a `def name(...)` header starting at `lines[start]`.
///
/// Parameter lists may span several lines; the header ends when the opening
/// parenthesis is balanced.
pub fn parse_def(lines: &[&str], start: usize) -> Option<DefSig> {
    let first = lines.get(start)?.trim_start();
    let rest = first
        .strip_prefix("async def ")
        .or_else(|| first.strip_prefix("def "))?;
    let paren = rest.find('(')?;
    let name = rest[..paren].trim().to_string();
    if name.is_empty() {
        return None;
    }

    let mut params = String::new();
    let mut depth = 0usize;
    let mut line_idx = start;
    let mut text = &rest[paren..];
    loop {
        for (offset, ch) in text.char_indices() {
            match ch {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        params.push_str(&text[..offset]);
                        let params = normalize_params(&params);
                        return Some(DefSig {
                            name,
                            params,
                            end_line: line_idx,
                        });
                    }
                }
                _ => {}
            }
        }
        params.push_str(text);
        params.push(' ');
        line_idx += 1;
        text = lines.get(line_idx).copied()?;
    }
}

/// Collapse whitespace runs in a parameter list to single spaces and drop
/// the leading `(`.
fn normalize_params(raw: &str) -> String {
    raw.trim_start_matches('(')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(',')
        .to_string()
}

/// Extract the docstring of a suite whose header ends at `lines[header_end]`.
///
/// Returns the cleaned docstring, or an empty string when the first
/// statement is not a string literal.
pub fn docstring_after(lines: &[&str], header_end: usize) -> String {
    let mut idx = header_end + 1;
    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }
    let Some(first) = lines.get(idx) else {
        return String::new();
    };

    let trimmed = first.trim_start();
    let literal = trimmed
        .strip_prefix("r\"\"\"")
        .map(|rest| (rest, "\"\"\""))
        .or_else(|| trimmed.strip_prefix("\"\"\"").map(|rest| (rest, "\"\"\"")))
        .or_else(|| trimmed.strip_prefix("r'''").map(|rest| (rest, "'''")))
        .or_else(|| trimmed.strip_prefix("'''").map(|rest| (rest, "'''")));
    let Some((after_open, delim)) = literal else {
        return String::new();
    };

    // Single-line docstring
    if let Some(end) = after_open.find(delim) {
        return cleandoc(&after_open[..end]);
    }

    let mut body = String::from(after_open);
    for line in lines.iter().skip(idx + 1) {
        body.push('\n');
        if let Some(end) = line.find(delim) {
            body.push_str(&line[..end]);
            return cleandoc(&body);
        }
        body.push_str(line);
    }
    cleandoc(&body)
}

/// Normalize docstring indentation the way `inspect.cleandoc` does: the
/// first line is trimmed as-is, the common leading whitespace of the
/// remaining lines is removed, and blank edges are dropped.
pub fn cleandoc(raw: &str) -> String {
    let mut lines = raw.lines();
    let first = lines.next().unwrap_or("").trim().to_string();
    let rest: Vec<&str> = lines.collect();

    let margin = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out: Vec<String> = Vec::with_capacity(rest.len() + 1);
    out.push(first);
    for line in rest {
        let stripped = if line.len() >= margin { &line[margin..] } else { line.trim_start() };
        out.push(stripped.trim_end().to_string());
    }

    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}
