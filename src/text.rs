//! Line-level text helpers shared by the body translator and the printer.
//!
//! Translated JavaScript keeps the indentation it had in the source file, so
//! every fragment is normalised (dedented, blank runs collapsed) before the
//! printer re-indents it at its new nesting level.

/// Number of leading whitespace characters on a line.
fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Drop up to `count` leading whitespace characters.
fn strip_indent(line: &str, count: usize) -> &str {
    let mut stripped = 0;
    for (offset, ch) in line.char_indices() {
        if stripped == count || !ch.is_whitespace() {
            return &line[offset..];
        }
        stripped += 1;
    }
    ""
}

/// Remove the indentation shared by every non-blank line.
pub fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(leading_whitespace)
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                strip_indent(line, indent)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dedent the continuation lines of a fragment that started at `column`.
///
/// A node cut out of the middle of a file has no indentation on its first
/// line but keeps the file's indentation on every following line.
pub fn dedent_continuation(text: &str, column: usize) -> String {
    let mut lines = text.lines();
    let mut out = String::new();
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push('\n');
        out.push_str(strip_indent(line, column));
    }
    out
}

/// Trim trailing whitespace, collapse runs of blank lines and drop blank
/// lines at both ends.
pub fn tidy_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut previous_blank = true;
    for line in text.lines() {
        let line = line.trim_end();
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push(if blank { "" } else { line });
        previous_blank = blank;
    }
    while out.last().is_some_and(|line| line.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// Strip the braces of a `{ ... }` block and normalise what is inside.
pub fn block_inner(text: &str) -> String {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed);
    dedent(&tidy_lines(inner))
}

/// Prefix every non-blank line with `prefix`.
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leading whitespace of the line containing `offset`.
pub fn line_indent(source: &str, offset: usize) -> &str {
    let start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &source[start..];
    let width: usize = line
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(char::len_utf8)
        .sum();
    &line[..width]
}

/// Remove one layer of matching JavaScript string quotes.
pub fn unquote(literal: &str) -> &str {
    let literal = literal.trim();
    for quote in ['\'', '"', '`'] {
        if literal.len() >= 2 && literal.starts_with(quote) && literal.ends_with(quote) {
            return &literal[1..literal.len() - 1];
        }
    }
    literal
}

/// Single-quoted JavaScript string literal.
pub fn quote_js(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}
