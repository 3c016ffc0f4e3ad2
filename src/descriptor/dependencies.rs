//! Effect dependency inference.
//!
//! Dependencies are the reactive state identifiers an effect's code refers
//! to. The scan is lexical: string literals, comments and property names
//! after a `.` are skipped; template literals are scanned whole so that
//! `${counter}` counts as a use.

use std::collections::HashSet;

/// Identifiers referenced by `code`, in order of first appearance.
pub fn referenced_identifiers(code: &str) -> Vec<String> {
    let chars: Vec<char> = code.chars().collect();
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\'' | '"' => {
                i = skip_string(&chars, i, ch);
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                    i += 1;
                }
                i += 2;
            }
            c if is_identifier_start(c) => {
                let start = i;
                while i < chars.len() && is_identifier_part(chars[i]) {
                    i += 1;
                }
                if is_property_access(&chars, start) {
                    continue;
                }
                let word: String = chars[start..i].iter().collect();
                if seen.insert(word.clone()) {
                    found.push(word);
                }
            }
            c if c.is_ascii_digit() => {
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.') {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    found
}

/// The members of `reactive` (in declaration order) that `code` refers to.
pub fn infer_dependencies<'a, I>(code: &str, reactive: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let used: HashSet<String> = referenced_identifiers(code).into_iter().collect();
    reactive
        .into_iter()
        .filter(|name| used.contains(*name))
        .map(str::to_string)
        .collect()
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// `obj.name` but not `...name`.
fn is_property_access(chars: &[char], start: usize) -> bool {
    let mut j = start;
    while j > 0 && chars[j - 1].is_whitespace() {
        j -= 1;
    }
    if j == 0 || chars[j - 1] != '.' {
        return false;
    }
    !(j >= 3 && chars[j - 2] == '.' && chars[j - 3] == '.')
}

fn skip_string(chars: &[char], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            '\n' => return i + 1,
            _ => i += 1,
        }
    }
    i
}
