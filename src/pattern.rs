//! Shell filename patterns.
//!
//! Patterns follow `fnmatch` rules and are tested against the whole path
//! string:
//!
//! - `*` matches any run of characters, `/` included. `**` is just two stars.
//! - `?` matches exactly one character.
//! - `[abc]`, `[a-z]` and `[!a-z]` are character classes. A `]` right after
//!   the opening `[` (or `[!`) is a literal member.
//! - A `[` without a closing `]` is a literal.
//!
//! Every pattern is accepted. It is translated into an anchored regular
//! expression once and reused for each path.

use crate::error::Result;
use regex::Regex;

/// A compiled shell filename pattern.
#[derive(Debug, Clone)]
pub struct ShellPattern {
    source: String,
    regex: Regex,
}

impl ShellPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&translate(pattern))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the whole of `path` matches.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Translate a shell pattern into an anchored regular expression.
pub fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^(?s:");
    let mut i = 0;
    let mut after_star = false;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => {
                if !after_star {
                    out.push_str(".*");
                }
                after_star = true;
                continue;
            }
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i..end]));
                    i = end + 1;
                }
                None => out.push_str(r"\["),
            },
            _ => out.push_str(&escape(c)),
        }
        after_star = false;
    }

    out.push_str(")$");
    out
}

/// Index of the `]` closing a class whose body starts at `start`.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() && chars[j] != ']' {
        j += 1;
    }
    (j < chars.len()).then_some(j)
}

fn translate_class(body: &[char]) -> String {
    let (negated, body) = match body.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut members = String::new();
    let mut k = 0;
    while k < body.len() {
        if k + 2 < body.len() && body[k + 1] == '-' {
            let (lo, hi) = (body[k], body[k + 2]);
            // Reversed ranges are empty
            if lo <= hi {
                members.push_str(&escape(lo));
                members.push('-');
                members.push_str(&escape(hi));
            }
            k += 3;
        } else {
            members.push_str(&escape(body[k]));
            k += 1;
        }
    }

    match (negated, members.is_empty()) {
        (false, true) => "[a&&b]".to_string(),
        (true, true) => ".".to_string(),
        (false, false) => format!("[{}]", members),
        (true, false) => format!("[^{}]", members),
    }
}

fn escape(c: char) -> String {
    regex::escape(c.encode_utf8(&mut [0; 4]))
}
