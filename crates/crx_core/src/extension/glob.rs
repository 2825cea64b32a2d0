//! Anchored wildcard matching.
//!
//! Both URL pattern paths and content-script globs compile through here, so
//! a glob is turned into a `Regex` once and reused for every match.

use std::hash::{Hash, Hasher};

use regex::Regex;

/// Which wildcard characters a glob understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobSyntax {
    /// `*` matches any run of characters; `?` is literal (URL pattern paths,
    /// where `?` starts the query).
    Star,
    /// `*` plus `?` for exactly one character (content-script globs).
    StarAndQuestion,
}

/// Compiled glob. Equality and hashing use the source text only.
#[derive(Debug, Clone)]
pub struct Glob {
    text: String,
    regex: Regex,
}

impl Glob {
    pub fn new(text: &str, syntax: GlobSyntax) -> Result<Self, regex::Error> {
        let mut expression = String::with_capacity(text.len() + 8);
        expression.push_str("^(?s:");
        let mut buffer = [0u8; 4];
        for c in text.chars() {
            match c {
                '*' => expression.push_str(".*"),
                '?' if syntax == GlobSyntax::StarAndQuestion => expression.push('.'),
                other => expression.push_str(&regex::escape(other.encode_utf8(&mut buffer))),
            }
        }
        expression.push_str(")$");
        Ok(Self {
            text: text.to_string(),
            regex: Regex::new(&expression)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Glob {}

impl Hash for Glob {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}
