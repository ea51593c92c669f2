//! Text mutation of a single declaration
//!
//! Replaces only the version token (or the constraint comment that follows
//! it) inside a declaration span, leaving every other byte of the file
//! untouched. This module performs no IO.

use crate::error::{ConfigError, RewriteError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Version-bearing literal: `version = "X"`, `required_version = "X"` or `source = "...?ref=X"`
static VERSION_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:\brequired_version|\bversion)\s*=\s*"(?P<token>[^"\n]*)"|\bsource\s*=\s*"[^"\n]*\?(?:[^"\n]*&)?ref=(?P<ref>[^"&\n]*)"#,
    )
    .unwrap()
});

/// Constraint comment directly after the closing quote of the version literal
static CONSTRAINT_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<lead>[ \t]*#[ \t]*)(?P<expr>[=!<>~]*[ \t]*\d[\w.\-]*(?:[ \t]*,[ \t]*[=!<>~]*[ \t]*\d[\w.\-]*)?)",
    )
    .unwrap()
});

/// The part of a declaration to rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Version,
    Constraint,
}

impl FromStr for Attribute {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "version" => Ok(Attribute::Version),
            "constraint" => Ok(Attribute::Constraint),
            _ => Err(ConfigError::InvalidAttribute {
                value: s.to_string(),
                command: "set".to_string(),
            }),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Version => write!(f, "version"),
            Attribute::Constraint => write!(f, "constraint"),
        }
    }
}

/// Rewrites `attribute` of the declaration `span` inside `file_text`
///
/// Only the first verbatim occurrence of `span` is touched.
pub fn rewrite(
    file_text: &str,
    span: &str,
    attribute: Attribute,
    new_value: &str,
) -> Result<String, RewriteError> {
    if span.is_empty() {
        return Err(RewriteError::span_mismatch(span));
    }
    let start = file_text
        .find(span)
        .ok_or_else(|| RewriteError::span_mismatch(span))?;

    let new_span = rewrite_span(span, attribute, new_value)?;

    let mut result = String::with_capacity(file_text.len() + new_value.len());
    result.push_str(&file_text[..start]);
    result.push_str(&new_span);
    result.push_str(&file_text[start + span.len()..]);
    Ok(result)
}

/// Rewrites `attribute` within a declaration span and returns the new span
pub fn rewrite_span(span: &str, attribute: Attribute, new_value: &str) -> Result<String, RewriteError> {
    let (token_start, token_end) =
        version_token(span).ok_or_else(|| RewriteError::token_not_found(span))?;

    match attribute {
        Attribute::Version => Ok(format!(
            "{}{}{}",
            &span[..token_start],
            new_value.trim(),
            &span[token_end..]
        )),
        Attribute::Constraint => {
            let Some(quote) = span[token_end..].find('"').map(|i| token_end + i + 1) else {
                return Err(RewriteError::token_not_found(span));
            };
            let value = normalize_constraint(new_value);
            let (head, tail) = span.split_at(quote);

            match CONSTRAINT_COMMENT_RE.captures(tail) {
                Some(caps) => {
                    let (Some(whole), Some(expr)) = (caps.get(0), caps.name("expr")) else {
                        return Err(RewriteError::token_not_found(span));
                    };
                    if value.is_empty() {
                        Ok(format!("{}{}", head, &tail[whole.end()..]))
                    } else {
                        Ok(format!(
                            "{}{}{}{}",
                            head,
                            &tail[..expr.start()],
                            value,
                            &tail[expr.end()..]
                        ))
                    }
                }
                None if value.is_empty() => Ok(span.to_string()),
                None => Ok(format!("{} # {}{}", head, value, tail)),
            }
        }
    }
}

/// Strips a leading `#` so that a comment marker is never doubled
fn normalize_constraint(value: &str) -> &str {
    value.trim().trim_start_matches('#').trim()
}

/// Byte range of the version token, preferring the least nested match
fn version_token(span: &str) -> Option<(usize, usize)> {
    VERSION_TOKEN_RE
        .captures_iter(span)
        .filter_map(|caps| {
            let token = caps.name("token").or_else(|| caps.name("ref"))?;
            Some((brace_depth(&span[..token.start()]), token.start(), token.end()))
        })
        .min_by_key(|(depth, start, _)| (*depth, *start))
        .map(|(_, start, end)| (start, end))
}

fn brace_depth(prefix: &str) -> i64 {
    prefix.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}
