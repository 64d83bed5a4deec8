//! Tokenization of raw argument vectors.
//!
//! Splits an argv-style token stream into three buckets: bracketed
//! directives, positional parameters, and named options with their raw
//! values. No token ever lands in two buckets, and order is preserved
//! within each bucket.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([A-Za-z_][A-Za-z0-9_-]*)\]$").expect("static regex must compile")
});

/// Tokenization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A token in directive position opens a bracket without closing it.
    #[error("unterminated directive: {0}")]
    UnterminatedDirective(String),
}

/// One named option with its accumulated raw values.
///
/// Repeated occurrences of the same option name collapse into a single
/// entry, with values appended in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionInput {
    /// Dash-stripped option name as it appeared on the command line.
    pub name: String,
    /// Raw values, in input order. Empty for presence-only flags.
    pub values: Vec<String>,
}

/// A fully tokenized command line.
///
/// Immutable after construction; the raw token stream is partitioned
/// into `directives`, `parameters`, and `options`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedInput {
    /// Bracketed directives in input order, brackets stripped.
    pub directives: Vec<String>,
    /// Positional tokens before the first option, plus everything after
    /// a bare `--`.
    pub parameters: Vec<String>,
    /// Named options with their raw values.
    pub options: Vec<OptionInput>,
}

impl ParsedInput {
    /// Looks up an option by its dash-stripped name.
    pub fn option(&self, name: &str) -> Option<&OptionInput> {
        self.options.iter().find(|o| o.name == name)
    }

    /// `true` if a directive with the given name was supplied.
    pub fn has_directive(&self, name: &str) -> bool {
        self.directives.iter().any(|d| d == name)
    }

    /// `true` if the `[debug]` directive was supplied.
    pub fn is_debug_directive_specified(&self) -> bool {
        self.has_directive("debug")
    }

    /// `true` if the `[preview]` directive was supplied.
    pub fn is_preview_directive_specified(&self) -> bool {
        self.has_directive("preview")
    }

    /// `true` if `--help` or `-h` was supplied.
    pub fn is_help_requested(&self) -> bool {
        self.options.iter().any(|o| o.name == "help" || o.name == "h")
    }

    /// `true` if `--version` was supplied.
    pub fn is_version_requested(&self) -> bool {
        self.options.iter().any(|o| o.name == "version")
    }
}

/// Splits an option-like token into its name and optional inline value.
///
/// Returns `None` for tokens that are not option-like: bare `-`, bare
/// `--`, and short-form tokens whose first character after the dash is a
/// digit (so negative numbers pass through as values).
fn split_option_token(token: &str) -> Option<(&str, Option<&str>)> {
    if token == "--" {
        return None;
    }
    if let Some(rest) = token.strip_prefix("--") {
        let (name, value) = match rest.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (rest, None),
        };
        if name.is_empty() {
            return None;
        }
        return Some((name, value));
    }
    let rest = token.strip_prefix('-')?;
    let first = rest.chars().next()?;
    if first.is_ascii_digit() {
        return None;
    }
    Some((rest, None))
}

/// Tokenizes raw arguments into a [`ParsedInput`].
///
/// Leading `[identifier]` tokens become directives; positional tokens
/// follow until the first option-like token; the rest are grouped into
/// options, with `--name=value` yielding one inline value and a bare
/// `--` escaping every later token into the parameter bucket.
pub fn tokenize<S: AsRef<str>>(args: &[S]) -> Result<ParsedInput, TokenizeError> {
    let mut input = ParsedInput::default();
    let mut scanning_directives = true;
    let mut escaped = false;
    // Index into `input.options` of the option collecting values.
    let mut current: Option<usize> = None;

    for arg in args {
        let token = arg.as_ref();

        if escaped {
            input.parameters.push(token.to_string());
            continue;
        }
        if token == "--" {
            escaped = true;
            continue;
        }

        if scanning_directives {
            if let Some(captures) = DIRECTIVE.captures(token) {
                input.directives.push(captures[1].to_string());
                continue;
            }
            if token.starts_with('[') && !token.ends_with(']') {
                return Err(TokenizeError::UnterminatedDirective(token.to_string()));
            }
            scanning_directives = false;
        }

        if let Some((name, inline_value)) = split_option_token(token) {
            let index = match input.options.iter().position(|o| o.name == name) {
                Some(index) => index,
                None => {
                    input.options.push(OptionInput {
                        name: name.to_string(),
                        values: Vec::new(),
                    });
                    input.options.len() - 1
                }
            };
            if let Some(value) = inline_value {
                input.options[index].values.push(value.to_string());
            }
            current = Some(index);
        } else if let Some(index) = current {
            input.options[index].values.push(token.to_string());
        } else {
            input.parameters.push(token.to_string());
        }
    }

    debug!(
        directives = input.directives.len(),
        parameters = input.parameters.len(),
        options = input.options.len(),
        "tokenized command line"
    );
    Ok(input)
}
