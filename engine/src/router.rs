//! Command routing over tokenized input.
//!
//! Matches the longest possible prefix of the positional tokens against
//! registered command names, so a more specific subcommand
//! (`"remote add"`) always wins over a shorter ancestor (`"remote"`).
//! When no prefix matches, routing falls back to the default command.

use thiserror::Error;
use tracing::debug;

use cli_dispatch_core::{ApplicationSchema, CommandSchema};

use crate::input::ParsedInput;

/// Routing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No positional prefix matches a registered command name and no
    /// default command is registered.
    #[error("no command matches the input")]
    NoCommand {
        /// First positional token, when one was supplied.
        head: Option<String>,
    },
}

/// A routed command with the number of positional tokens its name
/// consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteMatch<'a> {
    /// The matched command schema.
    pub command: &'a CommandSchema,
    /// Number of leading positional tokens forming the command name;
    /// zero for the default command.
    pub consumed: usize,
}

/// Routes tokenized input to the most specific registered command.
///
/// Tries every positional-prefix length from longest to shortest for an
/// exact, case-sensitive name match, then falls back to the default
/// command with `consumed = 0`.
///
/// # Examples
///
/// ```
/// use cli_dispatch_core::{ApplicationSchema, CommandSchema};
/// use cli_dispatch_engine::{find_command, tokenize};
///
/// let app = ApplicationSchema::resolve(vec![
///     CommandSchema::new("remote"),
///     CommandSchema::new("remote add"),
/// ])
/// .unwrap();
///
/// let input = tokenize(&["remote", "add", "origin"]).unwrap();
/// let matched = find_command(&app, &input).unwrap();
/// assert_eq!(matched.command.name, "remote add");
/// assert_eq!(matched.consumed, 2);
/// ```
pub fn find_command<'a>(
    app: &'a ApplicationSchema,
    input: &ParsedInput,
) -> Result<RouteMatch<'a>, RouteError> {
    for length in (1..=input.parameters.len()).rev() {
        let candidate = input.parameters[..length].join(" ");
        if let Some(command) = app.find_by_name(&candidate) {
            debug!(command = %command.name, consumed = length, "routed to named command");
            return Ok(RouteMatch {
                command,
                consumed: length,
            });
        }
    }

    if let Some(command) = app.default_command() {
        debug!("routed to default command");
        return Ok(RouteMatch {
            command,
            consumed: 0,
        });
    }

    Err(RouteError::NoCommand {
        head: input.parameters.first().cloned(),
    })
}
