//! Structural validation of registered command sets.
//!
//! Validates the invariants a command set must satisfy before routing and
//! binding can behave deterministically: a single default command, unique
//! command names, unique option names per command, contiguous parameter
//! positions, and a single trailing rest-capturing parameter.
//!
//! # Examples
//!
//! ```
//! use cli_dispatch_core::*;
//!
//! let commands = vec![
//!     CommandSchema::new("remote"),
//!     CommandSchema::new("remote add"),
//! ];
//! assert!(validate_application(&commands).is_empty());
//!
//! // Duplicate command name → error
//! let dup = vec![CommandSchema::new("push"), CommandSchema::new("push")];
//! let errors = validate_application(&dup);
//! assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateCommand(_))));
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{ApplicationSchema, CommandSchema};

/// Command-set validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A non-default command has an empty or whitespace-only name.
    #[error("non-default command must have a name")]
    EmptyCommandName,
    /// A named command is marked default; the default command is nameless.
    #[error("default command must not have a name: {0}")]
    NamedDefaultCommand(String),
    /// More than one command is marked as the default.
    #[error("multiple default commands registered")]
    MultipleDefaultCommands,
    /// Two non-default commands share the same name.
    #[error("duplicate command name: {0}")]
    DuplicateCommand(String),
    /// Two options within one command share a canonical name.
    #[error("duplicate option --{name} in command '{command}'")]
    DuplicateOption {
        /// Owning command name.
        command: String,
        /// Clashing canonical option name.
        name: String,
    },
    /// Two options within one command share a short name.
    #[error("duplicate short option -{short} in command '{command}'")]
    DuplicateShortOption {
        /// Owning command name.
        command: String,
        /// Clashing short name.
        short: char,
    },
    /// An option has an empty canonical name.
    #[error("option with empty name in command '{0}'")]
    EmptyOptionName(String),
    /// Parameter positions are not contiguous from 0.
    #[error("parameter '{name}' in command '{command}' has position {found}, expected {expected}")]
    NonContiguousParameter {
        /// Owning command name.
        command: String,
        /// Offending parameter name.
        name: String,
        /// Position the schema declares.
        found: usize,
        /// Position required by contiguity.
        expected: usize,
    },
    /// More than one parameter captures the remaining tokens.
    #[error("multiple rest-capturing parameters in command '{0}'")]
    MultipleRestParameters(String),
    /// A rest-capturing parameter is not in the last positional slot.
    #[error("rest-capturing parameter '{name}' in command '{command}' must be last")]
    RestParameterNotLast {
        /// Owning command name.
        command: String,
        /// Offending parameter name.
        name: String,
    },
}

/// Validates a full command set.
///
/// Returns an empty vector when the set is valid; otherwise the first
/// error found. Per-command checks run through
/// [`validate_command`].
pub fn validate_application(commands: &[CommandSchema]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let defaults = commands.iter().filter(|c| c.is_default).count();
    if defaults > 1 {
        errors.push(ValidationError::MultipleDefaultCommands);
        return errors;
    }

    let mut seen_names: HashSet<&str> = HashSet::new();
    for command in commands {
        if !command.is_default && !seen_names.insert(command.name.as_str()) {
            errors.push(ValidationError::DuplicateCommand(command.name.clone()));
            return errors;
        }
        errors.extend(validate_command(command));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Validates one command schema.
///
/// Checks the name, option uniqueness, parameter position contiguity, and
/// rest-parameter placement.
///
/// # Examples
///
/// ```
/// use cli_dispatch_core::*;
///
/// let command = CommandSchema::new("tag")
///     .with_option(OptionSchema::flag("force").with_short('f'))
///     .with_option(OptionSchema::flag("force"));
/// let errors = validate_command(&command);
/// assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateOption { .. })));
/// ```
pub fn validate_command(command: &CommandSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if command.is_default {
        if !command.name.trim().is_empty() {
            errors.push(ValidationError::NamedDefaultCommand(command.name.clone()));
            return errors;
        }
    } else if command.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    let mut seen_options: HashSet<&str> = HashSet::new();
    let mut seen_shorts: HashSet<char> = HashSet::new();
    for option in &command.options {
        if option.name.is_empty() {
            errors.push(ValidationError::EmptyOptionName(command.name.clone()));
            return errors;
        }
        if !seen_options.insert(option.name.as_str()) {
            errors.push(ValidationError::DuplicateOption {
                command: command.name.clone(),
                name: option.name.clone(),
            });
            return errors;
        }
        if let Some(short) = option.short {
            if !seen_shorts.insert(short) {
                errors.push(ValidationError::DuplicateShortOption {
                    command: command.name.clone(),
                    short,
                });
                return errors;
            }
        }
    }

    for (expected, parameter) in command.parameters.iter().enumerate() {
        if parameter.position != expected {
            errors.push(ValidationError::NonContiguousParameter {
                command: command.name.clone(),
                name: parameter.name.clone(),
                found: parameter.position,
                expected,
            });
            return errors;
        }
    }

    let rest_count = command.parameters.iter().filter(|p| p.captures_rest).count();
    if rest_count > 1 {
        errors.push(ValidationError::MultipleRestParameters(command.name.clone()));
        return errors;
    }
    if let Some(rest) = command.rest_parameter() {
        let last = command.parameters.len() - 1;
        if rest.position != last {
            errors.push(ValidationError::RestParameterNotLast {
                command: command.name.clone(),
                name: rest.name.clone(),
            });
            return errors;
        }
    }

    errors
}

impl ApplicationSchema {
    /// Builds a validated, immutable application schema from a set of
    /// registered commands.
    ///
    /// Returns the first invariant violation found, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use cli_dispatch_core::{ApplicationSchema, CommandSchema, ValidationError};
    ///
    /// let err = ApplicationSchema::resolve(vec![
    ///     CommandSchema::default_command(),
    ///     CommandSchema::default_command(),
    /// ])
    /// .unwrap_err();
    /// assert_eq!(err, ValidationError::MultipleDefaultCommands);
    /// ```
    pub fn resolve(commands: Vec<CommandSchema>) -> Result<Self, ValidationError> {
        match validate_application(&commands).into_iter().next() {
            Some(error) => Err(error),
            None => Ok(Self::from_validated(commands)),
        }
    }
}
