//! Schema type definitions for command registration.
//!
//! This module defines the data model a host supplies to describe its
//! commands: positional parameters, named options, environment-backed
//! members, and the commands themselves. The types are plain data with
//! [`serde`] support so a presentation layer can enumerate or export a
//! registered command set.

use serde::{Deserialize, Serialize};

use crate::target::{TargetType, ValueKind};

/// Schema for a positional parameter.
///
/// Parameters are bound by 0-based position within a command. At most one
/// parameter per command may capture the remaining tokens
/// ([`capture_rest`](ParameterSchema::capture_rest)), and it must occupy
/// the last position.
///
/// # Examples
///
/// ```
/// use cli_dispatch_core::{ParameterSchema, TargetType, ValueKind};
///
/// let source = ParameterSchema::required("source", 0, TargetType::Scalar(ValueKind::String));
/// assert!(source.required);
///
/// let rest = ParameterSchema::optional("files", 1, TargetType::default()).capture_rest();
/// assert!(rest.captures_rest);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Display name used in diagnostics and help enumeration.
    pub name: String,
    /// 0-based position within the command's residual tokens.
    pub position: usize,
    /// Conversion target for the bound member.
    pub target: TargetType,
    /// Whether this parameter absorbs all remaining residual tokens.
    pub captures_rest: bool,
    /// Whether a missing value is a binding error.
    pub required: bool,
    /// Description for help enumeration.
    pub description: Option<String>,
}

impl ParameterSchema {
    /// Creates a required positional parameter.
    pub fn required(name: &str, position: usize, target: TargetType) -> Self {
        Self {
            name: name.to_string(),
            position,
            target,
            captures_rest: false,
            required: true,
            description: None,
        }
    }

    /// Creates an optional positional parameter.
    pub fn optional(name: &str, position: usize, target: TargetType) -> Self {
        Self {
            required: false,
            ..Self::required(name, position, target)
        }
    }

    /// Marks this parameter as absorbing all remaining residual tokens.
    pub fn capture_rest(mut self) -> Self {
        self.captures_rest = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// Schema for a named option.
///
/// An option has a canonical long name (`--force` is registered as
/// `"force"`), an optional one-character short name, and a conversion
/// target. A plain boolean scalar target makes it a presence-only flag.
///
/// # Examples
///
/// ```
/// use cli_dispatch_core::{OptionSchema, TargetType, ValueKind};
///
/// let force = OptionSchema::flag("force").with_short('f');
/// assert!(force.is_flag());
/// assert!(force.matches("force"));
/// assert!(force.matches("f"));
///
/// let count = OptionSchema::new("count", TargetType::Nullable(ValueKind::I32)).require();
/// assert!(count.required);
/// assert!(!count.is_flag());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSchema {
    /// Canonical name without leading dashes.
    pub name: String,
    /// Optional one-character short name.
    pub short: Option<char>,
    /// Conversion target for the bound member.
    pub target: TargetType,
    /// Whether absence is a binding error.
    pub required: bool,
    /// Registry key of a converter that overrides the built-in rules
    /// for this option's element conversion.
    pub converter: Option<String>,
    /// Description for help enumeration.
    pub description: Option<String>,
}

impl OptionSchema {
    /// Creates an option with the given canonical name and target type.
    pub fn new(name: &str, target: TargetType) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            target,
            required: false,
            converter: None,
            description: None,
        }
    }

    /// Creates a presence-only boolean flag.
    pub fn flag(name: &str) -> Self {
        Self::new(name, TargetType::Scalar(ValueKind::Bool))
    }

    /// Sets the one-character short name.
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Marks the option as required.
    pub fn require(mut self) -> Self {
        self.required = true;
        self
    }

    /// Routes this option's element conversion through the named
    /// registered converter.
    pub fn with_converter(mut self, key: &str) -> Self {
        self.converter = Some(key.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// `true` when the option is a presence-only boolean flag.
    pub fn is_flag(&self) -> bool {
        self.target.is_flag()
    }

    /// Checks whether a dash-stripped input name refers to this option,
    /// by canonical or short name (case-sensitive).
    pub fn matches(&self, input_name: &str) -> bool {
        if self.name == input_name {
            return true;
        }
        let mut chars = input_name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.short == Some(c),
            _ => false,
        }
    }
}

/// Schema for an environment-variable-backed member.
///
/// Env members are bound from the host-supplied environment mapping by
/// case-insensitive key match. Absence never fails binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvSchema {
    /// Bound member name.
    pub member: String,
    /// Environment variable key.
    pub key: String,
    /// Conversion target for the bound member.
    pub target: TargetType,
}

impl EnvSchema {
    /// Creates an environment-backed member schema.
    pub fn new(member: &str, key: &str, target: TargetType) -> Self {
        Self {
            member: member.to_string(),
            key: key.to_string(),
            target,
        }
    }
}

/// Complete schema for one registered command.
///
/// A command name may be multi-word (`"remote add"`). The default command
/// has an empty name and is selected when no positional prefix matches a
/// registered name.
///
/// # Examples
///
/// ```
/// use cli_dispatch_core::*;
///
/// let add = CommandSchema::new("remote add")
///     .with_description("Add a remote")
///     .with_parameter(ParameterSchema::required(
///         "name", 0, TargetType::Scalar(ValueKind::String),
///     ))
///     .with_option(OptionSchema::flag("fetch").with_short('f'));
///
/// assert_eq!(add.name_words(), vec!["remote", "add"]);
/// assert!(add.find_option("fetch").is_some());
/// assert!(add.find_option("f").is_some());
/// assert!(add.find_option("push").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSchema {
    /// Command name; possibly multi-word, empty for the default command.
    pub name: String,
    /// Short description for help enumeration.
    pub description: Option<String>,
    /// Positional parameters ordered by position.
    pub parameters: Vec<ParameterSchema>,
    /// Named options.
    pub options: Vec<OptionSchema>,
    /// Environment-variable-backed members.
    pub env_members: Vec<EnvSchema>,
    /// Whether this is the default (nameless) command.
    pub is_default: bool,
}

impl CommandSchema {
    /// Creates a named command schema.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Creates the default (nameless) command schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use cli_dispatch_core::CommandSchema;
    ///
    /// let default = CommandSchema::default_command();
    /// assert!(default.is_default);
    /// assert!(default.name.is_empty());
    /// ```
    pub fn default_command() -> Self {
        Self {
            is_default: true,
            ..Default::default()
        }
    }

    /// Adds a positional parameter.
    pub fn with_parameter(mut self, parameter: ParameterSchema) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds a named option.
    pub fn with_option(mut self, option: OptionSchema) -> Self {
        self.options.push(option);
        self
    }

    /// Adds an environment-backed member.
    pub fn with_env_member(mut self, member: EnvSchema) -> Self {
        self.env_members.push(member);
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Finds an option by dash-stripped canonical or short name.
    pub fn find_option(&self, input_name: &str) -> Option<&OptionSchema> {
        self.options.iter().find(|o| o.matches(input_name))
    }

    /// The command name split into its space-separated words.
    pub fn name_words(&self) -> Vec<&str> {
        self.name.split_whitespace().collect()
    }

    /// The rest-capturing parameter, if one is declared.
    pub fn rest_parameter(&self) -> Option<&ParameterSchema> {
        self.parameters.iter().find(|p| p.captures_rest)
    }
}

/// The full immutable set of registered commands.
///
/// Built once per process run via [`resolve`](ApplicationSchema::resolve),
/// which validates the structural invariants of the command set. The
/// schema has no mutation API and is safe to share read-only across
/// threads.
///
/// # Examples
///
/// ```
/// use cli_dispatch_core::{ApplicationSchema, CommandSchema};
///
/// let app = ApplicationSchema::resolve(vec![
///     CommandSchema::new("remote"),
///     CommandSchema::new("remote add"),
///     CommandSchema::default_command(),
/// ])
/// .unwrap();
///
/// assert_eq!(app.commands().len(), 3);
/// assert!(app.find_by_name("remote add").is_some());
/// assert!(app.default_command().is_some());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSchema {
    commands: Vec<CommandSchema>,
}

impl ApplicationSchema {
    pub(crate) fn from_validated(commands: Vec<CommandSchema>) -> Self {
        Self { commands }
    }

    /// All registered commands, in registration order.
    pub fn commands(&self) -> &[CommandSchema] {
        &self.commands
    }

    /// Finds a non-default command by exact, case-sensitive name.
    pub fn find_by_name(&self, name: &str) -> Option<&CommandSchema> {
        self.commands
            .iter()
            .find(|c| !c.is_default && c.name == name)
    }

    /// The default command, if one is registered.
    pub fn default_command(&self) -> Option<&CommandSchema> {
        self.commands.iter().find(|c| c.is_default)
    }
}
