//! Binding of routed input to command members.
//!
//! Combines the residual positional tokens, the supplied options, and
//! the host's environment mapping with the command's schema, running
//! every raw value through the conversion engine. Binding is
//! all-or-nothing: the bound member map is only returned once every
//! member has converted successfully.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::debug;

use cli_dispatch_core::{CommandSchema, OptionSchema, TargetType, ValueKind};

use crate::convert::{convert, ConvertError, ConverterRegistry};
use crate::input::ParsedInput;
use crate::value::Value;

/// Binding errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// A required positional parameter has no residual token.
    #[error("missing required parameter <{0}>")]
    MissingParameter(String),
    /// A residual token remains after all declared parameters are bound.
    #[error("unexpected parameter {0:?}")]
    UnexpectedParameter(String),
    /// A required option was not supplied.
    #[error("missing required option --{0}")]
    MissingOption(String),
    /// A supplied option matches no declared option.
    #[error("unrecognized option --{0}")]
    UnknownOption(String),
    /// A member's raw value failed conversion.
    #[error("cannot bind {member}: {source}")]
    Conversion {
        /// Parameter, option, or env member name.
        member: String,
        /// The underlying conversion failure.
        #[source]
        source: ConvertError,
    },
}

/// The fully bound members of one command invocation.
///
/// Maps member names (parameter names, option canonical names, env
/// member names) to converted values. Members left at their host-side
/// defaults are absent from the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundCommand {
    values: BTreeMap<String, Value>,
}

impl BoundCommand {
    /// The converted value bound to a member, if one was supplied.
    pub fn get(&self, member: &str) -> Option<&Value> {
        self.values.get(member)
    }

    /// `true` if the member received a value.
    pub fn is_bound(&self, member: &str) -> bool {
        self.values.contains_key(member)
    }

    /// Iterates bound members in name order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of members that received a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when no member received a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The effective conversion target for an option, honoring its converter
/// override.
fn effective_target(option: &OptionSchema) -> TargetType {
    match &option.converter {
        Some(key) => option.target.with_element_kind(ValueKind::Custom(key.clone())),
        None => option.target.clone(),
    }
}

/// Binds routed input against a command schema.
///
/// `consumed` is the number of leading positional tokens the router
/// matched as the command name; the rest bind to parameters by position.
/// Options bind by canonical or short name, and env members by
/// case-insensitive key lookup in `env`.
pub fn bind(
    command: &CommandSchema,
    input: &ParsedInput,
    consumed: usize,
    env: &HashMap<String, String>,
    registry: &ConverterRegistry,
) -> Result<BoundCommand, BindError> {
    let mut bound = BoundCommand::default();
    let residual = &input.parameters[consumed..];

    // Positional parameters, left to right; the trailing rest-capturing
    // parameter absorbs everything left over.
    let mut cursor = 0;
    for parameter in &command.parameters {
        let raws: &[String] = if parameter.captures_rest {
            let rest = &residual[cursor..];
            cursor = residual.len();
            rest
        } else if cursor < residual.len() {
            let raw = std::slice::from_ref(&residual[cursor]);
            cursor += 1;
            raw
        } else {
            &[]
        };

        if raws.is_empty() {
            if parameter.required {
                return Err(BindError::MissingParameter(parameter.name.clone()));
            }
            continue;
        }

        let value = convert(raws, &parameter.target, registry).map_err(|source| {
            BindError::Conversion {
                member: parameter.name.clone(),
                source,
            }
        })?;
        bound.values.insert(parameter.name.clone(), value);
    }
    if cursor < residual.len() {
        return Err(BindError::UnexpectedParameter(residual[cursor].clone()));
    }

    // Reject supplied options no schema declares.
    for supplied in &input.options {
        if command.find_option(&supplied.name).is_none() {
            return Err(BindError::UnknownOption(supplied.name.clone()));
        }
    }

    for option in &command.options {
        let mut raws: Vec<String> = Vec::new();
        let mut present = false;
        for supplied in &input.options {
            if option.matches(&supplied.name) {
                present = true;
                raws.extend(supplied.values.iter().cloned());
            }
        }

        if !present {
            if option.required {
                return Err(BindError::MissingOption(option.name.clone()));
            }
            continue;
        }

        let value = convert(&raws, &effective_target(option), registry).map_err(|source| {
            BindError::Conversion {
                member: option.name.clone(),
                source,
            }
        })?;
        bound.values.insert(option.name.clone(), value);
    }

    // Env members: absence is never an error.
    for member in &command.env_members {
        let supplied = env
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(&member.key))
            .map(|(_, value)| value.clone());
        let Some(raw) = supplied else {
            continue;
        };
        let value = convert(&[raw], &member.target, registry).map_err(|source| {
            BindError::Conversion {
                member: member.member.clone(),
                source,
            }
        })?;
        bound.values.insert(member.member.clone(), value);
    }

    debug!(
        command = %command.name,
        members = bound.len(),
        "bound command members"
    );
    Ok(bound)
}
