//! Command-line dispatch engine.
//!
//! Turns a flat sequence of raw argv tokens into a routed, fully
//! converted invocation of one of the commands registered in a
//! [`cli_dispatch_core::ApplicationSchema`]:
//!
//! 1. [`tokenize`] classifies raw tokens into directives, positional
//!    parameters, and named options ([`ParsedInput`]).
//! 2. [`find_command`] matches the longest positional prefix against the
//!    registered command names, falling back to the default command.
//! 3. [`bind`] converts the residual tokens, options, and environment
//!    values into typed members ([`BoundCommand`]) through the
//!    conversion engine ([`convert`], [`ConverterRegistry`]).
//!
//! The [`dispatch`] facade chains the three phases and returns an
//! [`Invocation`] the host hands to its executor. The engine never
//! prints, prompts, or launches anything; presentation and execution
//! belong to the host.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use cli_dispatch_core::*;
//! use cli_dispatch_engine::{dispatch, ConverterRegistry, Value};
//!
//! let app = ApplicationSchema::resolve(vec![
//!     CommandSchema::new("remote add")
//!         .with_parameter(ParameterSchema::required(
//!             "name", 0, TargetType::Scalar(ValueKind::String),
//!         ))
//!         .with_option(OptionSchema::flag("fetch").with_short('f')),
//! ])
//! .unwrap();
//!
//! let invocation = dispatch(
//!     &app,
//!     &["remote", "add", "origin", "--fetch"],
//!     &HashMap::new(),
//!     &ConverterRegistry::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(invocation.command.name, "remote add");
//! assert_eq!(invocation.consumed, 2);
//! assert_eq!(invocation.bound.get("name"), Some(&Value::Str("origin".into())));
//! assert_eq!(invocation.bound.get("fetch"), Some(&Value::Bool(true)));
//! ```

pub mod bind;
pub mod convert;
pub mod error;
pub mod input;
pub mod router;
pub mod value;

use std::collections::HashMap;

use cli_dispatch_core::{ApplicationSchema, CommandSchema};

pub use bind::{bind, BindError, BoundCommand};
pub use convert::{convert, convert_scalar, ConvertError, ConverterRegistry, TryFromText};
pub use error::DispatchError;
pub use input::{tokenize, OptionInput, ParsedInput, TokenizeError};
pub use router::{find_command, RouteError, RouteMatch};
pub use value::{CustomValue, Value};

/// A routed and bound command invocation, ready for the host's executor.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    /// The routed command schema.
    pub command: &'a CommandSchema,
    /// Positional tokens consumed by the command name.
    pub consumed: usize,
    /// The tokenized input, including directives for the host to act on.
    pub input: ParsedInput,
    /// The converted member values.
    pub bound: BoundCommand,
}

/// Tokenizes, routes, and binds raw arguments in one call.
///
/// Hosts that intercept presentation concerns (help, version, preview)
/// before binding should call [`tokenize`], inspect the
/// [`ParsedInput`] queries, and then run [`find_command`] and [`bind`]
/// themselves; this facade binds unconditionally.
pub fn dispatch<'a, S: AsRef<str>>(
    app: &'a ApplicationSchema,
    args: &[S],
    env: &HashMap<String, String>,
    registry: &ConverterRegistry,
) -> error::Result<Invocation<'a>> {
    let input = tokenize(args)?;
    let matched = find_command(app, &input)?;
    let bound = bind(matched.command, &input, matched.consumed, env, registry)?;
    Ok(Invocation {
        command: matched.command,
        consumed: matched.consumed,
        input,
        bound,
    })
}
