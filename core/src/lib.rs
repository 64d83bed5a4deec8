//! Schema model for command-line dispatch.
//!
//! This crate defines the data model a host uses to register its commands
//! with the dispatch engine:
//!
//! - [`CommandSchema`] — one registered command (possibly multi-word,
//!   e.g. `"remote add"`, or the nameless default command) with its
//!   parameters, options, and environment-backed members.
//! - [`ParameterSchema`] — a positional parameter bound by index, with an
//!   optional trailing rest-capturing slot.
//! - [`OptionSchema`] — a `-`/`--` prefixed option with a canonical name,
//!   optional short name, and conversion target.
//! - [`EnvSchema`] — a member populated from the host's environment map.
//! - [`TargetType`] / [`ValueKind`] — the closed set of conversion
//!   targets the engine supports.
//! - [`ApplicationSchema`] — the validated, immutable command set.
//!
//! Validation ([`validate_application`], [`validate_command`]) catches
//! structural errors such as duplicate command names, duplicate options,
//! and misplaced rest-capturing parameters before routing ever runs.
//!
//! # Example
//!
//! ```
//! use cli_dispatch_core::*;
//!
//! let app = ApplicationSchema::resolve(vec![
//!     CommandSchema::new("remote"),
//!     CommandSchema::new("remote add")
//!         .with_parameter(ParameterSchema::required(
//!             "name", 0, TargetType::Scalar(ValueKind::String),
//!         ))
//!         .with_option(OptionSchema::flag("fetch").with_short('f')),
//! ])
//! .unwrap();
//!
//! assert!(app.find_by_name("remote add").is_some());
//! assert!(app.default_command().is_none());
//! ```

mod target;
mod types;
mod validate;

pub use target::{SequenceShape, TargetType, ValueKind};
pub use types::{
    ApplicationSchema, CommandSchema, EnvSchema, OptionSchema, ParameterSchema,
};
pub use validate::{ValidationError, validate_application, validate_command};
