//! Type descriptors for bindable members.
//!
//! Conversion targets are modeled as a closed set of tagged variants
//! rather than open-ended runtime reflection: every conversion rule the
//! engine supports corresponds to exactly one [`ValueKind`] tag, and the
//! wrapper shape (plain scalar, nullable scalar, or homogeneous sequence)
//! is carried by [`TargetType`]. User-defined types plug in through
//! [`ValueKind::Custom`], which names a parser registered with the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar conversion target for a single raw token.
///
/// # Examples
///
/// ```
/// use cli_dispatch_core::ValueKind;
///
/// let kind = ValueKind::default();
/// assert_eq!(kind, ValueKind::String);
///
/// let level = ValueKind::Enum(vec!["debug".into(), "info".into()]);
/// assert!(matches!(level, ValueKind::Enum(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueKind {
    /// Raw string, passed through unchanged (the default).
    #[default]
    String,
    /// `true`/`false`, case-insensitive; bare presence means `true`.
    Bool,
    /// A single character.
    Char,
    /// Signed integers by width.
    I8,
    I16,
    I32,
    I64,
    /// Unsigned integers by width.
    U8,
    U16,
    U32,
    U64,
    /// Floating point by width. Decimal-style values map here too.
    F32,
    F64,
    /// Calendar date, ISO 8601 (`2024-01-31`).
    Date,
    /// Date and time without offset, ISO 8601 (`2024-01-31T12:30:00`).
    DateTime,
    /// Date and time with offset, RFC 3339.
    DateTimeOffset,
    /// Duration in `HH:MM:SS` form.
    Duration,
    /// One of a fixed set of member names, matched case-insensitively.
    Enum(Vec<String>),
    /// A user-defined type; the payload names a parser registered with
    /// the engine's converter registry.
    Custom(String),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => f.write_str("string"),
            ValueKind::Bool => f.write_str("bool"),
            ValueKind::Char => f.write_str("char"),
            ValueKind::I8 => f.write_str("i8"),
            ValueKind::I16 => f.write_str("i16"),
            ValueKind::I32 => f.write_str("i32"),
            ValueKind::I64 => f.write_str("i64"),
            ValueKind::U8 => f.write_str("u8"),
            ValueKind::U16 => f.write_str("u16"),
            ValueKind::U32 => f.write_str("u32"),
            ValueKind::U64 => f.write_str("u64"),
            ValueKind::F32 => f.write_str("f32"),
            ValueKind::F64 => f.write_str("f64"),
            ValueKind::Date => f.write_str("date"),
            ValueKind::DateTime => f.write_str("datetime"),
            ValueKind::DateTimeOffset => f.write_str("datetime-offset"),
            ValueKind::Duration => f.write_str("duration"),
            ValueKind::Enum(members) => write!(f, "enum({})", members.join("|")),
            ValueKind::Custom(name) => write!(f, "custom({name})"),
        }
    }
}

/// Container shape for sequence targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SequenceShape {
    /// Fixed-order array semantics.
    Array,
    /// Ordered list semantics (the default).
    #[default]
    List,
    /// Unordered set semantics; duplicates are dropped by value equality.
    Set,
}

/// Full conversion target for a bindable member.
///
/// # Examples
///
/// ```
/// use cli_dispatch_core::{SequenceShape, TargetType, ValueKind};
///
/// let count = TargetType::Nullable(ValueKind::I32);
/// assert!(!count.is_flag());
///
/// let tags = TargetType::Sequence {
///     element: ValueKind::String,
///     shape: SequenceShape::Set,
/// };
/// assert!(matches!(tags, TargetType::Sequence { .. }));
///
/// assert!(TargetType::Scalar(ValueKind::Bool).is_flag());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    /// Exactly one raw value (or none, for bool flags).
    Scalar(ValueKind),
    /// Zero raw values bind to the null state; one binds as the inner kind.
    Nullable(ValueKind),
    /// Zero or more raw values converted element-wise.
    Sequence {
        /// Conversion target for each element.
        element: ValueKind,
        /// Requested container shape.
        shape: SequenceShape,
    },
}

impl Default for TargetType {
    fn default() -> Self {
        TargetType::Scalar(ValueKind::String)
    }
}

impl TargetType {
    /// Returns the scalar kind converted per raw value.
    pub fn element_kind(&self) -> &ValueKind {
        match self {
            TargetType::Scalar(kind) | TargetType::Nullable(kind) => kind,
            TargetType::Sequence { element, .. } => element,
        }
    }

    /// `true` for a plain boolean scalar, i.e. a presence-only flag.
    pub fn is_flag(&self) -> bool {
        matches!(self, TargetType::Scalar(ValueKind::Bool))
    }

    /// Rebuilds this target with every element kind replaced, keeping the
    /// wrapper shape. Used for per-member converter overrides.
    pub fn with_element_kind(&self, kind: ValueKind) -> TargetType {
        match self {
            TargetType::Scalar(_) => TargetType::Scalar(kind),
            TargetType::Nullable(_) => TargetType::Nullable(kind),
            TargetType::Sequence { shape, .. } => TargetType::Sequence {
                element: kind,
                shape: *shape,
            },
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Scalar(kind) => write!(f, "{kind}"),
            TargetType::Nullable(kind) => write!(f, "{kind}?"),
            TargetType::Sequence { element, shape } => match shape {
                SequenceShape::Array => write!(f, "[{element}]"),
                SequenceShape::List => write!(f, "list<{element}>"),
                SequenceShape::Set => write!(f, "set<{element}>"),
            },
        }
    }
}
