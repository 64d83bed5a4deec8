//! Runtime values produced by conversion.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime};

/// A successfully parsed user-defined value.
///
/// Holds the parsed payload behind `Any` together with the registered
/// type name and the raw token it was parsed from. Equality compares the
/// type name and raw token, which is also what set deduplication uses.
#[derive(Clone)]
pub struct CustomValue {
    /// Registry key the value was parsed under.
    pub type_name: String,
    /// The raw token the parser consumed.
    pub raw: String,
    payload: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    pub(crate) fn new(
        type_name: String,
        raw: String,
        payload: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            type_name,
            raw,
            payload,
        }
    }

    /// Downcasts the payload to the concrete registered type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("type_name", &self.type_name)
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.raw == other.raw
    }
}

/// A converted value ready for binding.
///
/// One variant per conversion rule the engine supports. Integer widths
/// widen into `Int`/`UInt` and float widths into `Float`; the schema's
/// [`ValueKind`](cli_dispatch_core::ValueKind) still enforces the
/// declared width's range during parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null state of a nullable target with no supplied value.
    Null,
    Str(String),
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Duration(Duration),
    /// Canonical member name of an enumeration target.
    Enum(String),
    Custom(CustomValue),
    /// Elements of a sequence target, in converted order.
    Seq(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }
}
