//! Value conversion from raw tokens to typed values.
//!
//! Implements the closed rule set declared by
//! [`ValueKind`](cli_dispatch_core::ValueKind): raw strings pass through,
//! booleans honor bare-flag presence, numeric and temporal kinds parse
//! in their canonical invariant textual formats, enumerations match
//! member names case-insensitively, and user-defined types resolve
//! through a [`ConverterRegistry`]. Sequence targets convert element-wise
//! and set shapes deduplicate by value equality.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use thiserror::Error;

use cli_dispatch_core::{SequenceShape, TargetType, ValueKind};

use crate::value::{CustomValue, Value};

/// Conversion errors.
///
/// Each variant carries the offending raw value and/or the target kind
/// so a presentation layer can render a precise message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The raw value does not parse as the target kind.
    #[error("cannot convert {raw:?} to {kind}")]
    InvalidValue {
        /// Offending raw token.
        raw: String,
        /// Declared conversion target.
        kind: ValueKind,
    },
    /// The raw value names no member of the enumeration target.
    #[error("{raw:?} is not a member of {kind}")]
    UnknownEnumMember {
        /// Offending raw token.
        raw: String,
        /// The enumeration target with its members.
        kind: ValueKind,
    },
    /// A scalar target received more than one raw value.
    #[error("expected a single value for {kind}, got {count}")]
    TooManyValues {
        /// Declared conversion target.
        kind: ValueKind,
        /// Number of raw values supplied.
        count: usize,
    },
    /// A non-flag, non-nullable scalar target received no raw value.
    #[error("no value supplied for {kind}")]
    MissingValue {
        /// Declared conversion target.
        kind: ValueKind,
    },
    /// No converter is registered under the referenced name.
    #[error("no converter registered under {0:?}")]
    UnsupportedType(String),
    /// A registered converter rejected the raw value.
    #[error("cannot convert {raw:?} to {type_name}: {message}")]
    CustomParse {
        /// Registry key of the converter.
        type_name: String,
        /// Offending raw token.
        raw: String,
        /// Parser-supplied failure message.
        message: String,
    },
}

/// Capability for user-defined types constructed from a single raw token.
///
/// Implement this and register the type with a [`ConverterRegistry`] to
/// make it usable as a [`ValueKind::Custom`] target or a per-option
/// converter override.
///
/// # Examples
///
/// ```
/// use cli_dispatch_engine::TryFromText;
///
/// #[derive(Debug, PartialEq)]
/// struct Percentage(u8);
///
/// impl TryFromText for Percentage {
///     fn try_from_text(text: &str) -> Result<Self, String> {
///         let n: u8 = text
///             .strip_suffix('%')
///             .unwrap_or(text)
///             .parse()
///             .map_err(|_| format!("not a percentage: {text}"))?;
///         Ok(Percentage(n))
///     }
/// }
/// ```
pub trait TryFromText: Sized {
    /// Parses the type from a single raw token.
    fn try_from_text(text: &str) -> Result<Self, String>;
}

type ParseFn = Arc<dyn Fn(&str) -> Result<Arc<dyn Any + Send + Sync>, String> + Send + Sync>;

/// Named parsers for user-defined conversion targets.
///
/// Immutable in practice: hosts populate the registry once alongside the
/// application schema and share it read-only across dispatches.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    parsers: HashMap<String, ParseFn>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under the given name.
    ///
    /// # Examples
    ///
    /// ```
    /// use cli_dispatch_engine::{ConverterRegistry, TryFromText};
    ///
    /// #[derive(Debug)]
    /// struct Tag(String);
    ///
    /// impl TryFromText for Tag {
    ///     fn try_from_text(text: &str) -> Result<Self, String> {
    ///         Ok(Tag(text.to_string()))
    ///     }
    /// }
    ///
    /// let mut registry = ConverterRegistry::new();
    /// registry.register::<Tag>("tag");
    /// assert!(registry.contains("tag"));
    /// ```
    pub fn register<T>(&mut self, name: &str)
    where
        T: TryFromText + Any + Send + Sync,
    {
        self.parsers.insert(
            name.to_string(),
            Arc::new(|raw: &str| {
                T::try_from_text(raw).map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>)
            }),
        );
    }

    /// `true` if a converter is registered under the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    fn parse(&self, name: &str, raw: &str) -> Result<CustomValue, ConvertError> {
        let parser = self
            .parsers
            .get(name)
            .ok_or_else(|| ConvertError::UnsupportedType(name.to_string()))?;
        let payload = parser(raw).map_err(|message| ConvertError::CustomParse {
            type_name: name.to_string(),
            raw: raw.to_string(),
            message,
        })?;
        Ok(CustomValue::new(name.to_string(), raw.to_string(), payload))
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("parsers", &names)
            .finish()
    }
}

/// Converts raw values against a full target type.
///
/// Scalars require exactly one raw value (none for bool flags), nullable
/// targets convert absence to [`Value::Null`], and sequence targets
/// convert element-wise in input order.
pub fn convert(
    raws: &[String],
    target: &TargetType,
    registry: &ConverterRegistry,
) -> Result<Value, ConvertError> {
    match target {
        TargetType::Scalar(kind) => convert_scalar(raws, kind, registry),
        TargetType::Nullable(kind) => {
            let absent = raws.is_empty() || (raws.len() == 1 && raws[0].is_empty());
            if absent {
                Ok(Value::Null)
            } else {
                convert_scalar(raws, kind, registry)
            }
        }
        TargetType::Sequence { element, shape } => {
            let mut items = Vec::with_capacity(raws.len());
            for raw in raws {
                let item = convert_one(raw, element, registry)?;
                if *shape == SequenceShape::Set && items.contains(&item) {
                    continue;
                }
                items.push(item);
            }
            Ok(Value::Seq(items))
        }
    }
}

/// Converts raw values against a scalar kind.
///
/// A bare bool flag (zero raw values) converts to `true`; any other kind
/// requires exactly one raw value.
pub fn convert_scalar(
    raws: &[String],
    kind: &ValueKind,
    registry: &ConverterRegistry,
) -> Result<Value, ConvertError> {
    match raws {
        [] if *kind == ValueKind::Bool => Ok(Value::Bool(true)),
        [] => Err(ConvertError::MissingValue { kind: kind.clone() }),
        [raw] => convert_one(raw, kind, registry),
        _ => Err(ConvertError::TooManyValues {
            kind: kind.clone(),
            count: raws.len(),
        }),
    }
}

fn invalid(raw: &str, kind: &ValueKind) -> ConvertError {
    ConvertError::InvalidValue {
        raw: raw.to_string(),
        kind: kind.clone(),
    }
}

fn parse_with<T, F>(raw: &str, kind: &ValueKind, into: F) -> Result<Value, ConvertError>
where
    T: FromStr,
    F: FnOnce(T) -> Value,
{
    raw.parse::<T>().map(into).map_err(|_| invalid(raw, kind))
}

fn convert_one(
    raw: &str,
    kind: &ValueKind,
    registry: &ConverterRegistry,
) -> Result<Value, ConvertError> {
    match kind {
        ValueKind::String => Ok(Value::Str(raw.to_string())),
        ValueKind::Bool => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(invalid(raw, kind))
            }
        }
        ValueKind::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(invalid(raw, kind)),
            }
        }
        ValueKind::I8 => parse_with::<i8, _>(raw, kind, |n| Value::Int(n.into())),
        ValueKind::I16 => parse_with::<i16, _>(raw, kind, |n| Value::Int(n.into())),
        ValueKind::I32 => parse_with::<i32, _>(raw, kind, |n| Value::Int(n.into())),
        ValueKind::I64 => parse_with::<i64, _>(raw, kind, Value::Int),
        ValueKind::U8 => parse_with::<u8, _>(raw, kind, |n| Value::UInt(n.into())),
        ValueKind::U16 => parse_with::<u16, _>(raw, kind, |n| Value::UInt(n.into())),
        ValueKind::U32 => parse_with::<u32, _>(raw, kind, |n| Value::UInt(n.into())),
        ValueKind::U64 => parse_with::<u64, _>(raw, kind, Value::UInt),
        ValueKind::F32 => parse_with::<f32, _>(raw, kind, |n| Value::Float(n.into())),
        ValueKind::F64 => parse_with::<f64, _>(raw, kind, Value::Float),
        ValueKind::Date => parse_with::<NaiveDate, _>(raw, kind, Value::Date),
        ValueKind::DateTime => parse_with::<NaiveDateTime, _>(raw, kind, Value::DateTime),
        ValueKind::DateTimeOffset => DateTime::parse_from_rfc3339(raw)
            .map(Value::DateTimeOffset)
            .map_err(|_| invalid(raw, kind)),
        ValueKind::Duration => parse_duration(raw)
            .map(Value::Duration)
            .ok_or_else(|| invalid(raw, kind)),
        ValueKind::Enum(members) => members
            .iter()
            .find(|member| member.eq_ignore_ascii_case(raw))
            .map(|member| Value::Enum(member.clone()))
            .ok_or_else(|| ConvertError::UnknownEnumMember {
                raw: raw.to_string(),
                kind: kind.clone(),
            }),
        ValueKind::Custom(name) => registry.parse(name, raw).map(Value::Custom),
    }
}

/// Parses an `HH:MM:SS` duration, with an optional leading sign.
fn parse_duration(raw: &str) -> Option<Duration> {
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let mut parts = body.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds)
    {
        return None;
    }
    // An hours field can exceed chrono's representable range.
    let total = Duration::try_hours(hours)?
        .checked_add(&Duration::try_minutes(minutes)?)?
        .checked_add(&Duration::try_seconds(seconds)?)?;
    Some(if negative { -total } else { total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[derive(Debug, PartialEq)]
    struct Semver {
        major: u32,
        minor: u32,
        patch: u32,
    }

    impl TryFromText for Semver {
        fn try_from_text(text: &str) -> Result<Self, String> {
            let parts: Vec<&str> = text.split('.').collect();
            let &[major, minor, patch] = parts.as_slice() else {
                return Err(format!("not a semver: {text}"));
            };
            let parse = |s: &str| s.parse::<u32>().map_err(|e| e.to_string());
            Ok(Semver {
                major: parse(major)?,
                minor: parse(minor)?,
                patch: parse(patch)?,
            })
        }
    }

    fn registry() -> ConverterRegistry {
        let mut registry = ConverterRegistry::new();
        registry.register::<Semver>("semver");
        registry
    }

    fn raws(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn scalar(raw: &str, kind: ValueKind) -> Result<Value, ConvertError> {
        convert_scalar(&raws(&[raw]), &kind, &registry())
    }

    #[test]
    fn test_string_passes_through() {
        assert_eq!(scalar("value", ValueKind::String), Ok(Value::Str("value".into())));
    }

    #[test]
    fn test_bool_parses_any_casing() {
        assert_eq!(scalar("true", ValueKind::Bool), Ok(Value::Bool(true)));
        assert_eq!(scalar("FALSE", ValueKind::Bool), Ok(Value::Bool(false)));
        assert!(matches!(
            scalar("yes", ValueKind::Bool),
            Err(ConvertError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_bare_bool_flag_is_true() {
        let result = convert_scalar(&[], &ValueKind::Bool, &registry());
        assert_eq!(result, Ok(Value::Bool(true)));
    }

    #[test]
    fn test_char_requires_single_character() {
        assert_eq!(scalar("a", ValueKind::Char), Ok(Value::Char('a')));
        assert!(scalar("ab", ValueKind::Char).is_err());
        assert!(scalar("", ValueKind::Char).is_err());
    }

    #[test]
    fn test_integer_widths_widen() {
        assert_eq!(scalar("15", ValueKind::I8), Ok(Value::Int(15)));
        assert_eq!(scalar("-15", ValueKind::I16), Ok(Value::Int(-15)));
        assert_eq!(scalar("123", ValueKind::U32), Ok(Value::UInt(123)));
        assert_eq!(scalar("123", ValueKind::U64), Ok(Value::UInt(123)));
    }

    #[test]
    fn test_integer_width_out_of_range_fails() {
        assert!(matches!(
            scalar("300", ValueKind::I8),
            Err(ConvertError::InvalidValue { ref raw, kind: ValueKind::I8 }) if raw == "300"
        ));
        assert!(scalar("-1", ValueKind::U8).is_err());
    }

    #[test]
    fn test_floats_parse_invariant() {
        assert_eq!(scalar("123.45", ValueKind::F64), Ok(Value::Float(123.45)));
        assert!(scalar("123,45", ValueKind::F64).is_err());
    }

    #[test]
    fn test_temporal_kinds() {
        assert_eq!(
            scalar("1995-04-28", ValueKind::Date),
            Ok(Value::Date(NaiveDate::from_ymd_opt(1995, 4, 28).unwrap()))
        );
        assert_eq!(
            scalar("1995-04-28T12:30:00", ValueKind::DateTime),
            Ok(Value::DateTime(
                NaiveDate::from_ymd_opt(1995, 4, 28)
                    .unwrap()
                    .and_hms_opt(12, 30, 0)
                    .unwrap()
            ))
        );
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            scalar("1995-04-28T12:30:00+02:00", ValueKind::DateTimeOffset),
            Ok(Value::DateTimeOffset(
                NaiveDate::from_ymd_opt(1995, 4, 28)
                    .unwrap()
                    .and_hms_opt(12, 30, 0)
                    .unwrap()
                    .and_local_timezone(offset)
                    .unwrap()
            ))
        );
    }

    #[test]
    fn test_duration_hh_mm_ss() {
        assert_eq!(
            scalar("00:14:59", ValueKind::Duration),
            Ok(Value::Duration(Duration::minutes(14) + Duration::seconds(59)))
        );
        assert!(scalar("00:14", ValueKind::Duration).is_err());
        assert!(scalar("00:61:00", ValueKind::Duration).is_err());
    }

    #[test]
    fn test_duration_beyond_representable_range_is_invalid() {
        let raw = "2562047788015216:00:00";
        assert_eq!(
            scalar(raw, ValueKind::Duration),
            Err(ConvertError::InvalidValue {
                raw: raw.to_string(),
                kind: ValueKind::Duration,
            })
        );
        assert!(scalar("9223372036854775807:00:00", ValueKind::Duration).is_err());
    }

    #[test]
    fn test_enum_matches_case_insensitively() {
        let kind = ValueKind::Enum(vec!["Debug".into(), "Info".into()]);
        assert_eq!(scalar("info", kind.clone()), Ok(Value::Enum("Info".into())));
        assert!(matches!(
            scalar("trace", kind),
            Err(ConvertError::UnknownEnumMember { .. })
        ));
    }

    #[test]
    fn test_nullable_absent_is_null() {
        let target = TargetType::Nullable(ValueKind::I32);
        assert_eq!(convert(&[], &target, &registry()), Ok(Value::Null));
        assert_eq!(
            convert(&raws(&[""]), &target, &registry()),
            Ok(Value::Null)
        );
        assert_eq!(
            convert(&raws(&["666"]), &target, &registry()),
            Ok(Value::Int(666))
        );
    }

    #[test]
    fn test_scalar_rejects_multiple_values() {
        let result = convert_scalar(&raws(&["a", "b"]), &ValueKind::String, &registry());
        assert_eq!(
            result,
            Err(ConvertError::TooManyValues {
                kind: ValueKind::String,
                count: 2,
            })
        );
    }

    #[test]
    fn test_scalar_rejects_missing_value() {
        let result = convert_scalar(&[], &ValueKind::I32, &registry());
        assert_eq!(result, Err(ConvertError::MissingValue { kind: ValueKind::I32 }));
    }

    #[test]
    fn test_sequence_converts_element_wise_in_order() {
        let target = TargetType::Sequence {
            element: ValueKind::I32,
            shape: SequenceShape::Array,
        };
        assert_eq!(
            convert(&raws(&["47", "69"]), &target, &registry()),
            Ok(Value::Seq(vec![Value::Int(47), Value::Int(69)]))
        );
    }

    #[test]
    fn test_set_shape_deduplicates() {
        let target = TargetType::Sequence {
            element: ValueKind::String,
            shape: SequenceShape::Set,
        };
        assert_eq!(
            convert(&raws(&["a", "b", "a"]), &target, &registry()),
            Ok(Value::Seq(vec![
                Value::Str("a".into()),
                Value::Str("b".into()),
            ]))
        );
    }

    #[test]
    fn test_sequence_fails_on_first_bad_element() {
        let target = TargetType::Sequence {
            element: ValueKind::I32,
            shape: SequenceShape::List,
        };
        let result = convert(&raws(&["1", "oops", "3"]), &target, &registry());
        assert!(matches!(
            result,
            Err(ConvertError::InvalidValue { ref raw, .. }) if raw == "oops"
        ));
    }

    #[test]
    fn test_custom_type_round_trip() {
        let value = scalar("1.2.3", ValueKind::Custom("semver".into())).unwrap();
        let Value::Custom(custom) = value else {
            panic!("expected custom value");
        };
        assert_eq!(
            custom.downcast_ref::<Semver>(),
            Some(&Semver {
                major: 1,
                minor: 2,
                patch: 3,
            })
        );
    }

    #[test]
    fn test_custom_parse_failure_carries_message() {
        let result = scalar("nope", ValueKind::Custom("semver".into()));
        assert!(matches!(
            result,
            Err(ConvertError::CustomParse { ref type_name, .. }) if type_name == "semver"
        ));
    }

    #[test]
    fn test_unregistered_custom_type_is_unsupported() {
        let result = scalar("x", ValueKind::Custom("missing".into()));
        assert_eq!(result, Err(ConvertError::UnsupportedType("missing".into())));
    }
}
