use std::collections::HashMap;

use cli_dispatch_core::*;
use cli_dispatch_engine::{
    dispatch, BindError, ConvertError, ConverterRegistry, DispatchError, TryFromText, Value,
};

fn no_env() -> HashMap<String, String> {
    HashMap::new()
}

fn registry() -> ConverterRegistry {
    ConverterRegistry::new()
}

#[test]
fn test_routes_and_binds_subcommand_end_to_end() {
    let app = ApplicationSchema::resolve(vec![
        CommandSchema::new("remote"),
        CommandSchema::new("remote add")
            .with_parameter(ParameterSchema::required(
                "name",
                0,
                TargetType::Scalar(ValueKind::String),
            ))
            .with_parameter(ParameterSchema::required(
                "url",
                1,
                TargetType::Scalar(ValueKind::String),
            ))
            .with_option(OptionSchema::flag("fetch").with_short('f')),
    ])
    .unwrap();

    let invocation = dispatch(
        &app,
        &["remote", "add", "origin", "https://example.com/repo.git", "-f"],
        &no_env(),
        &registry(),
    )
    .unwrap();

    assert_eq!(invocation.command.name, "remote add");
    assert_eq!(invocation.consumed, 2);
    assert_eq!(
        invocation.bound.get("name"),
        Some(&Value::Str("origin".into()))
    );
    assert_eq!(
        invocation.bound.get("url"),
        Some(&Value::Str("https://example.com/repo.git".into()))
    );
    assert_eq!(invocation.bound.get("fetch"), Some(&Value::Bool(true)));
}

#[test]
fn test_nullable_int_option_round_trip() {
    let app = ApplicationSchema::resolve(vec![
        CommandSchema::default_command()
            .with_option(OptionSchema::new("count", TargetType::Nullable(ValueKind::I32))),
    ])
    .unwrap();

    let with_value = dispatch(&app, &["--count", "42"], &no_env(), &registry()).unwrap();
    assert_eq!(with_value.bound.get("count"), Some(&Value::Int(42)));

    let bare = dispatch(&app, &["--count"], &no_env(), &registry()).unwrap();
    assert_eq!(bare.bound.get("count"), Some(&Value::Null));
}

#[test]
fn test_integer_array_parameter() {
    let app = ApplicationSchema::resolve(vec![CommandSchema::new("sum").with_parameter(
        ParameterSchema::optional(
            "values",
            0,
            TargetType::Sequence {
                element: ValueKind::I32,
                shape: SequenceShape::Array,
            },
        )
        .capture_rest(),
    )])
    .unwrap();

    let invocation = dispatch(&app, &["sum", "47", "69"], &no_env(), &registry()).unwrap();
    assert_eq!(
        invocation.bound.get("values"),
        Some(&Value::Seq(vec![Value::Int(47), Value::Int(69)]))
    );
}

#[test]
fn test_missing_required_option_surfaces_its_name() {
    let app = ApplicationSchema::resolve(vec![
        CommandSchema::new("tag")
            .with_parameter(ParameterSchema::optional("name", 0, TargetType::default()))
            .with_option(OptionSchema::new("message", TargetType::default()).require()),
    ])
    .unwrap();

    let error = dispatch(&app, &["tag", "v1"], &no_env(), &registry()).unwrap_err();
    assert_eq!(
        error,
        DispatchError::Bind(BindError::MissingOption("message".to_string()))
    );
}

#[test]
fn test_routing_failure_without_default_command() {
    let app = ApplicationSchema::resolve(vec![CommandSchema::new("push")]).unwrap();
    let error = dispatch(&app, &["pull"], &no_env(), &registry()).unwrap_err();
    assert!(matches!(error, DispatchError::Route(_)));
}

#[test]
fn test_repeated_option_accumulates_into_sequence() {
    let app = ApplicationSchema::resolve(vec![
        CommandSchema::default_command().with_option(OptionSchema::new(
            "name",
            TargetType::Sequence {
                element: ValueKind::String,
                shape: SequenceShape::List,
            },
        )),
    ])
    .unwrap();

    let invocation = dispatch(
        &app,
        &["--name", "x", "--name", "y"],
        &no_env(),
        &registry(),
    )
    .unwrap();
    assert_eq!(
        invocation.bound.get("name"),
        Some(&Value::Seq(vec![
            Value::Str("x".into()),
            Value::Str("y".into()),
        ]))
    );
}

#[test]
fn test_directives_are_available_on_the_invocation() {
    let app = ApplicationSchema::resolve(vec![CommandSchema::new("run")]).unwrap();
    let invocation = dispatch(&app, &["[preview]", "run"], &no_env(), &registry()).unwrap();
    assert!(invocation.input.is_preview_directive_specified());
    assert_eq!(invocation.consumed, 1);
}

#[derive(Debug, PartialEq)]
struct HostPort {
    host: String,
    port: u16,
}

impl TryFromText for HostPort {
    fn try_from_text(text: &str) -> Result<Self, String> {
        let (host, port) = text
            .rsplit_once(':')
            .ok_or_else(|| format!("expected host:port, got {text:?}"))?;
        Ok(HostPort {
            host: host.to_string(),
            port: port.parse().map_err(|e| format!("bad port: {e}"))?,
        })
    }
}

#[test]
fn test_custom_type_binds_through_registry() {
    let mut registry = ConverterRegistry::new();
    registry.register::<HostPort>("host-port");

    let app = ApplicationSchema::resolve(vec![
        CommandSchema::new("connect").with_parameter(ParameterSchema::required(
            "endpoint",
            0,
            TargetType::Scalar(ValueKind::Custom("host-port".into())),
        )),
    ])
    .unwrap();

    let invocation = dispatch(
        &app,
        &["connect", "example.com:8080"],
        &no_env(),
        &registry,
    )
    .unwrap();

    let Some(Value::Custom(custom)) = invocation.bound.get("endpoint") else {
        panic!("expected a custom value");
    };
    assert_eq!(
        custom.downcast_ref::<HostPort>(),
        Some(&HostPort {
            host: "example.com".to_string(),
            port: 8080,
        })
    );
}

#[test]
fn test_option_converter_override_routes_through_registry() {
    let mut registry = ConverterRegistry::new();
    registry.register::<HostPort>("host-port");

    let app = ApplicationSchema::resolve(vec![
        CommandSchema::default_command().with_option(
            OptionSchema::new("endpoint", TargetType::Scalar(ValueKind::String))
                .with_converter("host-port"),
        ),
    ])
    .unwrap();

    let invocation = dispatch(
        &app,
        &["--endpoint", "localhost:9000"],
        &no_env(),
        &registry,
    )
    .unwrap();
    let Some(Value::Custom(custom)) = invocation.bound.get("endpoint") else {
        panic!("expected a custom value");
    };
    assert_eq!(custom.downcast_ref::<HostPort>().map(|hp| hp.port), Some(9000));
}

#[test]
fn test_conversion_error_is_inspectable_through_bind_error() {
    let app = ApplicationSchema::resolve(vec![
        CommandSchema::default_command()
            .with_option(OptionSchema::new("count", TargetType::Scalar(ValueKind::U32))),
    ])
    .unwrap();

    let error = dispatch(&app, &["--count", "lots"], &no_env(), &registry()).unwrap_err();
    let DispatchError::Bind(BindError::Conversion { member, source }) = error else {
        panic!("expected a conversion failure");
    };
    assert_eq!(member, "count");
    assert_eq!(
        source,
        ConvertError::InvalidValue {
            raw: "lots".to_string(),
            kind: ValueKind::U32,
        }
    );
}

#[test]
fn test_env_members_bind_from_environment_mapping() {
    let app = ApplicationSchema::resolve(vec![CommandSchema::new("deploy").with_env_member(
        EnvSchema::new("token", "DEPLOY_TOKEN", TargetType::default()),
    )])
    .unwrap();

    let mut env = HashMap::new();
    env.insert("deploy_token".to_string(), "secret".to_string());

    let invocation = dispatch(&app, &["deploy"], &env, &registry()).unwrap();
    assert_eq!(
        invocation.bound.get("token"),
        Some(&Value::Str("secret".into()))
    );
}

#[test]
fn test_double_dash_escape_feeds_parameters() {
    let app = ApplicationSchema::resolve(vec![CommandSchema::new("echo").with_parameter(
        ParameterSchema::optional(
            "words",
            0,
            TargetType::Sequence {
                element: ValueKind::String,
                shape: SequenceShape::List,
            },
        )
        .capture_rest(),
    )])
    .unwrap();

    let invocation = dispatch(
        &app,
        &["echo", "--", "--not-an-option"],
        &no_env(),
        &registry(),
    )
    .unwrap();
    assert_eq!(
        invocation.bound.get("words"),
        Some(&Value::Seq(vec![Value::Str("--not-an-option".into())]))
    );
}
