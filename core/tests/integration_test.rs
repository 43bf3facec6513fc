use request_params::api::*;
use request_params::formatter::into_response;
use regex::Regex;
use serde_json::json;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn map(value: serde_json::Value) -> ParamMap {
    match Value::from_json(value) {
        Some(Value::Hash(map)) => map,
        other => panic!("expected object, got {:?}", other),
    }
}

#[test]
fn test_min_max_integration() {
    init();
    let settings = ParamSettings::default();
    let options = ParamOptions::new().min(12).max(20);

    for (raw, expected) in [
        ("5", Some("Parameter cannot be less than 12")),
        ("25", Some("Parameter cannot be greater than 20")),
        ("15", None),
    ] {
        let mut params = parse_query_string(&format!("arg={}", raw));
        let mut ctx = ParamContext::new(&mut params, &settings);
        let result = ctx.param("arg", &ParamType::Integer, &options);
        assert_eq!(result.err().map(|e| e.message), expected.map(str::to_string));
    }
}

#[test]
fn test_relational_integration() {
    init();
    let settings = ParamSettings::default();
    let names = ["a", "b", "c"];
    let none = ParamOptions::new();

    let cases: [(serde_json::Value, [bool; 3]); 4] = [
        // one_of, any_of, all_or_none_of
        (json!({}), [true, false, true]),
        (json!({"a": 1}), [true, true, false]),
        (json!({"a": 1, "b": 2}), [false, true, false]),
        (json!({"a": 1, "b": 2, "c": 3}), [false, true, true]),
    ];

    for (input, [one_of, any_of, all_or_none]) in cases {
        let mut params = map(input.clone());
        let ctx = ParamContext::new(&mut params, &settings);
        assert_eq!(ctx.one_of(&names, &none).is_ok(), one_of, "one_of {}", input);
        assert_eq!(ctx.any_of(&names, &none).is_ok(), any_of, "any_of {}", input);
        assert_eq!(
            ctx.all_or_none_of(&names, &none).is_ok(),
            all_or_none,
            "all_or_none_of {}",
            input
        );
    }

    let mut params = map(json!({"c": 3}));
    let ctx = ParamContext::new(&mut params, &settings);
    assert!(ctx.any_of(&names, &none).is_ok());

    let mut params = map(json!({"a": 1, "b": 2}));
    let ctx = ParamContext::new(&mut params, &settings);
    let err = ctx.one_of(&names, &ParamOptions::new().status(406)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OneOfViolation);
    assert_eq!(err.param, "[a, b, c]");
    assert_eq!(err.summary, "Invalid parameters [a, b, c]");
    assert_eq!(err.status, 406);
}

#[test]
fn test_boolean_integration() {
    init();
    let settings = ParamSettings::default();
    for (raw, expected) in [
        ("1", Some(true)),
        ("true", Some(true)),
        ("t", Some(true)),
        ("yes", Some(true)),
        ("y", Some(true)),
        ("0", Some(false)),
        ("false", Some(false)),
        ("f", Some(false)),
        ("no", Some(false)),
        ("n", Some(false)),
        ("xyz", None),
    ] {
        let mut params = parse_query_string(&format!("flag={}", raw));
        let mut ctx = ParamContext::new(&mut params, &settings);
        match (ctx.param("flag", &ParamType::Boolean, &ParamOptions::new()), expected) {
            (Ok(value), Some(b)) => assert_eq!(value, Some(Value::Boolean(b))),
            (Err(err), None) => {
                assert_eq!(err.kind, ErrorKind::Coercion);
                assert_eq!(err.message, "'xyz' is not a valid Boolean");
            }
            (other, _) => panic!("unexpected result for {:?}: {:?}", raw, other),
        }
    }
}

#[test]
fn test_nested_required_child_integration() {
    init();
    let settings = ParamSettings::default();
    let declare = |ctx: &mut ParamContext<'_>| {
        ctx.param_nested("parent", &ParamType::Hash, &ParamOptions::new().required(), |child| {
            child.param("child", &ParamType::Integer, &ParamOptions::new().required())?;
            Ok(())
        })
    };

    let mut params = map(json!({"parent": {}}));
    let err = declare(&mut ParamContext::new(&mut params, &settings)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingRequired);
    assert_eq!(err.param, "parent[child]");
    assert_eq!(err.message, "Parameter is required");

    let mut params = map(json!({"parent": {"child": "1"}}));
    let value = declare(&mut ParamContext::new(&mut params, &settings)).unwrap();
    assert_eq!(value, Some(Value::Hash(map(json!({"child": 1})))));
    assert_eq!(params["parent"], Value::Hash(map(json!({"child": 1}))));
}

#[test]
fn test_deeply_nested_integration() {
    init();
    let settings = ParamSettings::default();
    let mut params = parse_query_string(
        "parent[required_child]=1&parent[nested_child][optional_sub_child]=test",
    );
    let mut ctx = ParamContext::new(&mut params, &settings);

    let err = ctx
        .param_nested("parent", &ParamType::Hash, &ParamOptions::new(), |parent| {
            parent.param("required_child", &ParamType::Integer, &ParamOptions::new().required())?;
            parent.param_nested(
                "nested_child",
                &ParamType::Hash,
                &ParamOptions::new(),
                |nested| {
                    nested.param("optional_sub_child", &ParamType::Integer, &ParamOptions::new())?;
                    Ok(())
                },
            )?;
            Ok(())
        })
        .unwrap_err();

    assert_eq!(err.param, "parent[nested_child][optional_sub_child]");
    assert_eq!(err.message, "'test' is not a valid Integer");

    let Outcome::Halt(response) = respond(err, "application/json") else {
        panic!("expected halt");
    };
    match response.body {
        ResponseBody::Json(body) => assert_eq!(
            body,
            json!({
                "message": "'test' is not a valid Integer",
                "errors": {
                    "parent[nested_child][optional_sub_child]": "'test' is not a valid Integer"
                }
            })
        ),
        other => panic!("Expected JSON body, got {:?}", other),
    }
}

#[test]
fn test_embedded_name_integration() {
    init();
    let settings = ParamSettings::default();
    let mut params = parse_query_string("a[b]=7");
    let mut ctx = ParamContext::new(&mut params, &settings);

    let value = ctx
        .param("a[b]", &ParamType::Integer, &ParamOptions::new().max(10))
        .unwrap();
    assert_eq!(value, Some(Value::Integer(7)));

    let err = ctx
        .param("a[c]", &ParamType::String, &ParamOptions::new().required())
        .unwrap_err();
    assert_eq!(err.param, "a[c]");

    ctx.param("x[y]", &ParamType::String, &ParamOptions::new().default_value("z"))
        .unwrap();
    assert_eq!(ParamPath::parse("x[y]").read(ctx.params()), Some(&Value::from("z")));
    assert_eq!(ParamPath::parse("a[b]").read(&params), Some(&Value::Integer(7)));
}

#[test]
fn test_nested_relational_integration() {
    init();
    let settings = ParamSettings::default();
    let mut params = map(json!({"parent": {"a": 1, "b": 2}}));
    let mut ctx = ParamContext::new(&mut params, &settings);

    let err = ctx
        .param_nested("parent", &ParamType::Hash, &ParamOptions::new(), |parent| {
            parent.one_of(&["a", "b", "c"], &ParamOptions::new())
        })
        .unwrap_err();

    let Outcome::Halt(response) = respond(err, "application/json") else {
        panic!("expected halt");
    };
    match response.body {
        ResponseBody::Json(body) => {
            assert_eq!(body["message"], "Invalid parameters parent[[a, b, c]]");
            assert_eq!(
                body["errors"]["parent[[a, b, c]]"],
                "Parameters [a, b, c] are mutually exclusive"
            );
        }
        other => panic!("Expected JSON body, got {:?}", other),
    }
}

#[test]
fn test_format_on_non_string_integration() {
    init();
    let settings = ParamSettings::default();
    let mut params = parse_query_string("port=9000");
    let mut ctx = ParamContext::new(&mut params, &settings);
    let options = ParamOptions::new().format(Regex::new("9000").unwrap());

    let err = ctx.param("port", &ParamType::Integer, &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotAString);
    assert_eq!(
        err.message,
        "Parameter should be a string if using the format validation"
    );
}

#[test]
fn test_raise_and_overrides_integration() {
    init();
    let mut params = ParamMap::new();
    let settings = ParamSettings::from_json(r#"{"default_status": 422}"#).unwrap();
    let mut ctx = ParamContext::new(&mut params, &settings);

    let err = ctx
        .param("token", &ParamType::String, &ParamOptions::new().required().raise())
        .unwrap_err();
    assert!(matches!(respond(err, "text/plain"), Outcome::Raise(e) if e.status == 422));

    let err = ctx
        .param(
            "token",
            &ParamType::String,
            &ParamOptions::new().required().status(401).message("token missing"),
        )
        .unwrap_err();
    let Outcome::Halt(response) = respond(err, "text/plain") else {
        panic!("expected halt");
    };
    assert_eq!(response.status_code, 401);
    assert_eq!(response.body, ResponseBody::Text("token missing".to_string()));

    let err = ctx
        .param(
            "token",
            &ParamType::String,
            &ParamOptions::new().required().message("token missing"),
        )
        .unwrap_err();
    let response = into_response(&err, "application/json");
    assert_eq!(response.status_code, 422);
    assert_eq!(
        response.body,
        ResponseBody::Json(json!({
            "message": "token missing",
            "errors": {"token": "Parameter is required"},
        }))
    );
}

#[test]
fn test_default_generator_and_transform_integration() {
    init();
    fn today() -> Value {
        Value::from("generated")
    }

    let settings = ParamSettings::default();
    let mut params = parse_query_string("name=+ada+&tags=b,a,b");
    let mut ctx = ParamContext::new(&mut params, &settings);

    let name = ctx
        .param(
            "name",
            &ParamType::String,
            &ParamOptions::new().transform(Transform::Strip),
        )
        .unwrap();
    assert_eq!(name, Some(Value::from("ada")));

    let tags = ctx
        .param("tags", &ParamType::Array, &ParamOptions::new().transform(Transform::Uniq))
        .unwrap();
    assert_eq!(tags, Some(Value::from(vec!["b", "a"])));

    let stamp = ctx
        .param("stamp", &ParamType::String, &ParamOptions::new().default_with(today))
        .unwrap();
    assert_eq!(stamp, Some(Value::from("generated")));

    let skipped = ctx
        .param("absent", &ParamType::String, &ParamOptions::new().transform(Transform::Upcase))
        .unwrap();
    assert_eq!(skipped, None);
    assert!(!ctx.params().contains_key("absent"));
}

#[test]
fn test_collector_integration() {
    init();
    let settings = ParamSettings::default();
    let mut params = parse_query_string("page=x&order=sideways");
    let mut ctx = ParamContext::new(&mut params, &settings);
    let mut collector = ErrorCollector::new();

    collector.record(ctx.param("page", &ParamType::Integer, &ParamOptions::new()));
    collector.record(ctx.param(
        "order",
        &ParamType::String,
        &ParamOptions::new().within(["asc", "desc"]),
    ));
    collector.record(ctx.param("limit", &ParamType::Integer, &ParamOptions::new().default_value(10)));

    assert_eq!(collector.len(), 2);
    let response = collector.response("application/json").unwrap();
    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.body,
        ResponseBody::Json(json!([
            {"param": "page", "message": "'x' is not a valid Integer"},
            {"param": "order", "message": "Parameter must be within [\"asc\", \"desc\"]"},
        ]))
    );
}

#[test]
fn test_pruning_integration() {
    init();
    let settings = ParamSettings::default();
    let mut params = parse_query_string("keep=1&extra=2&parent[inner]=3&parent[junk]=4");
    let mut ctx = ParamContext::new(&mut params, &settings);

    ctx.param("keep", &ParamType::Integer, &ParamOptions::new()).unwrap();
    ctx.param_nested("parent", &ParamType::Hash, &ParamOptions::new(), |parent| {
        parent.param("inner", &ParamType::Integer, &ParamOptions::new())?;
        parent.retain_declared();
        Ok(())
    })
    .unwrap();
    ctx.retain_declared();

    assert_eq!(
        Value::Hash(params),
        Value::Hash(map(json!({"keep": 1, "parent": {"inner": 3}})))
    );
}

#[test]
fn test_request_sources_integration() {
    init();
    let mut request = HttpRequest {
        query: "ids[]=1&ids[]=2".to_string(),
        body: request_params::request::RequestBody::Raw(br#"{"price": "9.99"}"#.to_vec()),
        ..HttpRequest::default()
    };
    request
        .headers
        .insert("Content-Type".to_string(), "application/json".to_string());
    request.path_params.insert("id".to_string(), "17".to_string());

    let mut params = request.params().unwrap();
    let settings = ParamSettings::default();
    let mut ctx = ParamContext::new(&mut params, &settings);

    assert_eq!(
        ctx.param("ids", &ParamType::array_of(ParamType::Integer), &ParamOptions::new())
            .unwrap(),
        Some(Value::from(vec![1i64, 2]))
    );
    assert_eq!(
        ctx.param("price", &ParamType::Float, &ParamOptions::new()).unwrap(),
        Some(Value::Float(9.99))
    );
    assert_eq!(
        ctx.param("id", &ParamType::Integer, &ParamOptions::new()).unwrap(),
        Some(Value::Integer(17))
    );
}

#[test]
fn test_delimiter_options_integration() {
    init();
    let settings = ParamSettings::from_json(r#"{"default_delimiter": "|"}"#).unwrap();
    let mut params = parse_query_string("ids=3|1|2&filter=a=1;b=2");
    let mut ctx = ParamContext::new(&mut params, &settings);

    let ids = ctx
        .param("ids", &ParamType::array_of(ParamType::Integer), &ParamOptions::new())
        .unwrap();
    assert_eq!(ids, Some(Value::from(vec![3i64, 1, 2])));

    let filter = ctx
        .param(
            "filter",
            &ParamType::Hash,
            &ParamOptions::new().delimiter(";").separator("="),
        )
        .unwrap();
    assert_eq!(filter, Some(Value::Hash(map(json!({"a": "1", "b": "2"})))));
}

#[test]
fn test_oversized_json_number_integration() {
    init();
    let settings = ParamSettings::default();
    let mut params = map(json!({"n": 1e30, "m": 42.0}));
    let mut ctx = ParamContext::new(&mut params, &settings);

    let err = ctx
        .param("n", &ParamType::Integer, &ParamOptions::new())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Coercion);
    assert!(err.message.ends_with("is not a valid Integer"));
    assert_eq!(ctx.params().get("n"), Some(&Value::Float(1e30)));

    let m = ctx.param("m", &ParamType::Integer, &ParamOptions::new()).unwrap();
    assert_eq!(m, Some(Value::Integer(42)));
}
