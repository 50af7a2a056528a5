//! End-to-end validation scenarios through the public API.

use formrule::{
    validate, validate_lists, validate_pipes, ConfigError, FieldData, RuleRegistry, RuleSet,
    RuleSpec, Validator, DEFAULT_KEY,
};
use serde_json::json;
use std::thread;

const NO_MESSAGES: [(&str, &str); 0] = [];

fn data(fields: &[(&str, &[&str])]) -> FieldData {
    fields
        .iter()
        .map(|(field, values)| {
            (
                field.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn all_rules_pass() {
    let errors = validate_lists(
        &data(&[("hello", &["2"])]),
        [("hello", vec!["min:1", r"regex:^\w$"])],
    )
    .unwrap();

    assert!(errors.is_empty());
    assert!(errors.primary().is_none());
}

#[test]
fn missing_required_field() {
    let errors = validate_lists(&FieldData::new(), [("name", vec!["required"])]).unwrap();

    assert_eq!(errors.primary(), Some("the param name not valid!"));
    let failure = errors.into_result().unwrap_err();
    assert_eq!(failure.to_string(), "the param name not valid!");
    assert_eq!(
        failure.errors().get("name").unwrap().get(DEFAULT_KEY),
        Some("the param name not valid!")
    );
}

#[test]
fn nullable_empty_value_is_skipped() {
    let errors = validate_lists(
        &data(&[("age", &[""])]),
        [("age", vec!["nullable", "min:1"])],
    )
    .unwrap();

    assert!(errors.is_empty());
}

#[test]
fn field_override_lands_under_def() {
    let errors = validate(
        &data(&[("age", &["abc"])]),
        &RuleSpec::from_lists([("age", vec!["numeric"])]),
        [("age", "age must be numeric")],
    )
    .unwrap();

    let age = errors.get("age").unwrap();
    assert_eq!(age.get(DEFAULT_KEY), Some("age must be numeric"));
    assert_eq!(errors.primary(), Some("age must be numeric"));
}

#[test]
fn rule_override_lands_under_rule_name() {
    let errors = validate(
        &data(&[("age", &["abc"])]),
        &RuleSpec::from_lists([("age", vec!["numeric"])]),
        [("age.numeric", "bad number")],
    )
    .unwrap();

    let age = errors.get("age").unwrap();
    assert_eq!(age.get("numeric"), Some("bad number"));
    assert_eq!(age.get(DEFAULT_KEY), None);
    assert_eq!(errors.primary(), Some("bad number"));
}

#[test]
fn pipe_form_matches_list_form() {
    let input = data(&[("email", &["nope"]), ("age", &["17"])]);

    let from_pipes =
        validate_pipes(&input, [("email", "required|email"), ("age", "int|gte:18")]).unwrap();
    let from_lists = validate_lists(
        &input,
        [
            ("email", vec!["required", "email"]),
            ("age", vec!["int", "gte:18"]),
        ],
    )
    .unwrap();

    assert_eq!(from_pipes, from_lists);
    assert_eq!(from_pipes.field_names(), vec!["email", "age"]);
}

#[test]
fn dynamic_rules_from_json() {
    let rules = RuleSpec::from_json(&json!({
        "tags": ["in:red,green,blue"],
        "site": "nullable|url",
    }))
    .unwrap();

    let errors = validate(
        &data(&[("tags", &["red", "pink"]), ("site", &["not a url"])]),
        &rules,
        NO_MESSAGES,
    )
    .unwrap();

    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.get("tags").unwrap().get("in"),
        Some("the field tags not valid in in")
    );
    assert_eq!(
        errors.get("site").unwrap().get("url"),
        Some("the field site not valid in url")
    );
}

#[test]
fn unsupported_rule_shape_is_rejected() {
    let err = RuleSpec::from_json(&json!({ "age": { "min": 1 } })).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedRuleShape { .. }));
}

#[test]
fn unknown_rule_is_a_config_error() {
    let err = validate_pipes(&data(&[("age", &["3"])]), [("age", "integer")]).unwrap_err();
    assert_eq!(err.to_string(), "the valid rule `integer` does not exist");
}

#[test]
fn rule_set_document_end_to_end() {
    let set = RuleSet::from_json_str(
        r#"{
            "rules": {
                "mobile": "required|mobile",
                "age": ["nullable", "int", "gt:0"]
            },
            "messages": {
                "mobile": "please enter a mobile number",
                "age.gt": "age must be positive"
            }
        }"#,
    )
    .unwrap();

    let errors = set
        .validate(
            &Validator::builtin(),
            &data(&[("mobile", &["12345"]), ("age", &["-3"])]),
        )
        .unwrap();

    assert_eq!(errors.primary(), Some("please enter a mobile number"));
    assert_eq!(
        errors.get("age").unwrap().get("gt"),
        Some("age must be positive")
    );

    let api_error = serde_json::to_value(errors.to_api_error()).unwrap();
    assert_eq!(api_error["error"]["type"], "validation_error");
    assert_eq!(api_error["error"]["message"], "please enter a mobile number");
    assert_eq!(api_error["error"]["fields"][0]["field"], "mobile");
    assert_eq!(api_error["error"]["fields"][0]["code"], "def");
}

#[test]
fn registry_is_shared_across_threads() {
    let registry = RuleRegistry::builtin();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let input = data(&[("n", &[if i % 2 == 0 { "4" } else { "x" }])]);
                Validator::new(registry)
                    .validate(&input, &RuleSpec::from_pipes([("n", "int")]), NO_MESSAGES)
                    .unwrap()
                    .is_empty()
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![true, false, true, false]);
}
