use serde_json::json;

use qa_conditions::{
    Action, ConditionEngine, Diagnostic, FormSpec, Operand, Operator, Scalar, SpecError,
    check_required, form_schema, resolve_visibility,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "employment_form" => include_str!("../tests/fixtures/employment_form.json"),
        "malformed_rules" => include_str!("../tests/fixtures/malformed_rules.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

#[test]
fn conditions_deserialize_from_camel_case_json() {
    let spec = FormSpec::from_json_str(fixture("employment_form")).expect("deserialize");
    let company = spec.question("company").expect("company question");
    let condition = &company.conditions[0];

    assert_eq!(condition.question_id, "employed");
    assert_eq!(condition.operator, Operator::Equals);
    assert_eq!(condition.value, Some(Operand::Scalar(Scalar::Bool(true))));
    assert_eq!(condition.action, Action::Show);
}

#[test]
fn operands_keep_their_types() {
    let spec = FormSpec::from_value(json!({
        "id": "types",
        "title": "Types",
        "version": "1.0",
        "questions": [{
            "id": "q",
            "conditions": [
                { "question_id": "a", "operator": "in", "value": ["x", 2, true], "action": "show" },
                { "questionId": "a", "operator": "is-empty", "action": "hide" }
            ]
        }]
    }))
    .expect("deserialize");

    let conditions = &spec.questions[0].conditions;
    assert_eq!(
        conditions[0].value,
        Some(Operand::List(vec![
            Scalar::Text("x".into()),
            Scalar::Number(2.0),
            Scalar::Bool(true),
        ]))
    );
    assert_eq!(conditions[1].value, None);
    assert_eq!(conditions[1].operator, Operator::IsEmpty);
}

#[test]
fn operator_names_round_trip() {
    let serialized = serde_json::to_value(Operator::GreaterThanOrEqual).expect("serialize");
    assert_eq!(serialized, json!("greater-than-or-equal"));
    let unknown: Operator = serde_json::from_value(json!("approx")).expect("deserialize");
    assert_eq!(unknown, Operator::Unknown("approx".into()));
    assert_eq!(serde_json::to_value(&unknown).expect("serialize"), json!("approx"));
}

#[test]
fn malformed_rules_degrade_to_visible() {
    let spec = FormSpec::from_json_str(fixture("malformed_rules")).expect("deserialize");
    let mut engine = ConditionEngine::from_form(&spec, &json!({ "source": "abc" }));

    let state = engine.question_state("target");
    assert!(state.visible);
    assert!(!state.required);
    assert!(!state.disabled);

    let diagnostics = engine.diagnostics();
    assert!(diagnostics.contains(&Diagnostic::MissingReference {
        question_id: "target".into(),
        referenced: "ghost".into(),
    }));
    assert!(diagnostics.contains(&Diagnostic::UnknownAction {
        question_id: "target".into(),
        action: "highlight".into(),
    }));
    assert!(diagnostics.contains(&Diagnostic::UnknownOperator {
        question_id: "target".into(),
        operator: "matches-regex".into(),
    }));

    let path = engine.evaluation_path("target");
    assert_eq!(path[0], "\"Source\" matches-regex \"^a\" -> hide (unsupported)");
    assert_eq!(path[1], "\"ghost\" equals 1 -> highlight (not met)");
    // diagnostics are recorded once
    assert_eq!(engine.diagnostics().len(), 3);
}

#[test]
fn object_operand_loads_and_is_never_met() {
    let spec = FormSpec::from_value(json!({
        "id": "odd",
        "title": "Odd operands",
        "version": "0.1.0",
        "questions": [
            { "id": "source" },
            {
                "id": "target",
                "conditions": [
                    { "questionId": "source", "operator": "equals", "value": { "nested": true }, "action": "show" }
                ]
            },
            {
                "id": "listed",
                "conditions": [
                    { "questionId": "source", "operator": "in", "value": ["a", null], "action": "require" }
                ]
            }
        ]
    }))
    .expect("object operands still load");

    let condition = &spec.questions[1].conditions[0];
    assert_eq!(condition.value, Some(Operand::Invalid(json!({ "nested": true }))));

    let mut engine = ConditionEngine::from_form(&spec, &json!({ "source": "a" }));
    assert!(!engine.question_state("target").visible);
    assert!(!engine.question_state("listed").required);
    assert_eq!(
        engine.evaluation_path("target"),
        vec!["\"source\" equals {\"nested\":true} -> show (unsupported)"]
    );
    assert_eq!(
        engine.diagnostics(),
        &[
            Diagnostic::InvalidOperand {
                question_id: "target".into(),
                referenced: "source".into(),
                operand: r#"{"nested":true}"#.into(),
            },
            Diagnostic::InvalidOperand {
                question_id: "listed".into(),
                referenced: "source".into(),
                operand: r#"["a",null]"#.into(),
            },
        ]
    );
}

#[test]
fn empty_question_id_is_rejected() {
    let error = FormSpec::from_value(json!({
        "id": "bad",
        "title": "Bad",
        "version": "1.0",
        "questions": [{ "id": "ok" }, { "id": " " }]
    }))
    .expect_err("empty id");
    assert!(matches!(error, SpecError::EmptyQuestionId(1)));
}

#[test]
fn invalid_json_is_reported() {
    let error = FormSpec::from_json_str("{ not json").expect_err("invalid json");
    assert!(matches!(error, SpecError::Json(_)));
    assert!(error.to_string().starts_with("invalid form definition"));
}

#[test]
fn visibility_map_covers_every_question() {
    let spec = FormSpec::from_json_str(fixture("employment_form")).expect("deserialize");
    let visibility = resolve_visibility(&spec, &json!({ "skills": ["react"] }));

    assert_eq!(visibility.len(), spec.questions.len());
    assert_eq!(visibility.get("react-version"), Some(&true));
    assert_eq!(visibility.get("company"), Some(&false));
}

#[test]
fn required_report_lists_missing_and_unknown() {
    let spec = FormSpec::from_json_str(fixture("employment_form")).expect("deserialize");

    let report = check_required(&spec, &json!({ "employed": true, "nickname": "bob" }));
    assert!(!report.valid);
    assert_eq!(report.missing_required, vec!["employer-address"]);
    assert_eq!(report.unknown_fields, vec!["nickname"]);

    let report = check_required(
        &spec,
        &json!({ "employed": true, "employer-address": "Main street 1" }),
    );
    assert!(report.valid);
}

#[test]
fn schema_describes_conditions() {
    let schema = form_schema();
    let text = schema.to_string();
    assert!(text.contains("questions"));
    assert!(text.contains("questionId"));
}
