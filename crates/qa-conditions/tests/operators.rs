use serde_json::{Value, json};

use qa_conditions::{Action, Condition, Evaluation, Operand, Operator, evaluate};

fn condition(operator: Operator, value: Option<Operand>) -> Condition {
    Condition {
        question_id: "subject".into(),
        operator,
        value,
        action: Action::Show,
    }
}

fn met(operator: Operator, operand: impl Into<Operand>, value: Value) -> bool {
    evaluate(&condition(operator, Some(operand.into())), Some(&value)).is_met()
}

#[test]
fn equality_is_strictly_typed() {
    assert!(met(Operator::Equals, "1", json!("1")));
    assert!(!met(Operator::Equals, "1", json!(1)));
    assert!(met(Operator::Equals, 1, json!(1.0)));
    assert!(met(Operator::Equals, false, json!(false)));
    assert!(met(Operator::NotEquals, "1", json!(1)));
    assert!(!met(Operator::NotEquals, true, json!(true)));
}

#[test]
fn equality_with_list_operand_compares_elementwise() {
    assert!(met(Operator::Equals, vec!["a", "b"], json!(["a", "b"])));
    assert!(!met(Operator::Equals, vec!["a", "b"], json!(["b", "a"])));
    assert!(!met(Operator::Equals, vec!["a"], json!("a")));
}

#[test]
fn equality_against_missing_answer() {
    let with_operand = condition(Operator::Equals, Some(true.into()));
    assert_eq!(evaluate(&with_operand, None), Evaluation::NotMet);

    let not_equals = condition(Operator::NotEquals, Some(true.into()));
    assert_eq!(evaluate(&not_equals, None), Evaluation::Met);

    let without_operand = condition(Operator::Equals, None);
    assert_eq!(evaluate(&without_operand, None), Evaluation::Met);
}

#[test]
fn contains_handles_strings_and_arrays() {
    assert!(met(Operator::Contains, "act", json!("react")));
    assert!(met(Operator::Contains, "react", json!(["react", "vue"])));
    assert!(met(Operator::Contains, 3, json!([1, 2, 3])));
    assert!(!met(Operator::Contains, "svelte", json!(["react", "vue"])));
    assert!(met(Operator::NotContains, "svelte", json!(["react", "vue"])));
    assert!(!met(Operator::NotContains, "act", json!("react")));
}

#[test]
fn contains_defaults_for_unsupported_shapes() {
    assert!(!met(Operator::Contains, 1, json!("123")));
    assert!(met(Operator::NotContains, 1, json!("123")));
    assert!(!met(Operator::Contains, "a", json!({ "a": true })));
    assert!(met(Operator::NotContains, "a", json!(42)));

    let missing = condition(Operator::Contains, Some("a".into()));
    assert!(!evaluate(&missing, None).is_met());
    let missing = condition(Operator::NotContains, Some("a".into()));
    assert!(evaluate(&missing, None).is_met());
}

#[test]
fn ordering_requires_numbers_on_both_sides() {
    assert!(met(Operator::GreaterThan, 10, json!(11)));
    assert!(!met(Operator::GreaterThan, 10, json!(10)));
    assert!(met(Operator::GreaterThanOrEqual, 10, json!(10)));
    assert!(met(Operator::LessThan, 0.5, json!(0.25)));
    assert!(met(Operator::LessThanOrEqual, -1, json!(-1)));
    assert!(!met(Operator::LessThanOrEqual, -1, json!(0)));

    assert!(!met(Operator::GreaterThan, 10, json!("11")));
    assert!(!met(Operator::GreaterThan, "10", json!(11)));
    assert!(!met(Operator::LessThan, "b", json!("a")));

    let missing = condition(Operator::LessThan, Some(5.into()));
    assert!(!evaluate(&missing, None).is_met());
}

#[test]
fn membership_requires_list_operand() {
    assert!(met(Operator::In, vec!["red", "green"], json!("red")));
    assert!(!met(Operator::In, vec!["red", "green"], json!("blue")));
    assert!(met(Operator::NotIn, vec!["red", "green"], json!("blue")));
    assert!(!met(Operator::NotIn, vec!["red", "green"], json!("green")));
    assert!(met(Operator::In, vec![1, 2], json!(2)));

    // a scalar operand never satisfies either operator
    assert!(!met(Operator::In, "red", json!("red")));
    assert!(!met(Operator::NotIn, "red", json!("blue")));

    let missing = condition(Operator::In, Some(vec!["red"].into()));
    assert!(!evaluate(&missing, None).is_met());
    let missing = condition(Operator::NotIn, Some(vec!["red"].into()));
    assert!(evaluate(&missing, None).is_met());
}

#[test]
fn emptiness_checks() {
    let is_empty = condition(Operator::IsEmpty, None);
    let is_not_empty = condition(Operator::IsNotEmpty, None);

    for value in [json!(null), json!(""), json!("  \t"), json!([])] {
        assert!(evaluate(&is_empty, Some(&value)).is_met(), "{value}");
        assert!(!evaluate(&is_not_empty, Some(&value)).is_met(), "{value}");
    }
    assert!(evaluate(&is_empty, None).is_met());
    assert!(!evaluate(&is_not_empty, None).is_met());

    for value in [json!("x"), json!([0]), json!(0), json!(false), json!({ "other": "" })] {
        assert!(!evaluate(&is_empty, Some(&value)).is_met(), "{value}");
        assert!(evaluate(&is_not_empty, Some(&value)).is_met(), "{value}");
    }
}

#[test]
fn unknown_operator_is_unsupported() {
    let rule = condition(Operator::Unknown("matches-regex".into()), Some("^a".into()));
    let outcome = evaluate(&rule, Some(&json!("abc")));
    assert_eq!(outcome, Evaluation::Unsupported);
    assert!(!outcome.is_met());
}
