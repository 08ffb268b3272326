// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn vars(pairs: &[(&str, serde_json::Value)]) -> HashMap<String, serde_json::Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn equal_matches_when_variable_present_and_equal() {
    let cond = Condition { variable: "driver_state".into(), value: json!("STREAMING"), comparator: Comparator::Equal };
    assert!(cond.eval(&vars(&[("driver_state", json!("STREAMING"))])));
    assert!(!cond.eval(&vars(&[("driver_state", json!("COMMAND"))])));
}

#[test]
fn missing_variable_is_always_not_equal() {
    let equal = Condition { variable: "x".into(), value: json!("v"), comparator: Comparator::Equal };
    let not_equal = Condition { variable: "x".into(), value: json!("v"), comparator: Comparator::NotEqual };
    assert!(!equal.eval(&HashMap::new()));
    assert!(not_equal.eval(&HashMap::new()));
}

#[test]
fn not_equal_matches_when_variable_differs() {
    let cond = Condition { variable: "x".into(), value: json!(1), comparator: Comparator::NotEqual };
    assert!(cond.eval(&vars(&[("x", json!(2))])));
    assert!(!cond.eval(&vars(&[("x", json!(1))])));
}

#[test]
fn comparator_defaults_to_equal_when_absent() {
    let decoded: Condition = serde_json::from_str(r#"{"variable":"x","value":"v"}"#).expect("decode");
    assert_eq!(decoded.comparator, Comparator::Equal);
}
