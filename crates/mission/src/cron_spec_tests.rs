// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn star_matches_any_value() {
    assert!(CronField::Text("*".into()).matches(0));
    assert!(CronField::Text("*".into()).matches(59));
}

#[test]
fn step_expression_matches_multiples() {
    let field = CronField::Text("*/15".into());
    assert!(field.matches(0));
    assert!(field.matches(30));
    assert!(!field.matches(10));
}

#[test]
fn range_expression_matches_inclusive_bounds() {
    let field = CronField::Text("9-17".into());
    assert!(field.matches(9));
    assert!(field.matches(17));
    assert!(!field.matches(8));
}

#[test]
fn list_expression_matches_any_member() {
    let field = CronField::Text("1,3,5".into());
    assert!(field.matches(3));
    assert!(!field.matches(4));
}

#[test]
fn literal_number_matches_only_itself() {
    assert!(CronField::Number(5).matches(5));
    assert!(!CronField::Number(5).matches(6));
}

#[test]
fn decodes_minute_star_spec() {
    let spec: CronSpec = serde_yaml::from_str("minute: \"*\"").expect("decode");
    assert_eq!(spec.minute, Some(CronField::Text("*".into())));
}
