// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    abort = {"{\"type\":\"abort\"}", PolicyAction::Abort, 1, 0},
    break_ = {"{\"type\":\"break\"}", PolicyAction::Break, 1, 0},
    continue_ = {"{\"type\":\"continue\"}", PolicyAction::Continue, 1, 0},
    ignore = {"{\"type\":\"ignore\"}", PolicyAction::Ignore, 1, 0},
    retry_defaults = {"{\"type\":\"retry\"}", PolicyAction::Retry, 3, 10},
    retry_explicit = {"{\"type\":\"retry\",\"count\":5,\"backoff\":2}", PolicyAction::Retry, 5, 2},
)]
fn decodes_policy_fragment(json: &str, action: PolicyAction, count: u32, backoff: u64) {
    let policy: ErrorPolicy = serde_json::from_str(json).expect("valid policy fragment");
    assert_eq!(policy.action, action);
    assert_eq!(policy.count, count);
    assert_eq!(policy.backoff, backoff);
}

#[test]
fn resolve_prefers_step_over_block_over_mission_over_default() {
    let step = ErrorPolicy::new(PolicyAction::Abort, None, None);
    let block = ErrorPolicy::new(PolicyAction::Retry, Some(3), None);
    let mission = ErrorPolicy::new(PolicyAction::Retry, Some(5), None);

    assert_eq!(ErrorPolicy::resolve(Some(step), Some(block), Some(mission)).action, PolicyAction::Abort);
    assert_eq!(ErrorPolicy::resolve(None, Some(block), Some(mission)).action, PolicyAction::Retry);
    assert_eq!(ErrorPolicy::resolve(None, None, Some(mission)).count, 5);
    assert_eq!(ErrorPolicy::resolve(None, None, None), ErrorPolicy::DEFAULT);
}

#[test]
fn round_trips_through_serde() {
    let policy = ErrorPolicy::new(PolicyAction::Retry, Some(7), Some(11));
    let encoded = serde_json::to_string(&policy).expect("serialize");
    let decoded: ErrorPolicy = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(policy, decoded);
}

#[test]
fn rejects_unknown_action() {
    let err = serde_json::from_str::<ErrorPolicy>("{\"type\":\"retry_forever\"}");
    assert!(err.is_err());
}
