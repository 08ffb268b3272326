// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::fake::FakeInstrumentExecutor;
use mx_mission::StepCommon;
use serde_json::Map;

#[tokio::test]
async fn get_state_routes_to_get_state_verb() {
    let fake = FakeInstrumentExecutor::new();
    fake.script_response(
        "i1",
        "get_state",
        Ok(InstrumentResponse { value: Some(serde_json::json!("STREAMING")), ..Default::default() }),
    );
    let step = Step::GetState { target: "i1".into(), common: StepCommon::default() };
    let result = dispatch(&fake, "m", &step).await.expect("dispatch ok").expect("some response");
    assert_eq!(result.value, Some(serde_json::json!("STREAMING")));
}

#[tokio::test]
async fn sleep_and_block_never_reach_the_executor() {
    let fake = FakeInstrumentExecutor::new();
    let sleep = Step::Sleep { seconds: 0.01, common: StepCommon::default() };
    let block = Step::Block { label: "capture".into(), common: StepCommon::default() };
    assert!(dispatch(&fake, "m", &sleep).await.expect("ok").is_none());
    assert!(dispatch(&fake, "m", &block).await.expect("ok").is_none());
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn execute_carries_command_and_kwargs() {
    let fake = FakeInstrumentExecutor::new();
    let mut kwargs = Map::new();
    kwargs.insert("speed".into(), serde_json::json!(5));
    let step = Step::Execute { target: "i1".into(), command: "START".into(), kwargs, common: StepCommon::default() };
    dispatch(&fake, "m", &step).await.expect("ok");
    assert_eq!(fake.calls(), vec!["i1:execute".to_string()]);
}

#[tokio::test]
async fn empty_target_is_a_command_argument_error() {
    let fake = FakeInstrumentExecutor::new();
    let step = Step::GetState { target: "  ".into(), common: StepCommon::default() };
    let err = dispatch(&fake, "m", &step).await.unwrap_err();
    assert!(matches!(err, ExecutorError::CommandArgument { .. }));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn negative_timeout_is_a_command_argument_error() {
    let fake = FakeInstrumentExecutor::new();
    let common = StepCommon { timeout: Some(-1.0), ..Default::default() };
    let step = Step::Ping { target: "i1".into(), common };
    let err = dispatch(&fake, "m", &step).await.unwrap_err();
    assert!(matches!(err, ExecutorError::CommandArgument { .. }));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn empty_execute_command_is_a_command_argument_error() {
    let fake = FakeInstrumentExecutor::new();
    let step = Step::Execute { target: "i1".into(), command: "".into(), kwargs: Map::new(), common: StepCommon::default() };
    let err = dispatch(&fake, "m", &step).await.unwrap_err();
    assert!(matches!(err, ExecutorError::CommandArgument { .. }));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn empty_get_parameter_is_a_command_argument_error() {
    let fake = FakeInstrumentExecutor::new();
    let step = Step::Get { target: "i1".into(), parameter: "".into(), common: StepCommon::default() };
    let err = dispatch(&fake, "m", &step).await.unwrap_err();
    assert!(matches!(err, ExecutorError::CommandArgument { .. }));
    assert!(fake.calls().is_empty());
}
