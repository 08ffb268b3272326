// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mx_core::ScriptId;
use serde_json::json;

#[test]
fn mission_created_is_idempotent_on_replay() {
    let mut state = MaterializedState::default();
    let event = Event::MissionCreated { name: "ctd".into(), created_ms: 5 };
    state.apply(&event);
    state.apply(&event);
    assert_eq!(state.missions.len(), 1);
    assert_eq!(state.missions["ctd"].created_ms, 5);
}

#[test]
fn script_added_first_write_wins_on_replay() {
    let mut state = MaterializedState::default();
    let id = ScriptId::new();
    state.apply(&Event::ScriptAdded {
        id,
        mission: "ctd".into(),
        version: "1".into(),
        body: "first".into(),
        created_ms: 1,
    });
    let other_id = ScriptId::new();
    state.apply(&Event::ScriptAdded {
        id: other_id,
        mission: "ctd".into(),
        version: "1".into(),
        body: "first".into(),
        created_ms: 2,
    });
    assert_eq!(state.scripts.len(), 1);
    assert_eq!(state.script_index[&("ctd".to_string(), "1".to_string())], id);
}

#[test]
fn archiving_clears_active_flag() {
    let mut state = MaterializedState::default();
    state.apply(&Event::MissionCreated { name: "ctd".into(), created_ms: 1 });
    state.apply(&Event::MissionActivated { mission: "ctd".into() });
    state.apply(&Event::MissionArchived { mission: "ctd".into() });
    let record = &state.missions["ctd"];
    assert!(record.archived);
    assert!(!record.active);
}

#[test]
fn run_created_registers_mission_index() {
    let mut state = MaterializedState::default();
    let run_id = mx_core::RunId::new();
    let script_id = ScriptId::new();
    state.apply(&Event::RunCreated { id: run_id, mission: "ctd".into(), script_id, started_ms: 1 });
    assert_eq!(state.runs_by_mission["ctd"], vec![run_id]);
}

#[test]
fn run_logged_appends_to_the_run_and_expands_event_type_dictionary() {
    let mut state = MaterializedState::default();
    let run_id = mx_core::RunId::new();
    let script_id = ScriptId::new();
    state.apply(&Event::RunCreated { id: run_id, mission: "ctd".into(), script_id, started_ms: 1 });
    state.apply(&Event::RunLogged {
        run_id,
        kind: EventKind::Custom("discover".into()),
        payload: json!("i1"),
        timestamp_ms: 2,
    });
    assert_eq!(state.runs[&run_id].events.len(), 1);
    assert!(state.event_types.contains("discover"));
}
