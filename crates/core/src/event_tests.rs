// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn wire_tag_for_script_added_is_kebab_style() {
    let event = Event::ScriptAdded {
        id: ScriptId::new(),
        mission: "recover-glider".into(),
        version: "1".into(),
        body: "name: recover-glider".into(),
        created_ms: 1,
    };
    let json = serde_json::to_value(&event).expect("serialize");
    assert_eq!(json["type"], "mission:script-added");
    assert_eq!(event.name(), "mission:script-added");
}

#[test]
fn custom_event_kind_round_trips_its_label() {
    let kind = EventKind::Custom("driver_status".into());
    let json = serde_json::to_string(&kind).expect("serialize");
    let decoded: EventKind = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, kind);
    assert_eq!(kind.to_string(), "driver_status");
}

#[test]
fn fixed_dictionary_kinds_display_lowercase() {
    assert_eq!(EventKind::Start.to_string(), "start");
    assert_eq!(EventKind::Completion.to_string(), "completion");
}

#[test]
fn mission_accessor_covers_every_mission_scoped_variant() {
    let run_id = RunId::new();
    let mission_events = vec![
        Event::MissionCreated { name: "m".into(), created_ms: 0 },
        Event::CurrentScriptSet { mission: "m".into(), script_id: ScriptId::new() },
        Event::MissionActivated { mission: "m".into() },
        Event::MissionDeactivated { mission: "m".into() },
        Event::MissionArchived { mission: "m".into() },
        Event::RunCreated { id: run_id, mission: "m".into(), script_id: ScriptId::new(), started_ms: 0 },
    ];
    for event in mission_events {
        assert_eq!(event.mission(), Some("m"));
    }
    let run_logged = Event::RunLogged {
        run_id,
        kind: EventKind::Start,
        payload: serde_json::Value::Null,
        timestamp_ms: 0,
    };
    assert_eq!(run_logged.mission(), None);
}
