// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mx_core::{EventKind, FakeClock};
use serde_json::json;

fn store() -> (tempfile::TempDir, Store<FakeClock>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Store::open_with_clock(dir.path().join("wal.log"), FakeClock::new()).expect("open");
    (dir, store)
}

#[test]
fn script_immutability_same_body_is_idempotent() {
    let (_dir, store) = store();
    let id1 = store.add_script("ctd-cast", "1", "body-a").expect("first upload");
    let id2 = store.add_script("ctd-cast", "1", "body-a").expect("re-upload same body");
    assert_eq!(id1, id2);
}

#[test]
fn script_immutability_different_body_is_rejected() {
    let (_dir, store) = store();
    store.add_script("ctd-cast", "1", "body-a").expect("first upload");
    let err = store.add_script("ctd-cast", "1", "body-b").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateScript { .. }));
}

#[test]
fn set_current_script_requires_known_id() {
    let (_dir, store) = store();
    store.create_or_get_mission("ctd-cast").expect("create");
    let err = store.set_current_script("ctd-cast", mx_core::ScriptId::new()).unwrap_err();
    assert!(matches!(err, StoreError::ScriptNotFound(_)));
}

#[test]
fn delete_archives_and_hides_from_default_listing() {
    let (_dir, store) = store();
    let id = store.add_script("ctd-cast", "1", "body").expect("upload");
    store.set_current_script("ctd-cast", id).expect("set");
    store.delete_mission("ctd-cast").expect("delete");

    assert!(store.list_missions(None).is_empty());
    let archived = store.list_archived();
    assert_eq!(archived.len(), 1);
    assert!(archived[0].script_id.is_none());
}

#[test]
fn activate_and_deactivate_flip_the_flag() {
    let (_dir, store) = store();
    store.create_or_get_mission("ctd-cast").expect("create");
    store.activate("ctd-cast").expect("activate");
    assert!(store.mission("ctd-cast").expect("lookup").active);
    store.deactivate("ctd-cast").expect("deactivate");
    assert!(!store.mission("ctd-cast").expect("lookup").active);
}

#[test]
fn run_event_log_grows_append_only_in_order() {
    let (_dir, store) = store();
    let script_id = store.add_script("ctd-cast", "1", "body").expect("upload");
    let run_id = store.create_run("ctd-cast", script_id).expect("create run");
    store.append_event(run_id, EventKind::Start, json!(null)).expect("start");
    store.append_event(run_id, EventKind::Step, json!({"sleep": 0.01})).expect("step");
    store.append_event(run_id, EventKind::Completion, json!(null)).expect("completion");

    let events = store.first_events(run_id, 10).expect("events");
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].kind, EventKind::Start);
    assert_eq!(events[2].kind, EventKind::Completion);
}

#[test]
fn first_events_truncates_to_n() {
    let (_dir, store) = store();
    let script_id = store.add_script("ctd-cast", "1", "body").expect("upload");
    let run_id = store.create_run("ctd-cast", script_id).expect("create run");
    for _ in 0..15 {
        store.append_event(run_id, EventKind::Step, json!(null)).expect("step");
    }
    assert_eq!(store.first_events(run_id, 10).expect("events").len(), 10);
}

#[test]
fn reopening_the_store_replays_prior_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("wal.log");
    let script_id;
    {
        let store = Store::open_with_clock(&path, FakeClock::new()).expect("open");
        script_id = store.add_script("ctd-cast", "1", "body").expect("upload");
        store.activate("ctd-cast").expect("activate");
    }
    let reopened = Store::open_with_clock(&path, FakeClock::new()).expect("reopen");
    let record = reopened.mission("ctd-cast").expect("lookup");
    assert!(record.active);
    assert_eq!(record.script_id, None);
    assert_eq!(reopened.script_body(script_id).expect("body"), "body");
}

#[test]
fn list_versions_orders_oldest_first() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::new();
    let store = Store::open_with_clock(dir.path().join("wal.log"), clock.clone()).expect("open");
    store.add_script("ctd-cast", "1", "a").expect("v1");
    clock.advance(std::time::Duration::from_secs(1));
    store.add_script("ctd-cast", "2", "b").expect("v2");
    let versions = store.list_versions("ctd-cast");
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].version, "1");
    assert_eq!(versions[1].version, "2");
}
