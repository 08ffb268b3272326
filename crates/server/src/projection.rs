// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `small`/`full` mission projections served by the control plane.
//! `small` is built entirely from durable store state plus the live
//! registry's in-memory fields (§5: written only by the single task
//! running that mission, read-only for everyone else); `full` adds the
//! most recent run's first events and the current script text, which
//! cost an extra store read each.

use crate::error::ServerError;
use chrono::{DateTime, Utc};
use mx_core::Clock;
use mx_engine::{MissionState, Registry};
use mx_mission::{Mission, Schedule};
use mx_store::{MissionRecord, Store};
use serde::Serialize;
use serde_json::Value;

/// The first ≤10 events of a run, as the `(timestamp_ms, kind, payload)`
/// triples §6 specifies.
pub type EventTriple = (u64, String, Value);

#[derive(Debug, Clone, Serialize)]
pub struct MissionProjection {
    pub id: String,
    pub name: String,
    pub version: String,
    pub desc: String,
    pub active: bool,
    pub running: bool,
    pub current_step: Option<String>,
    pub run_count: usize,
    pub schedule: Option<Schedule>,
    pub next_run: Option<DateTime<Utc>>,
    pub created: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventTriple>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

/// Parse the mission's currently-selected script, if it has one. A
/// mission can exist with no current script (uploaded but never made
/// current, or soft-deleted), in which case the header fields fall back
/// to empty/absent rather than failing the whole projection.
fn current_tree(store: &Store<impl Clock>, record: &MissionRecord) -> Result<Option<Mission>, ServerError> {
    match record.script_id {
        Some(id) => Ok(Some(Mission::parse(&store.script_body(id)?)?)),
        None => Ok(None),
    }
}

/// The `small` projection: everything in the control-plane contract
/// except the most recent run's events and script text.
pub fn small<C: Clock + 'static>(
    store: &Store<C>,
    registry: &Registry<C>,
    record: &MissionRecord,
) -> Result<MissionProjection, ServerError> {
    let tree = current_tree(store, record)?;
    Ok(MissionProjection {
        id: record.name.clone(),
        name: record.name.clone(),
        version: tree.as_ref().map(|t| t.version.clone()).unwrap_or_default(),
        desc: tree.as_ref().map(|t| t.desc.clone()).unwrap_or_default(),
        active: record.active,
        running: registry.state(&record.name) == MissionState::Running,
        current_step: registry.current_step(&record.name),
        run_count: store.list_runs(&record.name).len(),
        schedule: tree.as_ref().and_then(|t| t.schedule.clone()),
        next_run: registry.next_fire(&record.name),
        created: record.created_ms,
        events: None,
        script: None,
    })
}

/// The `full` projection: `small` plus the most recent run's first ≤10
/// events and the current script's raw text.
pub fn full<C: Clock + 'static>(
    store: &Store<C>,
    registry: &Registry<C>,
    record: &MissionRecord,
) -> Result<MissionProjection, ServerError> {
    let mut projection = small(store, registry, record)?;
    let events = match store.most_recent_run(&record.name) {
        Some(run_id) => store
            .first_events(run_id, 10)?
            .into_iter()
            .map(|entry| (entry.timestamp_ms, entry.kind.to_string(), entry.payload))
            .collect(),
        None => Vec::new(),
    };
    projection.events = Some(events);
    projection.script = match record.script_id {
        Some(id) => Some(store.script_body(id)?),
        None => None,
    };
    Ok(projection)
}
