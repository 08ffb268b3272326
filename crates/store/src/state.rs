// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized view built by replaying [`mx_core::Event`] facts.
//!
//! Every `apply` is idempotent: a fact may be applied once for
//! immediate visibility and again during WAL replay at startup, and
//! both paths must land on the same state.

use mx_core::{Event, EventKind, RunId, ScriptId};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MissionRecord {
    pub name: String,
    pub script_id: Option<ScriptId>,
    pub active: bool,
    pub archived: bool,
    pub created_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRecord {
    pub id: ScriptId,
    pub mission: String,
    pub version: String,
    pub body: String,
    pub created_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventLogEntry {
    pub timestamp_ms: u64,
    pub kind: EventKind,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub id: RunId,
    pub mission: String,
    pub script_id: ScriptId,
    pub started_ms: u64,
    pub events: Vec<EventLogEntry>,
}

#[derive(Debug, Default)]
pub struct MaterializedState {
    pub missions: HashMap<String, MissionRecord>,
    pub scripts: HashMap<ScriptId, ScriptRecord>,
    /// (mission, version) -> script id, for the script-body immutability check.
    pub script_index: HashMap<(String, String), ScriptId>,
    pub runs: HashMap<RunId, RunRecord>,
    /// Ordered run ids per mission, oldest first.
    pub runs_by_mission: HashMap<String, Vec<RunId>>,
    /// The fixed event-type dictionary, expanded on first use.
    pub event_types: std::collections::HashSet<String>,
}

impl MaterializedState {
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::MissionCreated { name, created_ms } => {
                self.missions.entry(name.clone()).or_insert_with(|| MissionRecord {
                    name: name.clone(),
                    script_id: None,
                    active: false,
                    archived: false,
                    created_ms: *created_ms,
                });
            }
            Event::ScriptAdded { id, mission, version, body, created_ms } => {
                let key = (mission.clone(), version.clone());
                if !self.script_index.contains_key(&key) {
                    self.script_index.insert(key, *id);
                    self.scripts.insert(
                        *id,
                        ScriptRecord {
                            id: *id,
                            mission: mission.clone(),
                            version: version.clone(),
                            body: body.clone(),
                            created_ms: *created_ms,
                        },
                    );
                }
            }
            Event::CurrentScriptSet { mission, script_id } => {
                if let Some(record) = self.missions.get_mut(mission) {
                    record.script_id = Some(*script_id);
                }
            }
            Event::CurrentScriptCleared { mission } => {
                if let Some(record) = self.missions.get_mut(mission) {
                    record.script_id = None;
                }
            }
            Event::MissionActivated { mission } => {
                if let Some(record) = self.missions.get_mut(mission) {
                    record.active = true;
                }
            }
            Event::MissionDeactivated { mission } => {
                if let Some(record) = self.missions.get_mut(mission) {
                    record.active = false;
                }
            }
            Event::MissionArchived { mission } => {
                if let Some(record) = self.missions.get_mut(mission) {
                    record.archived = true;
                    record.active = false;
                }
            }
            Event::RunCreated { id, mission, script_id, started_ms } => {
                self.runs.entry(*id).or_insert_with(|| RunRecord {
                    id: *id,
                    mission: mission.clone(),
                    script_id: *script_id,
                    started_ms: *started_ms,
                    events: Vec::new(),
                });
                let runs = self.runs_by_mission.entry(mission.clone()).or_default();
                if !runs.contains(id) {
                    runs.push(*id);
                }
            }
            Event::RunLogged { run_id, kind, payload, timestamp_ms } => {
                if let Some(run) = self.runs.get_mut(run_id) {
                    run.events.push(EventLogEntry {
                        timestamp_ms: *timestamp_ms,
                        kind: kind.clone(),
                        payload: payload.clone(),
                    });
                }
                self.event_types.insert(kind.to_string());
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
