// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route table and handlers: thin wrappers over the runtime crates,
//! exactly the "CRUD on missions" surface §1 scopes the control plane
//! down to. No handler contains policy, retry, or locking logic — that
//! all lives in `mx-engine`.

use crate::error::ServerError;
use crate::projection::{self, MissionProjection};
use crate::state::AppState;
use crate::validate::{schema_value, validate_yaml};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use mx_core::{Clock, RunId};
use mx_mission::Mission;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

pub fn build_router<C: Clock + Send + Sync + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/missions", get(list_missions::<C>).post(create_mission::<C>))
        .route("/missions/archived", get(list_archived::<C>))
        .route("/missions/schema", get(mission_schema))
        .route("/missions/validate", post(validate_mission))
        .route("/missions/:id", get(get_mission::<C>).delete(delete_mission::<C>))
        .route("/missions/:id/activate", get(activate_mission::<C>))
        .route("/missions/:id/deactivate", get(deactivate_mission::<C>))
        .route("/missions/:id/versions", get(list_versions::<C>))
        .route("/missions/:id/versions/:version", get(get_version::<C>).put(set_version::<C>))
        .route("/missions/:id/runs", get(list_runs::<C>))
        .route("/missions/:id/runs/:run", get(get_run::<C>))
        .route("/healthz", get(healthz))
        .with_state(state)
}

#[derive(Deserialize)]
pub struct StateFilter {
    state: Option<String>,
}

fn active_filter(filter: &StateFilter) -> Option<bool> {
    match filter.state.as_deref() {
        Some("active") => Some(true),
        Some("inactive") => Some(false),
        _ => None,
    }
}

fn projections_by_name<C: Clock + 'static>(
    state: &AppState<C>,
    records: impl IntoIterator<Item = mx_store::MissionRecord>,
) -> Result<BTreeMap<String, MissionProjection>, ServerError> {
    records
        .into_iter()
        .map(|record| {
            let projection = projection::small(&state.store, &state.registry, &record)?;
            Ok((record.name, projection))
        })
        .collect()
}

async fn list_missions<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Query(filter): Query<StateFilter>,
) -> Result<impl IntoResponse, ServerError> {
    let records = state.store.list_missions(active_filter(&filter));
    Ok(Json(projections_by_name(&state, records)?))
}

async fn list_archived<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Result<impl IntoResponse, ServerError> {
    let records = state.store.list_archived();
    Ok(Json(projections_by_name(&state, records)?))
}

/// `POST /missions`: the request body is the raw mission YAML
/// document. Validated against the published schema, decoded, stored as
/// a script version, and made the mission's current version — but not
/// activated; activation is a separate call.
async fn create_mission<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    body: String,
) -> Result<impl IntoResponse, ServerError> {
    validate_yaml(&body)?;
    let tree: Mission = Mission::parse(&body)?;
    state.registry.upload_script(&tree.name, &tree.version, &body)?;
    state.registry.set_current_version(&tree.name, &tree.version)?;
    let record = state.store.mission(&tree.name)?;
    Ok(Json(projection::full(&state.store, &state.registry, &record)?))
}

async fn get_mission<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let record = state.store.mission(&id)?;
    Ok(Json(projection::full(&state.store, &state.registry, &record)?))
}

async fn delete_mission<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    state.registry.delete(&id)?;
    Ok(Json(json!({})))
}

async fn activate_mission<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    state.registry.activate(&id)?;
    let record = state.store.mission(&id)?;
    Ok(Json(projection::full(&state.store, &state.registry, &record)?))
}

async fn deactivate_mission<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    state.registry.deactivate(&id)?;
    let record = state.store.mission(&id)?;
    Ok(Json(projection::full(&state.store, &state.registry, &record)?))
}

#[derive(Serialize)]
struct Versions {
    versions: Vec<String>,
}

async fn list_versions<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    state.store.mission(&id)?;
    let versions = state.store.list_versions(&id).into_iter().map(|s| s.version).collect();
    Ok(Json(Versions { versions }))
}

#[derive(Serialize)]
struct VersionBody {
    version: String,
}

async fn get_version<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path((id, version)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    let script = state.store.script_by_version(&id, &version)?;
    Ok(Json(VersionBody { version: script.body }))
}

async fn set_version<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path((id, version)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    state.registry.set_current_version(&id, &version)?;
    let record = state.store.mission(&id)?;
    Ok(Json(projection::full(&state.store, &state.registry, &record)?))
}

#[derive(Serialize)]
struct Runs {
    runs: Vec<String>,
}

async fn list_runs<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    state.store.mission(&id)?;
    let runs = state.store.list_runs(&id).into_iter().map(|r| r.to_string()).collect();
    Ok(Json(Runs { runs }))
}

#[derive(Serialize)]
struct RunEvents {
    run: Vec<(u64, String, serde_json::Value)>,
}

async fn get_run<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path((_id, run)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    let run_id = RunId::from_string(run);
    let events = state
        .store
        .first_events(run_id, 10)?
        .into_iter()
        .map(|entry| (entry.timestamp_ms, entry.kind.to_string(), entry.payload))
        .collect();
    Ok(Json(RunEvents { run: events }))
}

async fn mission_schema() -> impl IntoResponse {
    Json(schema_value().clone())
}

async fn validate_mission(body: String) -> Result<impl IntoResponse, ServerError> {
    validate_yaml(&body)?;
    Mission::parse(&body)?;
    Ok(Json(json!({})))
}

async fn healthz() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
