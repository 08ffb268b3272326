// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process entry point: load configuration, open the durable store,
//! wire the runtime (executor, scheduler, event router, registry), and
//! serve the control plane.

use mx_engine::{Registry, Router as TriggerRouter, Scheduler, DEFAULT_CONCURRENCY};
use mx_executor::HttpInstrumentExecutor;
use mx_server::{build_router, run_tick_loop, AppState, Config};
use mx_store::Store;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    init_tracing(&config.log_level);

    if config.oms_server.is_some() {
        tracing::info!(oms_server = ?config.oms_server, "OMS_SERVER configured; no broker client is wired up by this process yet");
    }

    let store = Arc::new(Store::open(&config.database_uri)?);
    let executor = Arc::new(HttpInstrumentExecutor::new(&config.ia_host, config.ia_port));
    let scheduler = Arc::new(Scheduler::new(DEFAULT_CONCURRENCY));
    let trigger_router = Arc::new(TriggerRouter::new());
    let registry = Arc::new(Registry::new(store.clone(), executor, scheduler, trigger_router));

    tokio::spawn(run_tick_loop(registry.clone()));

    let state = Arc::new(AppState::new(registry, store));
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.exec_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "mission control plane listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
