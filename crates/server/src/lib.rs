// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mx-server: the HTTP control plane over the mission runtime — CRUD on
//! missions, the generated/validated YAML schema, and the background
//! tasks (scheduler tick, event-trigger consumption) that drive the
//! registry without an inbound request.

pub mod config;
pub mod error;
pub mod projection;
pub mod routes;
pub mod state;
pub mod validate;

pub use config::Config;
pub use error::ServerError;
pub use projection::MissionProjection;
pub use routes::build_router;
pub use state::AppState;

use mx_core::Clock;
use mx_engine::Registry;
use std::sync::Arc;
use std::time::Duration;

/// How often the background task asks the registry what's due. The
/// registry's own `poll` is a pure function of "now", so this interval
/// only bounds fire latency, not correctness.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Drive the registry's scheduler on a fixed interval until the process
/// shuts down. Meant to be spawned once per server instance.
pub async fn run_tick_loop<C: Clock + Send + Sync + 'static>(registry: Arc<Registry<C>>) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        registry.tick();
    }
}
