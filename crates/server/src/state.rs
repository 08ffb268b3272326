// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The explicit server value every request handler is given via axum's
//! `State` extractor, replacing the process-wide globals the source
//! kept (§9): the registry, the durable store, and nothing else — the
//! scheduler and event router live inside the registry already.

use mx_core::{Clock, SystemClock};
use mx_engine::Registry;
use mx_store::Store;
use std::sync::Arc;

pub struct AppState<C: Clock = SystemClock> {
    pub registry: Arc<Registry<C>>,
    pub store: Arc<Store<C>>,
}

impl<C: Clock> AppState<C> {
    pub fn new(registry: Arc<Registry<C>>, store: Arc<Store<C>>) -> Self {
        Self { registry, store }
    }
}
