// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory fake for interpreter/engine tests. Scripted per-target
//! responses and a scriptable lock table, so tests can pin down
//! end-to-end scenarios without a real instrument-control service.

use crate::client::InstrumentExecutor;
use crate::error::ExecutorError;
use crate::response::InstrumentResponse;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

#[derive(Default)]
struct Inner {
    /// Queued responses per (target, verb); popped front-first.
    responses: HashMap<(String, String), VecDeque<Result<InstrumentResponse, ExecutorError>>>,
    /// Queued lock-acquisition outcomes, popped front-first; `Ok(())`
    /// unless explicitly scripted otherwise.
    lock_outcomes: VecDeque<Result<(), ExecutorError>>,
    /// Which mission currently holds each instrument's lock.
    lock_holders: HashMap<String, String>,
    calls: Vec<String>,
}

pub struct FakeInstrumentExecutor {
    inner: Mutex<Inner>,
}

impl Default for FakeInstrumentExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeInstrumentExecutor {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()) }
    }

    pub fn script_response(&self, target: &str, verb: &str, response: Result<InstrumentResponse, ExecutorError>) {
        self.inner
            .lock()
            .responses
            .entry((target.to_string(), verb.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn script_lock_outcome(&self, outcome: Result<(), ExecutorError>) {
        self.inner.lock().lock_outcomes.push_back(outcome);
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().calls.clone()
    }

    fn take(&self, target: &str, verb: &str) -> Result<InstrumentResponse, ExecutorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(format!("{target}:{verb}"));
        inner
            .responses
            .get_mut(&(target.to_string(), verb.to_string()))
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| Ok(InstrumentResponse::default()))
    }
}

#[async_trait]
impl InstrumentExecutor for FakeInstrumentExecutor {
    async fn execute(
        &self,
        _mission: &str,
        target: &str,
        _command: &str,
        _kwargs: &Map<String, Value>,
        _timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError> {
        self.take(target, "execute")
    }

    async fn get(&self, _mission: &str, target: &str, _parameter: &str, _timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.take(target, "get")
    }

    async fn set(
        &self,
        _mission: &str,
        target: &str,
        _parameter: &str,
        _value: &Value,
        _timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError> {
        self.take(target, "set")
    }

    async fn get_state(&self, _mission: &str, target: &str, _timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.take(target, "get_state")
    }

    async fn discover(&self, _mission: &str, target: &str, _timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.take(target, "discover")
    }

    async fn reset(&self, _mission: &str, target: &str, _timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.take(target, "reset")
    }

    async fn ping(&self, _mission: &str, target: &str, _timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.take(target, "ping")
    }

    async fn connect(&self, _mission: &str, target: &str, _timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.take(target, "connect")
    }

    async fn disconnect(&self, _mission: &str, target: &str, _timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.take(target, "disconnect")
    }

    async fn set_init_params(
        &self,
        _mission: &str,
        target: &str,
        _config: &Map<String, Value>,
        _timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError> {
        self.take(target, "set_init_params")
    }

    async fn configure(
        &self,
        _mission: &str,
        target: &str,
        _config: &Map<String, Value>,
        _timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError> {
        self.take(target, "configure")
    }

    async fn lock(&self, mission: &str, instruments: &[String], _timeout: Duration) -> Result<(), ExecutorError> {
        let outcome = {
            let mut inner = self.inner.lock();
            inner.calls.push(format!("lock:{}", instruments.join(",")));
            inner.lock_outcomes.pop_front().unwrap_or(Ok(()))
        };
        outcome?;
        let mut inner = self.inner.lock();
        for instrument in instruments {
            inner.lock_holders.insert(instrument.clone(), mission.to_string());
        }
        Ok(())
    }

    async fn unlock(&self, mission: &str, instruments: &[String], _timeout: Duration) -> Result<(), ExecutorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(format!("unlock:{}", instruments.join(",")));
        for instrument in instruments {
            if inner.lock_holders.get(instrument).map(String::as_str) == Some(mission) {
                inner.lock_holders.remove(instrument);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
