// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed facade over the remote instrument-control HTTP API:
//! `http://{host}:{port}/instrument/api/{target}/{verb}`.

use crate::error::ExecutorError;
use crate::response::{interpret_body, InstrumentResponse};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;

/// Every outbound verb the instrument-control API exposes. Implemented
/// once against `reqwest` (`HttpInstrumentExecutor`) and once as an
/// in-memory fake for tests (`FakeInstrumentExecutor`, feature
/// `test-support`).
#[async_trait]
pub trait InstrumentExecutor: Send + Sync {
    async fn execute(
        &self,
        mission: &str,
        target: &str,
        command: &str,
        kwargs: &Map<String, Value>,
        timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError>;

    async fn get(
        &self,
        mission: &str,
        target: &str,
        parameter: &str,
        timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError>;

    async fn set(
        &self,
        mission: &str,
        target: &str,
        parameter: &str,
        value: &Value,
        timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError>;

    async fn get_state(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError>;

    async fn discover(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError>;

    /// A timeout here is normal (the driver has already shut down) and
    /// must not raise.
    async fn reset(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError>;

    async fn ping(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError>;

    async fn connect(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError>;

    async fn disconnect(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError>;

    async fn set_init_params(
        &self,
        mission: &str,
        target: &str,
        config: &Map<String, Value>,
        timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError>;

    async fn configure(
        &self,
        mission: &str,
        target: &str,
        config: &Map<String, Value>,
        timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError>;

    /// Acquire the lock for every instrument in `instruments` under
    /// `mission`'s identity. HTTP 409 on any instrument ⇒ `Lock` failure.
    async fn lock(&self, mission: &str, instruments: &[String], timeout: Duration) -> Result<(), ExecutorError>;

    /// Release courteously: only unlock instruments this mission still
    /// holds.
    async fn unlock(&self, mission: &str, instruments: &[String], timeout: Duration) -> Result<(), ExecutorError>;
}

/// `reqwest`-backed implementation talking to `http://{host}:{port}`.
pub struct HttpInstrumentExecutor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInstrumentExecutor {
    pub fn new(host: &str, port: u16) -> Self {
        Self { client: reqwest::Client::new(), base_url: format!("http://{host}:{port}") }
    }

    fn url(&self, target: &str, verb: &str) -> String {
        format!("{}/instrument/api/{}/{}", self.base_url, target, verb)
    }

    async fn post(
        &self,
        target: &str,
        verb: &str,
        mission: &str,
        timeout: Duration,
        extra: Map<String, Value>,
    ) -> Result<(String, reqwest::StatusCode), ExecutorError> {
        let mut form = extra;
        form.insert("timeout".to_string(), Value::from(timeout.as_secs_f64()));
        form.insert("key".to_string(), Value::from(mission));
        let response = self
            .client
            .post(self.url(target, verb))
            .timeout(timeout)
            .json(&form)
            .send()
            .await
            .map_err(|e| transport_error(target, &e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(target, &e))?;
        Ok((body, status))
    }

    async fn get_verb(
        &self,
        target: &str,
        verb: &str,
        mission: &str,
        timeout: Duration,
        extra: &[(&str, String)],
    ) -> Result<String, ExecutorError> {
        let mut query: Vec<(&str, String)> = vec![("timeout", timeout.as_secs_f64().to_string()), ("key", mission.to_string())];
        query.extend(extra.iter().cloned());
        let response = self
            .client
            .get(self.url(target, verb))
            .timeout(timeout)
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error(target, &e))?;
        response.text().await.map_err(|e| transport_error(target, &e))
    }

    async fn call(
        &self,
        target: &str,
        verb: &str,
        mission: &str,
        timeout: Duration,
        extra: Map<String, Value>,
        timeout_ok: bool,
    ) -> Result<InstrumentResponse, ExecutorError> {
        let (body, _status) = self.post(target, verb, mission, timeout, extra).await?;
        interpret_body(target, &body, timeout_ok)
    }
}

fn transport_error(target: &str, err: &reqwest::Error) -> ExecutorError {
    ExecutorError::Connection { target: target.to_string(), message: err.to_string() }
}

#[async_trait]
impl InstrumentExecutor for HttpInstrumentExecutor {
    async fn execute(
        &self,
        mission: &str,
        target: &str,
        command: &str,
        kwargs: &Map<String, Value>,
        timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError> {
        let mut extra = Map::new();
        extra.insert("command".to_string(), Value::from(command));
        extra.insert("kwargs".to_string(), Value::Object(kwargs.clone()));
        self.call(target, "execute", mission, timeout, extra, false).await
    }

    async fn get(&self, mission: &str, target: &str, parameter: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        let body = self
            .get_verb(target, "resource", mission, timeout, &[("resource", parameter.to_string())])
            .await?;
        interpret_body(target, &body, false)
    }

    async fn set(
        &self,
        mission: &str,
        target: &str,
        parameter: &str,
        value: &Value,
        timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError> {
        let mut extra = Map::new();
        extra.insert("resource".to_string(), Value::from(parameter));
        extra.insert("value".to_string(), value.clone());
        self.call(target, "resource", mission, timeout, extra, false).await
    }

    async fn get_state(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        let body = self.get_verb(target, "state", mission, timeout, &[]).await?;
        interpret_body(target, &body, false)
    }

    async fn discover(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.call(target, "discover", mission, timeout, Map::new(), false).await
    }

    async fn reset(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.call(target, "shutdown", mission, timeout, Map::new(), true).await
    }

    async fn ping(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.call(target, "ping", mission, timeout, Map::new(), false).await
    }

    async fn connect(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.call(target, "connect", mission, timeout, Map::new(), false).await
    }

    async fn disconnect(&self, mission: &str, target: &str, timeout: Duration) -> Result<InstrumentResponse, ExecutorError> {
        self.call(target, "disconnect", mission, timeout, Map::new(), false).await
    }

    async fn set_init_params(
        &self,
        mission: &str,
        target: &str,
        config: &Map<String, Value>,
        timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError> {
        let mut extra = Map::new();
        extra.insert("config".to_string(), Value::Object(config.clone()));
        self.call(target, "initparams", mission, timeout, extra, false).await
    }

    async fn configure(
        &self,
        mission: &str,
        target: &str,
        config: &Map<String, Value>,
        timeout: Duration,
    ) -> Result<InstrumentResponse, ExecutorError> {
        let mut extra = Map::new();
        extra.insert("config".to_string(), Value::Object(config.clone()));
        self.call(target, "configure", mission, timeout, extra, false).await
    }

    async fn lock(&self, mission: &str, instruments: &[String], timeout: Duration) -> Result<(), ExecutorError> {
        for instrument in instruments {
            let (_, status) = self.post(instrument, "lock", mission, timeout, Map::new()).await?;
            if status == reqwest::StatusCode::CONFLICT {
                return Err(ExecutorError::Lock { mission: mission.to_string(), instruments: instruments.to_vec() });
            }
        }
        Ok(())
    }

    async fn unlock(&self, mission: &str, instruments: &[String], timeout: Duration) -> Result<(), ExecutorError> {
        for instrument in instruments {
            let holder = self.get_verb(instrument, "lock", mission, timeout, &[]).await?;
            if holder.trim().trim_matches('"') == mission {
                self.post(instrument, "unlock", mission, timeout, Map::new()).await?;
            } else {
                tracing::warn!(instrument, mission, holder = %holder, "unlock courtesy: lock held by another mission, leaving it");
            }
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[path = "fake.rs"]
pub mod fake;
