// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped instrument lock: acquisition is a constructor,
//! release is guaranteed on every exit path including an early return or
//! a panic unwinding through the guard, via `Drop`.
//!
//! The normal path calls [`InstrumentLockGuard::release`] explicitly so the
//! caller can emit the `unlock` event at the right point in the run log;
//! `Drop` is the backstop for paths that never reach that call.

use mx_executor::{ExecutorError, InstrumentExecutor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub struct InstrumentLockGuard {
    executor: Arc<dyn InstrumentExecutor>,
    mission: String,
    instruments: Vec<String>,
    timeout: Duration,
    released: AtomicBool,
}

impl InstrumentLockGuard {
    /// Acquire the lock for every instrument in `instruments` under the
    /// `mission` holder identity. A 409 from any instrument surfaces as
    /// [`ExecutorError::Lock`] and no guard is returned.
    pub async fn acquire(
        executor: Arc<dyn InstrumentExecutor>,
        mission: &str,
        instruments: &[String],
        timeout: Duration,
    ) -> Result<Self, ExecutorError> {
        executor.lock(mission, instruments, timeout).await?;
        Ok(Self {
            executor,
            mission: mission.to_string(),
            instruments: instruments.to_vec(),
            timeout,
            released: AtomicBool::new(false),
        })
    }

    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    /// Release courteously: the executor only unlocks instruments this
    /// mission still holds. A no-op on a second call.
    pub async fn release(&self) -> Result<(), ExecutorError> {
        if self.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.executor.unlock(&self.mission, &self.instruments, self.timeout).await
    }
}

impl Drop for InstrumentLockGuard {
    fn drop(&mut self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        let executor = self.executor.clone();
        let mission = self.mission.clone();
        let instruments = std::mem::take(&mut self.instruments);
        let timeout = self.timeout;
        tokio::spawn(async move {
            if let Err(error) = executor.unlock(&mission, &instruments, timeout).await {
                tracing::warn!(mission, %error, "instrument lock released on drop without an explicit unlock event");
            }
        });
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
