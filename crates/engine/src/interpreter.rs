// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The mission interpreter: run entry, the instrument-lock bracket,
//! `executeSequence`/`handleStep`, and the variable table populated by
//! successful `get`/`get_state` steps.
//!
//! A `Step::Block` invocation recurses into `execute_sequence` *inside* the
//! same retry loop `handle_step` applies to any other step. That single
//! piece of recursion is what makes policy exhaustion propagate correctly: a
//! retry exhaustion inside a sub-block becomes that sub-block-invoking
//! step's own exception, re-considered by the invoking step's resolved
//! policy, for free, without a second error-handling path.

use crate::error::EngineError;
use crate::lock::InstrumentLockGuard;
use mx_core::{Clock, ErrorPolicy, EventKind, JobOutcome, PolicyAction, RunId, ScriptId};
use mx_executor::{dispatch, InstrumentExecutor, InstrumentResponse};
use mx_mission::{Mission, Step, ENTRY_BLOCK};
use mx_store::Store;
use parking_lot::Mutex as PLMutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Default wall-clock timeout for the mission-level instrument lock
/// acquisition.
const LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared slot a run publishes its current block/step into, so the
/// registry can answer "what is this mission doing right now" without
/// reading the run's event log.
pub type Progress = Arc<PLMutex<Option<String>>>;

/// Run one mission body to completion: creates the Run,
/// brackets it with the instrument lock, executes the `mission` block, and
/// always emits `completion`. `progress`, if given, is kept up to date with
/// a human-readable `block[index]:verb` label for the step in flight.
pub async fn run_mission<C: Clock>(
    store: &Store<C>,
    executor: Arc<dyn InstrumentExecutor>,
    mission_name: &str,
    tree: &Mission,
    script_id: ScriptId,
    progress: Option<Progress>,
) -> Result<JobOutcome, EngineError> {
    let run_id = store.create_run(mission_name, script_id)?;
    store.append_event(run_id, EventKind::Start, Value::Null)?;

    let mission_policy = tree.onerror.unwrap_or(ErrorPolicy::DEFAULT);

    let guard = match acquire_lock_with_retry(executor.clone(), mission_name, &tree.drivers, mission_policy).await {
        Ok(guard) => guard,
        Err(err) => {
            store.append_event(run_id, EventKind::Exception, Value::String(err.to_string()))?;
            store.append_event(run_id, EventKind::Completion, Value::Null)?;
            return Ok(JobOutcome::Error);
        }
    };
    store.append_event(run_id, EventKind::Lock, Value::String(tree.drivers.join(",")))?;

    let mut interpreter = Interpreter { store, executor, mission_name, tree, run_id, vars: HashMap::new(), progress: progress.clone() };
    let body_result = interpreter.execute_sequence(ENTRY_BLOCK, mission_policy).await;
    if let Some(progress) = &progress {
        *progress.lock() = None;
    }

    // Best-effort: a failed courtesy release still leaves the `Drop` guard
    // to retry, but the run log needs its `unlock` entry regardless.
    let _ = guard.release().await;
    store.append_event(run_id, EventKind::Unlock, Value::String(tree.drivers.join(",")))?;

    let outcome = match body_result {
        Ok(()) => JobOutcome::Executed,
        Err(err) => {
            store.append_event(run_id, EventKind::Exception, Value::String(err.to_string()))?;
            JobOutcome::Error
        }
    };
    store.append_event(run_id, EventKind::Completion, Value::Null)?;
    Ok(outcome)
}

async fn acquire_lock_with_retry(
    executor: Arc<dyn InstrumentExecutor>,
    mission: &str,
    instruments: &[String],
    policy: ErrorPolicy,
) -> Result<InstrumentLockGuard, EngineError> {
    let attempts = policy.count.max(1);
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match InstrumentLockGuard::acquire(executor.clone(), mission, instruments, LOCK_TIMEOUT).await {
            Ok(guard) => return Ok(guard),
            Err(err) => {
                if attempt < attempts && policy.action == PolicyAction::Retry {
                    if policy.backoff > 0 {
                        tokio::time::sleep(Duration::from_secs(policy.backoff)).await;
                    }
                    continue;
                }
                return Err(EngineError::Aborted(err.to_string()));
            }
        }
    }
}

struct Interpreter<'a, C: Clock> {
    store: &'a Store<C>,
    executor: Arc<dyn InstrumentExecutor>,
    mission_name: &'a str,
    tree: &'a Mission,
    run_id: RunId,
    vars: HashMap<String, Value>,
    progress: Option<Progress>,
}

impl<'a, C: Clock> Interpreter<'a, C> {
    /// `executeSequence(label)`: resolve the block, emit a `step`
    /// event per entry in order, and run each through `handle_step`.
    async fn execute_sequence(&mut self, label: &str, mission_policy: ErrorPolicy) -> Result<(), EngineError> {
        let tree = self.tree;
        let block = tree.block(label).ok_or_else(|| EngineError::UnknownBlock(label.to_string()))?;
        let block_policy = block.onerror;
        for (index, step) in block.sequence.iter().enumerate() {
            if let Some(progress) = &self.progress {
                *progress.lock() = Some(format!("{label}[{index}]:{}", step.verb()));
            }
            let payload = serde_json::to_value(step)?;
            self.store.append_event(self.run_id, EventKind::Step, payload)?;
            let policy = ErrorPolicy::resolve(step.common().onerror, block_policy, Some(mission_policy));
            self.handle_step(step, policy, mission_policy).await?;
        }
        Ok(())
    }

    /// `handleStep(step, policy)`: bounded retry with the
    /// step/block/mission-resolved policy, emitting a `result` event for
    /// any non-null outcome.
    async fn handle_step(&mut self, step: &Step, policy: ErrorPolicy, mission_policy: ErrorPolicy) -> Result<(), EngineError> {
        let attempts = policy.count.max(1);
        let mut attempt = 0u32;
        let err = loop {
            attempt += 1;
            match self.try_step_once(step, mission_policy).await {
                Ok(maybe_result) => {
                    if let Some(result) = maybe_result {
                        let payload = serde_json::to_value(&result)?;
                        self.store.append_event(self.run_id, EventKind::Result, payload)?;
                    }
                    return Ok(());
                }
                Err(err) => {
                    if attempt < attempts && policy.action == PolicyAction::Retry {
                        if policy.backoff > 0 {
                            tokio::time::sleep(Duration::from_secs(policy.backoff)).await;
                        }
                        continue;
                    }
                    break err;
                }
            }
        };
        match policy.action {
            // Abort and retry-exhaustion propagate without recording their
            // own `exception` event here: the failure is either re-judged
            // by an enclosing `Step::Block`'s own policy, or, once it
            // reaches the run, recorded exactly once by `run_mission` right
            // before `completion`.
            PolicyAction::Abort => Err(EngineError::Aborted(err.to_string())),
            PolicyAction::Retry => Err(EngineError::PolicyExhausted(err.to_string())),
            // continue/ignore/break swallow the failure here and execution
            // moves on, so this is the only place the failure is ever
            // recorded — log it as this step's `exception` event.
            PolicyAction::Continue | PolicyAction::Ignore | PolicyAction::Break => {
                tracing::warn!(step = step.verb(), error = %err, "step failed, continuing per policy");
                self.store.append_event(self.run_id, EventKind::Exception, Value::String(err.to_string()))?;
                Ok(())
            }
        }
    }

    async fn try_step_once(&mut self, step: &Step, mission_policy: ErrorPolicy) -> Result<Option<InstrumentResponse>, EngineError> {
        match step {
            Step::Block { label, common } => {
                let proceed = common.condition.as_ref().map_or(true, |c| c.eval(&self.vars));
                if proceed {
                    let loops = common.loop_count.unwrap_or(1).max(1);
                    for _ in 0..loops {
                        self.execute_sequence(label, mission_policy).await?;
                    }
                }
                Ok(None)
            }
            Step::Sleep { seconds, .. } => {
                tokio::time::sleep(Duration::from_secs_f64(seconds.max(0.0))).await;
                Ok(None)
            }
            _ => {
                let response = dispatch(self.executor.as_ref(), self.mission_name, step).await?;
                if let Some(response) = &response {
                    match step {
                        Step::GetState { .. } => {
                            self.vars.insert("driver_state".to_string(), response.value.clone().unwrap_or(Value::Null));
                        }
                        Step::Get { parameter, .. } => {
                            self.vars.insert(parameter.clone(), response.value.clone().unwrap_or(Value::Null));
                        }
                        _ => {}
                    }
                }
                Ok(response)
            }
        }
    }
}

#[cfg(test)]
#[path = "interpreter_tests.rs"]
mod tests;
