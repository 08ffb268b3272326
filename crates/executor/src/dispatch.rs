// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Matches a decoded [`mx_mission::Step`] directly to its executor verb:
//! no runtime inspection of "which key is present", since the YAML
//! decoder already produced a closed tagged enum.

use crate::client::InstrumentExecutor;
use crate::error::ExecutorError;
use crate::response::InstrumentResponse;
use mx_mission::Step;
use std::time::Duration;

/// Default per-call timeout when a step names none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn timeout_of(step: &Step) -> Duration {
    step.common().timeout.map(Duration::from_secs_f64).unwrap_or(DEFAULT_TIMEOUT)
}

/// Argument validation the YAML decoder can't do: it knows a `target`
/// or `parameter` is a string, but not that it's non-empty, and it can't
/// see that a `timeout` is a sane, finite, non-negative number. Anything
/// caught here is a [`ExecutorError::CommandArgument`] failure per §4.2,
/// raised before any outbound call is attempted.
fn validate(target: &str, step: &Step) -> Result<(), ExecutorError> {
    if target.trim().is_empty() {
        return Err(ExecutorError::CommandArgument { target: target.to_string(), message: "target is empty".to_string() });
    }
    if let Some(timeout) = step.common().timeout {
        if !timeout.is_finite() || timeout < 0.0 {
            return Err(ExecutorError::CommandArgument {
                target: target.to_string(),
                message: format!("timeout {timeout} is not a finite, non-negative number"),
            });
        }
    }
    if let Step::Execute { command, .. } = step {
        if command.trim().is_empty() {
            return Err(ExecutorError::CommandArgument { target: target.to_string(), message: "command is empty".to_string() });
        }
    }
    if let Step::Get { parameter, .. } | Step::Set { parameter, .. } = step {
        if parameter.trim().is_empty() {
            return Err(ExecutorError::CommandArgument { target: target.to_string(), message: "parameter is empty".to_string() });
        }
    }
    Ok(())
}

/// Dispatch one step to its instrument verb.
///
/// `Sleep` and `Block` never reach this function in the interpreter's
/// normal flow; they are matched here anyway for totality and return
/// `None`, the "no-op result" behavior for anything the executor doesn't
/// recognize as an instrument verb.
pub async fn dispatch(
    executor: &dyn InstrumentExecutor,
    mission: &str,
    step: &Step,
) -> Result<Option<InstrumentResponse>, ExecutorError> {
    if let Some(target) = step.target() {
        validate(target, step)?;
    }
    let timeout = timeout_of(step);
    let response = match step {
        Step::Execute { target, command, kwargs, .. } => {
            executor.execute(mission, target, command, kwargs, timeout).await?
        }
        Step::Get { target, parameter, .. } => executor.get(mission, target, parameter, timeout).await?,
        Step::Set { target, parameter, value, .. } => executor.set(mission, target, parameter, value, timeout).await?,
        Step::GetState { target, .. } => executor.get_state(mission, target, timeout).await?,
        Step::Discover { target, .. } => executor.discover(mission, target, timeout).await?,
        Step::Reset { target, .. } => executor.reset(mission, target, timeout).await?,
        Step::Ping { target, .. } => executor.ping(mission, target, timeout).await?,
        Step::Connect { target, .. } => executor.connect(mission, target, timeout).await?,
        Step::Disconnect { target, .. } => executor.disconnect(mission, target, timeout).await?,
        Step::SetInitParams { target, config, .. } => executor.set_init_params(mission, target, config, timeout).await?,
        Step::Configure { target, config, .. } => executor.configure(mission, target, config, timeout).await?,
        Step::Sleep { .. } | Step::Block { .. } => return Ok(None),
    };
    Ok(Some(response))
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
