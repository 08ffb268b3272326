// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The step DSL.
//!
//! The source decoder inspected a step record for "which key is present"
//! at dispatch time; here the YAML decoder produces a closed tagged
//! `Step` enum up front, so the executor and interpreter only ever match
//! on a variant instead of probing a map.
//!
//! Deserialization still has to recognize the original untagged shape —
//! `{execute: ..., command: ...}` vs `{sleep: ...}` vs `{get_state: ...}`
//! — so `Step` carries a hand-written `Deserialize`/`Serialize` pair over
//! a private `StepWire` helper, the same untagged-helper trick this
//! codebase already uses for short/long container syntax.

use crate::condition::Condition;
use mx_core::ErrorPolicy;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Fields every step carries regardless of its verb.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepCommon {
    pub timeout: Option<f64>,
    pub onerror: Option<ErrorPolicy>,
    pub condition: Option<Condition>,
    pub loop_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Execute { target: String, command: String, kwargs: Map<String, Value>, common: StepCommon },
    Get { target: String, parameter: String, common: StepCommon },
    Set { target: String, parameter: String, value: Value, common: StepCommon },
    GetState { target: String, common: StepCommon },
    Discover { target: String, common: StepCommon },
    Reset { target: String, common: StepCommon },
    Ping { target: String, common: StepCommon },
    Connect { target: String, common: StepCommon },
    Disconnect { target: String, common: StepCommon },
    SetInitParams { target: String, config: Map<String, Value>, common: StepCommon },
    Configure { target: String, config: Map<String, Value>, common: StepCommon },
    Sleep { seconds: f64, common: StepCommon },
    /// Sub-block invocation (the source's `block_name` key).
    Block { label: String, common: StepCommon },
}

impl Step {
    pub fn common(&self) -> &StepCommon {
        match self {
            Step::Execute { common, .. }
            | Step::Get { common, .. }
            | Step::Set { common, .. }
            | Step::GetState { common, .. }
            | Step::Discover { common, .. }
            | Step::Reset { common, .. }
            | Step::Ping { common, .. }
            | Step::Connect { common, .. }
            | Step::Disconnect { common, .. }
            | Step::SetInitParams { common, .. }
            | Step::Configure { common, .. }
            | Step::Sleep { common, .. }
            | Step::Block { common, .. } => common,
        }
    }

    /// The instrument this step addresses, for every variant that
    /// carries one. `None` for `Sleep`/`Block`, which address no
    /// instrument.
    pub fn target(&self) -> Option<&str> {
        match self {
            Step::Execute { target, .. }
            | Step::Get { target, .. }
            | Step::Set { target, .. }
            | Step::GetState { target, .. }
            | Step::Discover { target, .. }
            | Step::Reset { target, .. }
            | Step::Ping { target, .. }
            | Step::Connect { target, .. }
            | Step::Disconnect { target, .. }
            | Step::SetInitParams { target, .. }
            | Step::Configure { target, .. } => Some(target),
            Step::Sleep { .. } | Step::Block { .. } => None,
        }
    }

    /// Name used in `step` event payloads and tracing spans.
    pub fn verb(&self) -> &'static str {
        match self {
            Step::Execute { .. } => "execute",
            Step::Get { .. } => "get",
            Step::Set { .. } => "set",
            Step::GetState { .. } => "get_state",
            Step::Discover { .. } => "discover",
            Step::Reset { .. } => "reset",
            Step::Ping { .. } => "ping",
            Step::Connect { .. } => "connect",
            Step::Disconnect { .. } => "disconnect",
            Step::SetInitParams { .. } => "set_init_params",
            Step::Configure { .. } => "configure",
            Step::Sleep { .. } => "sleep",
            Step::Block { .. } => "block_name",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
struct CommonWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout: Option<f64>,
    #[serde(default, rename = "onerror", skip_serializing_if = "Option::is_none")]
    onerror: Option<ErrorPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    loop_count: Option<u32>,
}

impl From<CommonWire> for StepCommon {
    fn from(w: CommonWire) -> Self {
        StepCommon { timeout: w.timeout, onerror: w.onerror, condition: w.condition, loop_count: w.loop_count }
    }
}

impl From<StepCommon> for CommonWire {
    fn from(c: StepCommon) -> Self {
        CommonWire { timeout: c.timeout, onerror: c.onerror, condition: c.condition, loop_count: c.loop_count }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
enum StepWire {
    Execute {
        execute: String,
        command: String,
        #[serde(default)]
        kwargs: Map<String, Value>,
        #[serde(flatten)]
        common: CommonWire,
    },
    GetState {
        get_state: String,
        #[serde(flatten)]
        common: CommonWire,
    },
    Discover {
        discover: String,
        #[serde(flatten)]
        common: CommonWire,
    },
    Reset {
        reset: String,
        #[serde(flatten)]
        common: CommonWire,
    },
    Ping {
        ping: String,
        #[serde(flatten)]
        common: CommonWire,
    },
    Connect {
        connect: String,
        #[serde(flatten)]
        common: CommonWire,
    },
    Disconnect {
        disconnect: String,
        #[serde(flatten)]
        common: CommonWire,
    },
    SetInitParams {
        set_init_params: String,
        #[serde(default)]
        config: Map<String, Value>,
        #[serde(flatten)]
        common: CommonWire,
    },
    Configure {
        configure: String,
        #[serde(default)]
        config: Map<String, Value>,
        #[serde(flatten)]
        common: CommonWire,
    },
    Set {
        set: String,
        parameter: String,
        value: Value,
        #[serde(flatten)]
        common: CommonWire,
    },
    Get {
        get: String,
        parameter: String,
        #[serde(flatten)]
        common: CommonWire,
    },
    Sleep {
        sleep: f64,
        #[serde(flatten)]
        common: CommonWire,
    },
    Block {
        block_name: String,
        #[serde(flatten)]
        common: CommonWire,
    },
}

impl From<StepWire> for Step {
    fn from(wire: StepWire) -> Self {
        match wire {
            StepWire::Execute { execute, command, kwargs, common } => {
                Step::Execute { target: execute, command, kwargs, common: common.into() }
            }
            StepWire::GetState { get_state, common } => Step::GetState { target: get_state, common: common.into() },
            StepWire::Discover { discover, common } => Step::Discover { target: discover, common: common.into() },
            StepWire::Reset { reset, common } => Step::Reset { target: reset, common: common.into() },
            StepWire::Ping { ping, common } => Step::Ping { target: ping, common: common.into() },
            StepWire::Connect { connect, common } => Step::Connect { target: connect, common: common.into() },
            StepWire::Disconnect { disconnect, common } => {
                Step::Disconnect { target: disconnect, common: common.into() }
            }
            StepWire::SetInitParams { set_init_params, config, common } => {
                Step::SetInitParams { target: set_init_params, config, common: common.into() }
            }
            StepWire::Configure { configure, config, common } => {
                Step::Configure { target: configure, config, common: common.into() }
            }
            StepWire::Set { set, parameter, value, common } => {
                Step::Set { target: set, parameter, value, common: common.into() }
            }
            StepWire::Get { get, parameter, common } => Step::Get { target: get, parameter, common: common.into() },
            StepWire::Sleep { sleep, common } => Step::Sleep { seconds: sleep, common: common.into() },
            StepWire::Block { block_name, common } => Step::Block { label: block_name, common: common.into() },
        }
    }
}

impl From<Step> for StepWire {
    fn from(step: Step) -> Self {
        match step {
            Step::Execute { target, command, kwargs, common } => {
                StepWire::Execute { execute: target, command, kwargs, common: common.into() }
            }
            Step::Get { target, parameter, common } => StepWire::Get { get: target, parameter, common: common.into() },
            Step::Set { target, parameter, value, common } => {
                StepWire::Set { set: target, parameter, value, common: common.into() }
            }
            Step::GetState { target, common } => StepWire::GetState { get_state: target, common: common.into() },
            Step::Discover { target, common } => StepWire::Discover { discover: target, common: common.into() },
            Step::Reset { target, common } => StepWire::Reset { reset: target, common: common.into() },
            Step::Ping { target, common } => StepWire::Ping { ping: target, common: common.into() },
            Step::Connect { target, common } => StepWire::Connect { connect: target, common: common.into() },
            Step::Disconnect { target, common } => StepWire::Disconnect { disconnect: target, common: common.into() },
            Step::SetInitParams { target, config, common } => {
                StepWire::SetInitParams { set_init_params: target, config, common: common.into() }
            }
            Step::Configure { target, config, common } => {
                StepWire::Configure { configure: target, config, common: common.into() }
            }
            Step::Sleep { seconds, common } => StepWire::Sleep { sleep: seconds, common: common.into() },
            Step::Block { label, common } => StepWire::Block { block_name: label, common: common.into() },
        }
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        StepWire::deserialize(deserializer).map(Step::from)
    }
}

impl Serialize for Step {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        StepWire::from(self.clone()).serialize(serializer)
    }
}

// schemars doesn't see through the hand-written Deserialize/Serialize, so
// the schema is delegated to the wire-shape union directly.
impl JsonSchema for Step {
    fn schema_name() -> String {
        "Step".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        StepWire::json_schema(gen)
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
