// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The mission YAML schema: generated once from the same [`Mission`]
//! type the decoder parses into, so the published schema and the
//! decoder can never drift apart. Incoming documents are checked
//! against it before the typed decode is attempted, so a schema
//! violation and a decode error are never confused with each other.

use crate::error::ServerError;
use jsonschema::JSONSchema;
use mx_mission::Mission;
use schemars::schema_for;
use serde_json::Value;
use std::sync::OnceLock;

/// The JSON Schema served at `GET /missions/schema`.
pub fn schema_value() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| serde_json::to_value(schema_for!(Mission)).expect("schema serializes"))
}

fn compiled_schema() -> &'static JSONSchema {
    static COMPILED: OnceLock<JSONSchema> = OnceLock::new();
    COMPILED.get_or_init(|| JSONSchema::compile(schema_value()).expect("generated schema is itself valid JSON Schema"))
}

/// Check a YAML document against the published schema. Does not attempt
/// the typed decode — callers that need the parsed tree still call
/// [`Mission::parse`] afterward.
pub fn validate_yaml(yaml: &str) -> Result<(), ServerError> {
    let instance: Value = serde_yaml::from_str(yaml)?;
    if let Err(errors) = compiled_schema().validate(&instance) {
        let joined = errors.map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
        return Err(ServerError::SchemaViolation(joined));
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
