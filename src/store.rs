//! Flow state carried between the pages of a multi-step flow

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Which multi-page flow a store belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Registration,
    ResetPassword,
}

impl FlowKind {
    pub fn as_str(&self) -> &str {
        match self {
            FlowKind::Registration => "registration",
            FlowKind::ResetPassword => "reset-password",
        }
    }
}

/// Accumulated string fields of one flow
#[derive(Debug, Clone)]
pub struct FlowStore {
    kind: FlowKind,
    fields: BTreeMap<String, String>,
}

impl FlowStore {
    pub fn new(kind: FlowKind) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
        }
    }

    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Present and non-blank
    pub fn has_field(&self, key: &str) -> bool {
        self.get_field(key).is_some_and(|v| !v.trim().is_empty())
    }

    pub fn set_field(&mut self, key: &str, value: &str) {
        self.fields.insert(key.to_string(), value.to_string());
    }

    pub fn reset(&mut self) {
        if !self.fields.is_empty() {
            tracing::info!("Resetting {} flow state ({} fields)", self.kind.as_str(), self.fields.len());
        }
        self.fields.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Bulk read of every accumulated field
    pub fn snapshot(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// JSON body made of every field plus `key`, which overrides a stored
    /// field of the same name
    pub fn payload_with(&self, key: &str, value: &str) -> Map<String, Value> {
        let mut body: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        body.insert(key.to_string(), Value::String(value.to_string()));
        body
    }
}

/// Flow stores owned by the application and lent to each page
#[derive(Debug, Clone)]
pub struct FlowContext {
    pub registration: FlowStore,
    pub reset_password: FlowStore,
}

impl Default for FlowContext {
    fn default() -> Self {
        Self {
            registration: FlowStore::new(FlowKind::Registration),
            reset_password: FlowStore::new(FlowKind::ResetPassword),
        }
    }
}

impl FlowContext {
    pub fn new() -> Self {
        Self::default()
    }
}
