//! Bindings block: named values exchanged alongside a script.
//!
//! The blob is a self-contained JSON object with no embedded length; the
//! surrounding message body supplies the length prefix.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, RexProError};

/// Ordered mapping of binding name to value (insertion order preserved).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings(Map<String, Value>);

impl Bindings {
    /// Empty bindings.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Bind `name`, returning the value it replaced. A rebound name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Serialize bindings into a standalone blob.
pub fn serialize(bindings: &Bindings) -> Result<Vec<u8>> {
    serde_json::to_vec(bindings)
        .map_err(|e| RexProError::Internal(format!("bindings serialize failed: {e}")))
}

/// Parse a bindings blob. An empty blob is an empty mapping.
pub fn deserialize(bytes: &[u8]) -> Result<Bindings> {
    if bytes.is_empty() {
        return Ok(Bindings::new());
    }
    serde_json::from_slice(bytes).map_err(|e| RexProError::BindingsDecode(e.to_string()))
}
