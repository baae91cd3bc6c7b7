//! Measurement units.
//!
//! Upstream payloads are inconsistent about units: some send a bare symbol
//! (`"L"`), others a full object (`{"symbol": "L", "name": "Litre"}`). Both
//! shapes deserialize into [`Unit`], which always serializes as the object.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A measurement unit, identified by its symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Unit {
    /// Display symbol, e.g. `"L"`, `"kg"`, `"m3"`.
    pub symbol: String,
}

impl Unit {
    /// Create a unit from its symbol.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUnit {
    Symbol(String),
    Object { symbol: String },
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawUnit::deserialize(deserializer)? {
            RawUnit::Symbol(symbol) | RawUnit::Object { symbol } => Self { symbol },
        })
    }
}
