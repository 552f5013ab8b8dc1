//! `--default-params` flag value.
//!
//! Takes a JSON object and keeps every top-level value as its own JSON text,
//! so each key can be written as a separate ConfigMap entry.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AutoscalerError, AutoscalerResult};

/// Flat key -> JSON text map seeded from `--default-params`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DefaultParams(BTreeMap<String, String>);

impl DefaultParams {
    pub const TYPE_NAME: &'static str = "configMapData";

    /// Replace the current content with the entries decoded from `raw`.
    ///
    /// The previous content is left untouched when `raw` fails to decode.
    pub fn set(&mut self, raw: &str) -> AutoscalerResult<()> {
        // `null` decodes to no entries rather than an error.
        let decoded: Option<Map<String, Value>> = serde_json::from_str(raw)
            .map_err(|e| AutoscalerError::Parse(e.to_string()))?;

        let mut params = BTreeMap::new();
        for (key, value) in decoded.unwrap_or_default() {
            params.insert(key, serde_json::to_string(&value)?);
        }

        self.0 = params;
        Ok(())
    }

    pub fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl FromStr for DefaultParams {
    type Err = AutoscalerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut params = Self::default();
        params.set(raw)?;
        Ok(params)
    }
}

impl fmt::Display for DefaultParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map[")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{key}:{value}")?;
        }
        write!(f, "]")
    }
}
