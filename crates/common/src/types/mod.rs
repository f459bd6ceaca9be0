//! Wire and on-disk shapes shared by the service and server crates.
//!
//! These structs are stored as-is by the document store; the field names match
//! the JSON files already present in existing data directories.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Decode an explicit `null` as the type's default. Older records store empty
/// maps and lists as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    Number,
    String,
    Boolean,
    Enum,
    Array,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationType {
    Grid,
    Row,
    Accordion,
    SingleField,
    SlotTracker,
    Card,
    Tabs,
    Default,
    Custom,
}

/// A user-declared value slot in a schema.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Variable {
    #[serde(rename = "type")]
    pub kind: VariableType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Allowed values for `enum` variables.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Element type for `array` variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Variable>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Visualization {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VisualizationType,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub child_visualizations: Vec<Visualization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// Base template a user defines; instances carry data shaped by it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Schema {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub user_version: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: HashMap<String, Variable>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visualizations: Vec<Visualization>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Instance {
    #[serde(rename = "_id")]
    pub id: String,
    pub schema_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct NewSchema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct NewInstance {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub schema_id: String,
}
