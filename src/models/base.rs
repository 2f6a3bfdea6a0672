//! Audit columns and map conversion shared by every model.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Columns every table carries, as `(name, SQL definition)` pairs.
pub const AUDIT_COLUMNS: &[(&str, &str)] = &[
    ("id", "UUID PRIMARY KEY DEFAULT uuid_generate_v4()"),
    ("created_at", "TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP"),
    ("updated_at", "TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP"),
    ("created_by", "TEXT"),
    ("updated_by", "TEXT"),
];

/// Model conversion error.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0} does not serialize to a map")]
    NotAMap(String),
}

/// Identity and audit trail embedded in every model.
///
/// Embed with `#[serde(flatten)]` so the columns appear at the top level of
/// [`Model::to_map`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFields {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl AuditFields {
    pub fn new(created_by: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            created_by,
            updated_by: None,
        }
    }

    /// Record a modification.
    pub fn touch(&mut self, updated_by: Option<String>) {
        self.updated_at = Utc::now();
        self.updated_by = updated_by;
    }
}

impl Default for AuditFields {
    fn default() -> Self {
        Self::new(None)
    }
}

/// A persisted record with audit columns.
pub trait Model: Serialize + DeserializeOwned {
    /// Columns beyond [`AUDIT_COLUMNS`], as `(name, SQL definition)` pairs.
    const COLUMNS: &'static [(&'static str, &'static str)] = &[];

    fn audit(&self) -> &AuditFields;

    fn audit_mut(&mut self) -> &mut AuditFields;

    /// Table name: the type name, lower-cased.
    fn table_name() -> String {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    /// Field name to value map of every column.
    fn to_map(&self) -> Result<Map<String, Value>, ModelError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(ModelError::NotAMap(Self::table_name())),
        }
    }

    /// Overwrite fields named in `changes`.
    ///
    /// Keys that are not fields of the model are ignored. If a value has the
    /// wrong type the model is left unchanged and an error is returned.
    fn update(&mut self, changes: Map<String, Value>) -> Result<(), ModelError> {
        let mut current = self.to_map()?;
        for (key, value) in changes {
            if let Some(slot) = current.get_mut(&key) {
                *slot = value;
            }
        }

        *self = serde_json::from_value(Value::Object(current))?;
        Ok(())
    }
}

/// `CREATE TABLE IF NOT EXISTS` statement for `M`.
pub fn create_table_sql<M: Model>() -> String {
    let columns: Vec<String> = AUDIT_COLUMNS
        .iter()
        .chain(M::COLUMNS.iter())
        .map(|(name, definition)| format!("    {} {}", name, definition))
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        M::table_name(),
        columns.join(",\n")
    )
}
