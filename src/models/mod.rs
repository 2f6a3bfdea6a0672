//! Persistence models.

mod base;

pub use base::{AUDIT_COLUMNS, AuditFields, Model, ModelError, create_table_sql};
