//! Field definitions for models.

use super::descriptor::{FieldDescriptor, RelationTarget};
use super::types::FieldKind;

/// A field definition within a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Declared kind.
    pub kind: FieldKind,
    /// Explicit storage column.
    pub db_column: Option<String>,
    /// Primary key flag.
    pub primary_key: bool,
    /// Relation target for relation kinds.
    pub relation: Option<RelationTarget>,
}

impl FieldDef {
    /// Create a new plain field.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            db_column: None,
            primary_key: false,
            relation: None,
        }
    }

    /// Create an auto-incrementing `id` primary key.
    pub fn auto_id() -> Self {
        Self::new("id", FieldKind::BigAutoField).primary_key()
    }

    /// Create a relation field of the given kind.
    ///
    /// The reverse field name defaults to the lowercase source model name and
    /// is filled in when the model is registered.
    pub fn related(
        name: impl Into<String>,
        kind: FieldKind,
        app_label: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            relation: Some(RelationTarget::new(app_label, model_name, "")),
            ..Self::new(name, kind)
        }
    }

    /// Create a foreign key field.
    pub fn foreign_key(
        name: impl Into<String>,
        app_label: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self::related(name, FieldKind::ForeignKey, app_label, model_name)
    }

    /// Mark as primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Set the storage column.
    pub fn with_db_column(mut self, column: impl Into<String>) -> Self {
        self.db_column = Some(column.into());
        self
    }

    /// Set the reverse-relation name. No effect on non-relation fields.
    pub fn with_related_name(mut self, related_name: impl Into<String>) -> Self {
        if let Some(relation) = self.relation.as_mut() {
            relation.related_name = Some(related_name.into());
        }
        self
    }
}

impl FieldDescriptor for FieldDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn db_column(&self) -> Option<&str> {
        self.db_column.as_deref()
    }

    fn internal_type(&self) -> Option<&str> {
        self.kind.internal_type()
    }

    fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    fn relation(&self) -> Option<&RelationTarget> {
        self.relation.as_ref()
    }
}
