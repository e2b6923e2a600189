//! Model definitions.

use super::descriptor::ModelDescriptor;
use super::field::FieldDef;

/// A model definition (one persisted entity type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDef {
    /// Model name (unique within its app).
    pub name: String,
    /// Documentation string.
    pub doc: Option<String>,
    /// Storage table. Defaults to `<app_label>_<lowercase name>` on registration.
    pub db_table: String,
    /// Owning app label, set on registration.
    pub app_label: String,
    /// Owning app full name, set on registration.
    pub app_full_name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
}

impl ModelDef {
    /// Create a new model definition with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            db_table: String::new(),
            app_label: String::new(),
            app_full_name: String::new(),
            fields: Vec::new(),
        }
    }

    /// Set the documentation string.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set an explicit storage table.
    pub fn with_db_table(mut self, table: impl Into<String>) -> Self {
        self.db_table = table.into();
        self
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of primary key fields in declaration order.
    pub fn primary_key_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.primary_key)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Bind the model to its app, filling in defaults.
    pub(crate) fn bind(&mut self, app_label: &str, app_full_name: &str) {
        self.app_label = app_label.to_string();
        self.app_full_name = app_full_name.to_string();
        if self.db_table.is_empty() {
            self.db_table = format!("{}_{}", app_label, self.name.to_lowercase());
        }

        let default_remote = self.name.to_lowercase();
        for field in &mut self.fields {
            if let Some(relation) = field.relation.as_mut() {
                if relation.remote_field.is_empty() {
                    relation.remote_field = relation
                        .related_name
                        .clone()
                        .unwrap_or_else(|| default_remote.clone());
                }
            }
        }
    }
}

impl ModelDescriptor for ModelDef {
    type Field = FieldDef;

    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    fn db_table(&self) -> &str {
        &self.db_table
    }

    fn app_label(&self) -> &str {
        &self.app_label
    }

    fn app_full_name(&self) -> &str {
        &self.app_full_name
    }

    fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}
