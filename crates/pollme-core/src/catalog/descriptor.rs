//! Read-only descriptor traits over host model metadata.
//!
//! The schema reader only ever sees metadata through these traits, so any
//! model registry can be reflected by providing an adapter. The in-memory
//! [`AppRegistry`](super::AppRegistry) is the adapter used by the application.

/// Target of a relationship field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTarget {
    /// Label of the app owning the related model.
    pub app_label: String,
    /// Name of the related model.
    pub model_name: String,
    /// Explicit reverse-relation name declared on the field.
    pub related_name: Option<String>,
    /// Name of the field on the related model pointing back at this one.
    pub remote_field: String,
}

impl RelationTarget {
    /// Create a relation target without an explicit reverse name.
    pub fn new(
        app_label: impl Into<String>,
        model_name: impl Into<String>,
        remote_field: impl Into<String>,
    ) -> Self {
        Self {
            app_label: app_label.into(),
            model_name: model_name.into(),
            related_name: None,
            remote_field: remote_field.into(),
        }
    }

    /// Set the explicit reverse-relation name.
    pub fn with_related_name(mut self, related_name: impl Into<String>) -> Self {
        self.related_name = Some(related_name.into());
        self
    }

    /// The `app_label.ModelName` qualifier of the target.
    pub fn qualifier(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name)
    }
}

/// One attribute of a model.
pub trait FieldDescriptor {
    /// Field name.
    fn name(&self) -> &str;

    /// Explicit storage column override.
    fn db_column(&self) -> Option<&str>;

    /// Effective storage column: the override if non-empty, else the name.
    fn column_name(&self) -> &str {
        match self.db_column() {
            Some(column) if !column.is_empty() => column,
            _ => self.name(),
        }
    }

    /// Internal type tag, if the field declares one.
    fn internal_type(&self) -> Option<&str>;

    /// Whether the field is flagged as a primary key.
    fn is_primary_key(&self) -> bool;

    /// The relationship target, for relation fields.
    fn relation(&self) -> Option<&RelationTarget>;
}

/// One data model.
pub trait ModelDescriptor {
    /// Field descriptor type.
    type Field: FieldDescriptor;

    /// Model name.
    fn name(&self) -> &str;

    /// Documentation string.
    fn doc(&self) -> Option<&str>;

    /// Storage table name.
    fn db_table(&self) -> &str;

    /// Label of the owning app.
    fn app_label(&self) -> &str;

    /// Full dotted name of the owning app.
    fn app_full_name(&self) -> &str;

    /// Fields in declaration order.
    fn fields(&self) -> &[Self::Field];
}

/// One registered application.
pub trait AppDescriptor {
    /// Model descriptor type.
    type Model: ModelDescriptor;

    /// Full dotted name.
    fn full_name(&self) -> &str;

    /// Short name.
    fn name(&self) -> &str;

    /// Label (short identifier, unique per registry).
    fn label(&self) -> &str;

    /// Registered models in registration order.
    fn models(&self) -> &[Self::Model];
}

/// Source of app descriptors.
pub trait ModelRegistry {
    /// App descriptor type.
    type App: AppDescriptor + Clone;

    /// Snapshot of all registered apps in registration order.
    fn app_configs(&self) -> Vec<Self::App>;
}
