//! Application configurations.

use super::descriptor::AppDescriptor;
use super::model::ModelDef;

/// A registered application grouping related models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Full dotted name (e.g. `pollme.apps.polls`).
    pub full_name: String,
    /// Short name, the last dotted segment of the full name.
    pub name: String,
    /// Label, unique within a registry. Defaults to the short name.
    pub label: String,
    /// Models in registration order.
    pub models: Vec<ModelDef>,
}

impl AppConfig {
    /// Create a new app configuration from its full dotted name.
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let name = full_name
            .rsplit('.')
            .next()
            .unwrap_or(full_name.as_str())
            .to_string();

        Self {
            label: name.clone(),
            name,
            full_name,
            models: Vec::new(),
        }
    }

    /// Override the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a model.
    pub fn with_model(mut self, model: ModelDef) -> Self {
        self.models.push(model);
        self
    }

    /// Get a model by name.
    pub fn get_model(&self, name: &str) -> Option<&ModelDef> {
        self.models.iter().find(|m| m.name == name)
    }
}

impl AppDescriptor for AppConfig {
    type Model = ModelDef;

    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn models(&self) -> &[ModelDef] {
        &self.models
    }
}
