//! In-memory application registry.

use super::app::AppConfig;
use super::descriptor::{ModelRegistry, RelationTarget};
use super::field::FieldDef;
use super::model::ModelDef;
use crate::error::Error;
use std::collections::HashSet;
use tracing::debug;

/// Registry of installed applications and their models.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    apps: Vec<AppConfig>,
}

impl AppRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an app, binding its models to it.
    ///
    /// Fails if the label is already taken or the app declares a model name twice.
    pub fn register(&mut self, mut app: AppConfig) -> Result<(), Error> {
        if self.apps.iter().any(|a| a.label == app.label) {
            return Err(Error::DuplicateApp(app.label));
        }

        let mut seen = HashSet::new();
        for model in &mut app.models {
            if !seen.insert(model.name.clone()) {
                return Err(Error::DuplicateModel {
                    app: app.label.clone(),
                    model: model.name.clone(),
                });
            }
            model.bind(&app.label, &app.full_name);
        }

        debug!(app = %app.full_name, models = app.models.len(), "Registered app");
        self.apps.push(app);
        Ok(())
    }

    /// Register an app, builder style.
    pub fn with_app(mut self, app: AppConfig) -> Result<Self, Error> {
        self.register(app)?;
        Ok(self)
    }

    /// All registered apps in registration order.
    pub fn apps(&self) -> &[AppConfig] {
        &self.apps
    }

    /// Get an app by label.
    pub fn get_app(&self, label: &str) -> Option<&AppConfig> {
        self.apps.iter().find(|a| a.label == label)
    }

    /// Get a model by app label and model name.
    pub fn get_model(&self, app_label: &str, model_name: &str) -> Option<&ModelDef> {
        self.get_app(app_label)
            .and_then(|app| app.get_model(model_name))
    }

    /// Add the reverse side of every forward relation to its target model.
    ///
    /// The reverse field is named after the relation's remote field and typed
    /// with the matching reverse kind. Targets that already declare a field
    /// of that name are left untouched. Fails on a relation to a model that
    /// is not registered.
    pub fn populate_reverse_relations(&mut self) -> Result<(), Error> {
        let mut pending: Vec<(String, String, FieldDef)> = Vec::new();

        for app in &self.apps {
            for model in &app.models {
                for field in &model.fields {
                    let (Some(target), Some(reverse_kind)) =
                        (field.relation.as_ref(), field.kind.reverse())
                    else {
                        continue;
                    };

                    if self.get_model(&target.app_label, &target.model_name).is_none() {
                        return Err(Error::UnknownModel(target.qualifier()));
                    }

                    let mut back = RelationTarget::new(&app.label, &model.name, &field.name);
                    back.related_name = target.related_name.clone();

                    let reverse = FieldDef {
                        relation: Some(back),
                        ..FieldDef::new(target.remote_field.clone(), reverse_kind)
                    };
                    pending.push((target.app_label.clone(), target.model_name.clone(), reverse));
                }
            }
        }

        for (app_label, model_name, reverse) in pending {
            let Some(target) = self
                .apps
                .iter_mut()
                .find(|a| a.label == app_label)
                .and_then(|a| a.models.iter_mut().find(|m| m.name == model_name))
            else {
                continue;
            };

            if target.get_field(&reverse.name).is_none() {
                debug!(
                    model = %format!("{}.{}", app_label, model_name),
                    field = %reverse.name,
                    "Added reverse relation"
                );
                target.fields.push(reverse);
            }
        }

        Ok(())
    }
}

impl ModelRegistry for AppRegistry {
    type App = AppConfig;

    fn app_configs(&self) -> Vec<AppConfig> {
        self.apps.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FieldKind;

    fn blog_registry() -> AppRegistry {
        let accounts = AppConfig::new("accounts").with_model(
            ModelDef::new("User")
                .with_field(FieldDef::auto_id())
                .with_field(FieldDef::new("username", FieldKind::CharField)),
        );
        let blog = AppConfig::new("blog").with_model(
            ModelDef::new("Post")
                .with_field(FieldDef::auto_id())
                .with_field(FieldDef::new("title", FieldKind::CharField))
                .with_field(FieldDef::foreign_key("author", "accounts", "User").with_related_name("posts")),
        );

        AppRegistry::new()
            .with_app(accounts)
            .unwrap()
            .with_app(blog)
            .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = blog_registry();

        assert_eq!(registry.apps().len(), 2);
        assert!(registry.get_app("blog").is_some());
        let post = registry.get_model("blog", "Post").unwrap();
        assert_eq!(post.db_table, "blog_post");
        assert_eq!(post.app_full_name, "blog");
        assert!(registry.get_model("blog", "Comment").is_none());
    }

    #[test]
    fn test_duplicate_app_label() {
        let mut registry = blog_registry();
        let err = registry.register(AppConfig::new("other.blog")).unwrap_err();
        assert!(matches!(err, Error::DuplicateApp(label) if label == "blog"));
    }

    #[test]
    fn test_duplicate_model() {
        let app = AppConfig::new("shop")
            .with_model(ModelDef::new("Item"))
            .with_model(ModelDef::new("Item"));
        let err = AppRegistry::new().register(app).unwrap_err();
        assert!(matches!(err, Error::DuplicateModel { .. }));
    }

    #[test]
    fn test_populate_reverse_relations() {
        let mut registry = blog_registry();
        registry.populate_reverse_relations().unwrap();

        let user = registry.get_model("accounts", "User").unwrap();
        let posts = user.get_field("posts").unwrap();
        assert_eq!(posts.kind, FieldKind::ManyToOneRel);

        let back = posts.relation.as_ref().unwrap();
        assert_eq!(back.qualifier(), "blog.Post");
        assert_eq!(back.remote_field, "author");
        assert_eq!(back.related_name.as_deref(), Some("posts"));
    }

    #[test]
    fn test_populate_is_idempotent() {
        let mut registry = blog_registry();
        registry.populate_reverse_relations().unwrap();
        registry.populate_reverse_relations().unwrap();

        let user = registry.get_model("accounts", "User").unwrap();
        assert_eq!(user.fields.len(), 3);
    }

    #[test]
    fn test_populate_unknown_target() {
        let app = AppConfig::new("blog").with_model(
            ModelDef::new("Post").with_field(FieldDef::foreign_key("author", "accounts", "User")),
        );
        let mut registry = AppRegistry::new().with_app(app).unwrap();

        let err = registry.populate_reverse_relations().unwrap_err();
        assert!(matches!(err, Error::UnknownModel(q) if q == "accounts.User"));
    }

    #[test]
    fn test_self_relation() {
        let app = AppConfig::new("polls").with_model(
            ModelDef::new("Genre")
                .with_field(FieldDef::auto_id())
                .with_field(FieldDef::foreign_key("parent", "polls", "Genre").with_related_name("children")),
        );
        let mut registry = AppRegistry::new().with_app(app).unwrap();
        registry.populate_reverse_relations().unwrap();

        let genre = registry.get_model("polls", "Genre").unwrap();
        assert!(genre.get_field("children").is_some());
    }
}
