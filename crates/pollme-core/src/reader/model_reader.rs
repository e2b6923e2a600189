//! The model reader: reflects app/model metadata into a [`SchemaResult`].

use super::config::{ReaderConfig, ALWAYS_VISIBLE_MARKER};
use super::result::{
    AppSchema, ColumnDetail, JoinEdge, ModelDetail, RelatedColumn, SchemaResult, APP_MODELS_KEY,
    FOREIGN_KEY, UNKNOWN_DATATYPE,
};
use crate::catalog::{AppDescriptor, FieldDescriptor, ModelDescriptor, ModelRegistry};
use std::collections::HashSet;
use tracing::{debug, info};

/// Reads a snapshot of registered apps and reflects their models.
///
/// The snapshot and the set of retained `app_label.ModelName` qualifiers are
/// taken once at construction. Every reflection call recomputes its result
/// from that snapshot; nothing is cached between calls.
pub struct ModelReader<A: AppDescriptor> {
    apps: Vec<A>,
    config: ReaderConfig,
    /// Retained qualifiers in enumeration order.
    qualifiers: Vec<String>,
    /// Same qualifiers, for membership checks during join inference.
    qualifier_set: HashSet<String>,
}

impl<A: AppDescriptor> ModelReader<A> {
    /// Create a reader over the given apps.
    pub fn new(apps: Vec<A>, config: ReaderConfig) -> Self {
        let mut reader = Self {
            apps,
            config,
            qualifiers: Vec::new(),
            qualifier_set: HashSet::new(),
        };
        reader.collect_qualifiers();
        reader
    }

    /// Create a reader over a fresh snapshot of a registry.
    pub fn from_registry<R>(registry: &R, config: ReaderConfig) -> Self
    where
        R: ModelRegistry<App = A>,
    {
        Self::new(registry.app_configs(), config)
    }

    fn collect_qualifiers(&mut self) {
        let mut qualifiers = Vec::new();
        for app in self.apps.iter().filter(|app| self.is_app_included(app)) {
            for model in app.models() {
                if !self.is_model_excluded(model) && model.name() != APP_MODELS_KEY {
                    qualifiers.push(format!("{}.{}", app.label(), model.name()));
                }
            }
        }
        self.qualifier_set = qualifiers.iter().cloned().collect();
        self.qualifiers = qualifiers;
    }

    /// The reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// The app snapshot.
    pub fn apps(&self) -> &[A] {
        &self.apps
    }

    /// Retained `app_label.ModelName` qualifiers in enumeration order.
    pub fn app_label_model_names(&self) -> &[String] {
        &self.qualifiers
    }

    /// Check if an app passes the inclusion allow-list.
    pub fn is_app_included(&self, app: &A) -> bool {
        self.config
            .includes_any(&[app.full_name(), app.name(), app.label()])
    }

    /// Check if a model is hidden from the reflected schema.
    ///
    /// Models of framework or vendor apps are hidden unless their name
    /// contains "user" in any case.
    pub fn is_model_excluded(&self, model: &A::Model) -> bool {
        if model.name().to_lowercase().contains(ALWAYS_VISIBLE_MARKER) {
            return false;
        }
        self.config.is_excluded_app(model.app_full_name())
    }

    /// Look up a model of the snapshot by app label and model name.
    pub fn get_model_by_name(&self, app_label: &str, model_name: &str) -> Option<&A::Model> {
        self.apps
            .iter()
            .filter(|app| app.label() == app_label)
            .flat_map(|app| app.models())
            .find(|model| model.name() == model_name)
    }

    /// Names of the model's primary key fields in declaration order.
    pub fn primary_key_fields(&self, model: &A::Model) -> Vec<String> {
        model
            .fields()
            .iter()
            .filter(|field| field.is_primary_key())
            .map(|field| field.name().to_string())
            .collect()
    }

    /// Column details of every field of a model, in declaration order.
    pub fn column_details(&self, model: &A::Model) -> Vec<ColumnDetail> {
        model
            .fields()
            .iter()
            .map(|field| ColumnDetail {
                field_name: field.name().to_string(),
                db_column_name: field.column_name().to_string(),
                datatype: field
                    .internal_type()
                    .unwrap_or(UNKNOWN_DATATYPE)
                    .to_string(),
                model_name: model.name().to_string(),
                app_label: model.app_label().to_string(),
                app_full_name: model.app_full_name().to_string(),
                related: self.related_column(field),
            })
            .collect()
    }

    fn related_column<F: FieldDescriptor>(&self, field: &F) -> Option<RelatedColumn> {
        let target = field.relation()?;
        let related = self.get_model_by_name(&target.app_label, &target.model_name)?;

        let (related_field_name, related_db_column_name) =
            match target.related_name.as_deref().filter(|name| !name.is_empty()) {
                Some(name) => (name.to_string(), name.to_string()),
                None => {
                    let column = related
                        .fields()
                        .iter()
                        .find(|f| f.name() == target.remote_field)
                        .map(|f| f.column_name().to_string())
                        .unwrap_or_else(|| target.remote_field.clone());
                    (target.remote_field.clone(), column)
                }
            };

        Some(RelatedColumn {
            related_app_full_name: related.app_full_name().to_string(),
            related_app_label: related.app_label().to_string(),
            related_model_name: related.name().to_string(),
            related_db_table_name: related.db_table().to_string(),
            related_field_name,
            related_db_column_name,
        })
    }

    /// Infer join edges from a model's column details.
    ///
    /// Only foreign keys whose target is a retained model produce an edge.
    /// The edge joins on the declared reverse field when the target has a
    /// field of that name, otherwise on the target's first primary key.
    pub fn infer_joins(&self, columns: &[ColumnDetail]) -> Vec<JoinEdge> {
        let mut joins = Vec::new();

        for column in columns.iter().filter(|c| c.is_foreign_key()) {
            let Some(related) = column.related.as_ref() else {
                continue;
            };

            let qualifier = related.qualifier();
            if !self.qualifier_set.contains(&qualifier) {
                debug!(
                    source = %format!("{}.{}", column.app_label, column.model_name),
                    field = %column.field_name,
                    target = %qualifier,
                    "Join target not retained"
                );
                continue;
            }

            let Some(target) =
                self.get_model_by_name(&related.related_app_label, &related.related_model_name)
            else {
                continue;
            };

            let has_reverse_field = target
                .fields()
                .iter()
                .any(|f| f.name() == related.related_field_name);

            let join_field = if has_reverse_field {
                Some(related.related_field_name.clone())
            } else {
                self.primary_key_fields(target).into_iter().next()
            };

            let Some(related_field) = join_field else {
                debug!(target = %qualifier, "Join target has no reverse field or primary key");
                continue;
            };

            joins.push(JoinEdge {
                join_type: FOREIGN_KEY.to_string(),
                source_app_label: column.app_label.clone(),
                source_app_full_name: column.app_full_name.clone(),
                source_model_name: column.model_name.clone(),
                related_app_label: related.related_app_label.clone(),
                related_app_full_name: related.related_app_full_name.clone(),
                related_model_name: related.related_model_name.clone(),
                related_field,
            });
        }

        joins
    }

    /// Reflect one model.
    pub fn model_detail(&self, app: &A, model: &A::Model) -> ModelDetail {
        let lst_column_details = self.column_details(model);
        let lst_joins_details = self.infer_joins(&lst_column_details);

        ModelDetail {
            app_full_name: app.full_name().to_string(),
            app_name: app.label().to_string(),
            model_name: model.name().to_string(),
            db_table_name: model.db_table().to_string(),
            model_doc_string: model.doc().map(str::to_string),
            lst_primary_fields: self.primary_key_fields(model),
            lst_column_details,
            lst_joins_details,
        }
    }

    /// Reflect every included app with at least one retained model.
    pub fn reflect_all(&self) -> SchemaResult {
        let mut result = SchemaResult::default();

        for app in self.apps.iter().filter(|app| self.is_app_included(app)) {
            let mut app_schema = AppSchema::default();

            for model in app.models() {
                if self.is_model_excluded(model) {
                    debug!(app = %app.full_name(), model = %model.name(), "Model excluded");
                    continue;
                }
                if model.name() == APP_MODELS_KEY {
                    debug!(
                        app = %app.full_name(),
                        model = %model.name(),
                        "Model name collides with model list key"
                    );
                    continue;
                }
                let detail = self.model_detail(app, model);
                app_schema.lst_app_models.push(detail.model_name.clone());
                app_schema.models.insert(detail.model_name.clone(), detail);
            }

            if app_schema.lst_app_models.is_empty() {
                debug!(app = %app.full_name(), "App has no visible models");
                continue;
            }

            result.lst_apps.push(app.full_name().to_string());
            result.dct_data.insert(app.full_name().to_string(), app_schema);
        }

        info!(
            apps = result.lst_apps.len(),
            models = self.qualifiers.len(),
            "Reflected model schema"
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AppConfig, AppRegistry, FieldDef, FieldKind, ModelDef};

    fn reader(registry: &AppRegistry, config: ReaderConfig) -> ModelReader<AppConfig> {
        ModelReader::from_registry(registry, config)
    }

    fn registry(apps: Vec<AppConfig>) -> AppRegistry {
        let mut registry = AppRegistry::new();
        for app in apps {
            registry.register(app).unwrap();
        }
        registry
    }

    #[test]
    fn test_user_models_survive_excluded_prefix() {
        let auth = AppConfig::new("contrib.auth")
            .with_model(ModelDef::new("Permission").with_field(FieldDef::auto_id()))
            .with_model(ModelDef::new("User").with_field(FieldDef::auto_id()))
            .with_model(ModelDef::new("GroupUserLink").with_field(FieldDef::auto_id()));
        let registry = registry(vec![auth]);
        let reader = reader(&registry, ReaderConfig::default());

        assert_eq!(
            reader.app_label_model_names(),
            &["auth.User".to_string(), "auth.GroupUserLink".to_string()]
        );
    }

    #[test]
    fn test_vendor_prefix_excluded() {
        let vendor = AppConfig::new("third_party_package.tags")
            .with_model(ModelDef::new("Tag").with_field(FieldDef::auto_id()));
        let registry = registry(vec![vendor]);
        let result = reader(&registry, ReaderConfig::default()).reflect_all();

        assert!(result.is_empty());
    }

    #[test]
    fn test_column_detail_defaults() {
        let app = AppConfig::new("polls").with_model(
            ModelDef::new("SampleData")
                .with_field(FieldDef::new("pk_id", FieldKind::AutoField).primary_key())
                .with_field(FieldDef::new("ppg", FieldKind::CharField).with_db_column("ppg_code"))
                .with_field(FieldDef::new("retailer", FieldKind::CharField).with_db_column("")),
        );
        let registry = registry(vec![app]);
        let reader = reader(&registry, ReaderConfig::default());
        let model = reader.get_model_by_name("polls", "SampleData").unwrap();
        let columns = reader.column_details(model);

        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].datatype, "AutoField");
        assert_eq!(columns[1].db_column_name, "ppg_code");
        assert_eq!(columns[2].db_column_name, "retailer");
        assert!(columns.iter().all(|c| c.related.is_none()));
        assert_eq!(reader.primary_key_fields(model), vec!["pk_id"]);
    }

    #[test]
    fn test_reverse_field_reports_forward_type() {
        let mut registry = registry(vec![
            AppConfig::new("accounts")
                .with_model(ModelDef::new("Account").with_field(FieldDef::auto_id())),
            AppConfig::new("blog").with_model(
                ModelDef::new("Post")
                    .with_field(FieldDef::auto_id())
                    .with_field(FieldDef::foreign_key("owner", "accounts", "Account")),
            ),
        ]);
        registry.populate_reverse_relations().unwrap();
        let reader = reader(&registry, ReaderConfig::default());
        let account = reader.get_model_by_name("accounts", "Account").unwrap();
        let columns = reader.column_details(account);

        let reverse = columns.iter().find(|c| c.field_name == "post").unwrap();
        assert_eq!(reverse.datatype, FOREIGN_KEY);
        let related = reverse.related.as_ref().unwrap();
        assert_eq!(related.related_model_name, "Post");
        assert_eq!(related.related_field_name, "owner");

        // Post declares `owner`, so the reverse edge joins on it
        let joins = reader.infer_joins(&columns);
        assert_eq!(joins.len(), 1);
        assert_eq!(joins[0].source_model_name, "Account");
        assert_eq!(joins[0].related_model_name, "Post");
        assert_eq!(joins[0].related_field, "owner");
    }

    /// A minimal adapter whose single field declares no internal type.
    #[derive(Clone)]
    struct Untyped;

    impl FieldDescriptor for Untyped {
        fn name(&self) -> &str {
            "payload"
        }
        fn db_column(&self) -> Option<&str> {
            None
        }
        fn internal_type(&self) -> Option<&str> {
            None
        }
        fn is_primary_key(&self) -> bool {
            false
        }
        fn relation(&self) -> Option<&crate::catalog::RelationTarget> {
            None
        }
    }

    #[derive(Clone)]
    struct Blob(Vec<Untyped>);

    impl crate::catalog::ModelDescriptor for Blob {
        type Field = Untyped;

        fn name(&self) -> &str {
            "Blob"
        }
        fn doc(&self) -> Option<&str> {
            None
        }
        fn db_table(&self) -> &str {
            "store_blob"
        }
        fn app_label(&self) -> &str {
            "store"
        }
        fn app_full_name(&self) -> &str {
            "store"
        }
        fn fields(&self) -> &[Untyped] {
            &self.0
        }
    }

    #[derive(Clone)]
    struct Store(Vec<Blob>);

    impl AppDescriptor for Store {
        type Model = Blob;

        fn full_name(&self) -> &str {
            "store"
        }
        fn name(&self) -> &str {
            "store"
        }
        fn label(&self) -> &str {
            "store"
        }
        fn models(&self) -> &[Blob] {
            &self.0
        }
    }

    #[test]
    fn test_untyped_field_reflects_as_na() {
        let reader = ModelReader::new(
            vec![Store(vec![Blob(vec![Untyped])])],
            ReaderConfig::default(),
        );
        let blob = reader.get_model_by_name("store", "Blob").unwrap();
        let columns = reader.column_details(blob);

        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].datatype, UNKNOWN_DATATYPE);
        assert_eq!(columns[0].db_column_name, "payload");
        assert!(columns[0].related.is_none());
        assert!(reader.infer_joins(&columns).is_empty());
    }

    #[test]
    fn test_unresolvable_relation_has_no_related_details() {
        let app = AppConfig::new("blog").with_model(
            ModelDef::new("Post")
                .with_field(FieldDef::auto_id())
                .with_field(FieldDef::foreign_key("author", "accounts", "User")),
        );
        let registry = registry(vec![app]);
        let reader = reader(&registry, ReaderConfig::default());
        let post = reader.get_model_by_name("blog", "Post").unwrap();
        let columns = reader.column_details(post);

        assert_eq!(columns[1].datatype, "ForeignKey");
        assert!(columns[1].related.is_none());
        assert!(reader.infer_joins(&columns).is_empty());
    }

    #[test]
    fn test_related_column_uses_remote_field_column() {
        let registry = registry(vec![
            AppConfig::new("accounts").with_model(
                ModelDef::new("Profile")
                    .with_field(FieldDef::auto_id())
                    .with_field(FieldDef::new("post", FieldKind::ManyToOneRel).with_db_column("post_ref")),
            ),
            AppConfig::new("blog").with_model(
                ModelDef::new("Post")
                    .with_field(FieldDef::auto_id())
                    .with_field(FieldDef::foreign_key("profile", "accounts", "Profile")),
            ),
        ]);
        let reader = reader(&registry, ReaderConfig::default());
        let post = reader.get_model_by_name("blog", "Post").unwrap();
        let related = reader.column_details(post)[1].related.clone().unwrap();

        assert_eq!(related.related_field_name, "post");
        assert_eq!(related.related_db_column_name, "post_ref");
        assert_eq!(related.related_db_table_name, "accounts_profile");
    }

    #[test]
    fn test_fallback_without_primary_key_emits_nothing() {
        let registry = registry(vec![
            AppConfig::new("logs").with_model(
                ModelDef::new("Line").with_field(FieldDef::new("text", FieldKind::TextField)),
            ),
            AppConfig::new("blog").with_model(
                ModelDef::new("Post")
                    .with_field(FieldDef::auto_id())
                    .with_field(FieldDef::foreign_key("line", "logs", "Line")),
            ),
        ]);
        let reader = reader(&registry, ReaderConfig::default());
        let post = reader.get_model_by_name("blog", "Post").unwrap();
        let columns = reader.column_details(post);

        assert!(columns[1].related.is_some());
        assert!(reader.infer_joins(&columns).is_empty());
    }

    #[test]
    fn test_non_foreign_key_relations_do_not_join() {
        let mut registry = registry(vec![
            AppConfig::new("tags").with_model(ModelDef::new("Tag").with_field(FieldDef::auto_id())),
            AppConfig::new("blog").with_model(
                ModelDef::new("Post")
                    .with_field(FieldDef::auto_id())
                    .with_field(FieldDef::related(
                        "tags",
                        FieldKind::ManyToManyField,
                        "tags",
                        "Tag",
                    )),
            ),
        ]);
        registry.populate_reverse_relations().unwrap();
        let result = reader(&registry, ReaderConfig::default()).reflect_all();

        assert_eq!(result.joins().count(), 0);
    }
}
