//! Reflected schema types.
//!
//! Field names follow the JSON contract consumed by the model-data endpoint
//! and the visualization pages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Join type emitted for foreign-key edges.
pub const FOREIGN_KEY: &str = "ForeignKey";

/// Type tag used when a field declares no internal type.
pub const UNKNOWN_DATATYPE: &str = "NA";

/// Key of the ordered model-name list inside an [`AppSchema`]. A model of
/// this name would collide with it and is left out of the schema.
pub const APP_MODELS_KEY: &str = "lst_app_models";

/// Column details of one model field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDetail {
    pub field_name: String,
    pub db_column_name: String,
    pub datatype: String,
    pub model_name: String,
    pub app_label: String,
    pub app_full_name: String,
    /// Related-model attributes, for relation fields with a resolvable target.
    #[serde(flatten)]
    pub related: Option<RelatedColumn>,
}

impl ColumnDetail {
    /// Check if the column is a foreign key.
    pub fn is_foreign_key(&self) -> bool {
        self.datatype == FOREIGN_KEY
    }
}

/// The related side of a relation column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedColumn {
    pub related_app_full_name: String,
    pub related_app_label: String,
    pub related_model_name: String,
    pub related_db_table_name: String,
    pub related_field_name: String,
    pub related_db_column_name: String,
}

impl RelatedColumn {
    /// The `app_label.ModelName` qualifier of the related model.
    pub fn qualifier(&self) -> String {
        format!("{}.{}", self.related_app_label, self.related_model_name)
    }
}

/// An inferred join between two retained models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinEdge {
    #[serde(rename = "type")]
    pub join_type: String,
    pub source_app_label: String,
    pub source_app_full_name: String,
    pub source_model_name: String,
    pub related_app_label: String,
    pub related_app_full_name: String,
    pub related_model_name: String,
    pub related_field: String,
}

/// Everything reflected about one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDetail {
    pub app_full_name: String,
    /// App label.
    pub app_name: String,
    pub model_name: String,
    pub db_table_name: String,
    pub model_doc_string: Option<String>,
    pub lst_primary_fields: Vec<String>,
    pub lst_column_details: Vec<ColumnDetail>,
    pub lst_joins_details: Vec<JoinEdge>,
}

/// Models of one app, keyed by model name, plus their ordered names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSchema {
    #[serde(flatten)]
    pub models: BTreeMap<String, ModelDetail>,
    pub lst_app_models: Vec<String>,
}

impl AppSchema {
    /// Models in registration order.
    pub fn ordered_models(&self) -> impl Iterator<Item = &ModelDetail> {
        self.lst_app_models
            .iter()
            .filter_map(|name| self.models.get(name))
    }
}

/// The reflected schema of every visible app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaResult {
    /// App full names in registry order.
    pub lst_apps: Vec<String>,
    /// App full name to its models.
    pub dct_data: BTreeMap<String, AppSchema>,
}

impl SchemaResult {
    /// Check if no app is visible.
    pub fn is_empty(&self) -> bool {
        self.lst_apps.is_empty()
    }

    /// Get the detail of a model by app full name and model name.
    pub fn model(&self, app_full_name: &str, model_name: &str) -> Option<&ModelDetail> {
        self.dct_data
            .get(app_full_name)
            .and_then(|app| app.models.get(model_name))
    }

    /// All models in app order, then registration order.
    pub fn models(&self) -> impl Iterator<Item = &ModelDetail> {
        self.lst_apps
            .iter()
            .filter_map(|app| self.dct_data.get(app))
            .flat_map(|app| app.ordered_models())
    }

    /// All join edges in model order.
    pub fn joins(&self) -> impl Iterator<Item = &JoinEdge> {
        self.models().flat_map(|m| m.lst_joins_details.iter())
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn column(related: Option<RelatedColumn>) -> ColumnDetail {
        ColumnDetail {
            field_name: "author".into(),
            db_column_name: "author".into(),
            datatype: FOREIGN_KEY.into(),
            model_name: "Post".into(),
            app_label: "blog".into(),
            app_full_name: "blog".into(),
            related,
        }
    }

    #[test]
    fn test_empty_result_shape() {
        let value = serde_json::to_value(SchemaResult::default()).unwrap();
        assert_eq!(value, json!({"lst_apps": [], "dct_data": {}}));
    }

    #[test]
    fn test_column_without_related_omits_keys() {
        let value = serde_json::to_value(column(None)).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 6);
        assert!(!object.contains_key("related_model_name"));
    }

    #[test]
    fn test_column_related_keys_are_flat() {
        let related = RelatedColumn {
            related_app_full_name: "accounts".into(),
            related_app_label: "accounts".into(),
            related_model_name: "User".into(),
            related_db_table_name: "accounts_user".into(),
            related_field_name: "posts".into(),
            related_db_column_name: "posts".into(),
        };
        let value = serde_json::to_value(column(Some(related))).unwrap();

        assert_eq!(value["related_model_name"], "User");
        assert_eq!(value["related_field_name"], "posts");
        assert_eq!(value["datatype"], "ForeignKey");
    }

    #[test]
    fn test_join_type_key() {
        let edge = JoinEdge {
            join_type: FOREIGN_KEY.into(),
            source_app_label: "blog".into(),
            source_app_full_name: "blog".into(),
            source_model_name: "Post".into(),
            related_app_label: "accounts".into(),
            related_app_full_name: "accounts".into(),
            related_model_name: "User".into(),
            related_field: "posts".into(),
        };
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(value["type"], "ForeignKey");
    }

    #[test]
    fn test_app_models_are_flattened() {
        let detail = ModelDetail {
            app_full_name: "blog".into(),
            app_name: "blog".into(),
            model_name: "Post".into(),
            db_table_name: "blog_post".into(),
            model_doc_string: None,
            lst_primary_fields: vec!["id".into()],
            lst_column_details: vec![],
            lst_joins_details: vec![],
        };
        let mut app = AppSchema::default();
        app.models.insert("Post".into(), detail);
        app.lst_app_models.push("Post".into());

        let value = serde_json::to_value(&app).unwrap();
        assert_eq!(value["lst_app_models"], json!(["Post"]));
        assert_eq!(value["Post"]["db_table_name"], "blog_post");
        assert!(value["Post"]["model_doc_string"].is_null());
    }
}
