//! Output formatters for reflected schemas.

use clap::ValueEnum;
use comfy_table::Table;
use pollme_core::reader::{ColumnDetail, ModelDetail, SchemaResult};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

const COLUMN_HEADER: [&str; 7] = ["app", "model", "field", "column", "type", "primary", "references"];
const APP_HEADER: [&str; 3] = ["app", "models", "tables"];
const JOIN_HEADER: [&str; 4] = ["source", "target", "type", "field"];

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format every column of every model.
    fn format_schema(&self, schema: &SchemaResult) -> String;

    /// Format the app list with model counts.
    fn format_apps(&self, schema: &SchemaResult) -> String;

    /// Format the inferred joins.
    fn format_joins(&self, schema: &SchemaResult) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_schema(&self, schema: &SchemaResult) -> String {
        if schema.is_empty() {
            return "No models".to_string();
        }
        table(&COLUMN_HEADER, column_rows(schema))
    }

    fn format_apps(&self, schema: &SchemaResult) -> String {
        if schema.is_empty() {
            return "No apps".to_string();
        }
        table(&APP_HEADER, app_rows(schema))
    }

    fn format_joins(&self, schema: &SchemaResult) -> String {
        let rows = join_rows(schema);
        if rows.is_empty() {
            return "No joins".to_string();
        }
        table(&JOIN_HEADER, rows)
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_schema(&self, schema: &SchemaResult) -> String {
        schema
            .to_json_pretty()
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    fn format_apps(&self, schema: &SchemaResult) -> String {
        let apps: Vec<serde_json::Value> = schema
            .lst_apps
            .iter()
            .filter_map(|name| schema.dct_data.get(name).map(|app| (name, app)))
            .map(|(name, app)| {
                serde_json::json!({
                    "app": name,
                    "models": app.lst_app_models,
                })
            })
            .collect();
        serde_json::to_string_pretty(&apps).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_joins(&self, schema: &SchemaResult) -> String {
        let joins: Vec<_> = schema.joins().collect();
        serde_json::to_string_pretty(&joins).unwrap_or_else(|_| "[]".to_string())
    }
}

/// CSV formatter.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_schema(&self, schema: &SchemaResult) -> String {
        csv(&COLUMN_HEADER, column_rows(schema))
    }

    fn format_apps(&self, schema: &SchemaResult) -> String {
        csv(&APP_HEADER, app_rows(schema))
    }

    fn format_joins(&self, schema: &SchemaResult) -> String {
        csv(&JOIN_HEADER, join_rows(schema))
    }
}

fn column_rows(schema: &SchemaResult) -> Vec<Vec<String>> {
    schema
        .models()
        .flat_map(|model| {
            model
                .lst_column_details
                .iter()
                .map(move |column| column_row(model, column))
        })
        .collect()
}

fn column_row(model: &ModelDetail, column: &ColumnDetail) -> Vec<String> {
    let primary = model.lst_primary_fields.contains(&column.field_name);
    let references = column
        .related
        .as_ref()
        .map(|r| format!("{}.{}", r.related_db_table_name, r.related_db_column_name))
        .unwrap_or_default();

    vec![
        model.app_full_name.clone(),
        model.model_name.clone(),
        column.field_name.clone(),
        column.db_column_name.clone(),
        column.datatype.clone(),
        if primary { "yes" } else { "" }.to_string(),
        references,
    ]
}

fn app_rows(schema: &SchemaResult) -> Vec<Vec<String>> {
    schema
        .lst_apps
        .iter()
        .filter_map(|name| schema.dct_data.get(name).map(|app| (name, app)))
        .map(|(name, app)| {
            let tables: Vec<&str> = app
                .ordered_models()
                .map(|m| m.db_table_name.as_str())
                .collect();
            vec![
                name.clone(),
                app.lst_app_models.len().to_string(),
                tables.join(" "),
            ]
        })
        .collect()
}

fn join_rows(schema: &SchemaResult) -> Vec<Vec<String>> {
    schema
        .joins()
        .map(|edge| {
            vec![
                format!("{}.{}", edge.source_app_label, edge.source_model_name),
                format!("{}.{}", edge.related_app_label, edge.related_model_name),
                edge.join_type.clone(),
                edge.related_field.clone(),
            ]
        })
        .collect()
}

fn table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut table = Table::new();
    table.set_header(header.to_vec());
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

fn csv(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut lines = vec![header.join(",")];
    for row in rows {
        let cells: Vec<String> = row.iter().map(|cell| escape_csv(cell)).collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// Quote a CSV cell when it contains a separator, quote or newline.
fn escape_csv(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollme_core::catalog::{AppConfig, AppRegistry, FieldDef, FieldKind, ModelDef};
    use pollme_core::reader::{ModelReader, ReaderConfig};

    fn schema() -> SchemaResult {
        let mut registry = AppRegistry::new()
            .with_app(
                AppConfig::new("accounts").with_model(
                    ModelDef::new("User")
                        .with_field(FieldDef::auto_id())
                        .with_field(FieldDef::new("name", FieldKind::CharField)),
                ),
            )
            .unwrap()
            .with_app(
                AppConfig::new("blog").with_model(
                    ModelDef::new("Post")
                        .with_field(FieldDef::auto_id())
                        .with_field(FieldDef::foreign_key("author", "accounts", "User").with_related_name("posts")),
                ),
            )
            .unwrap();
        registry.populate_reverse_relations().unwrap();
        ModelReader::from_registry(&registry, ReaderConfig::default()).reflect_all()
    }

    #[test]
    fn test_csv_schema() {
        let output = CsvFormatter.format_schema(&schema());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "app,model,field,column,type,primary,references");
        assert_eq!(lines[1], "accounts,User,id,id,BigAutoField,yes,");
        assert!(lines.contains(&"blog,Post,author,author,ForeignKey,,accounts_user.posts"));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_table_joins() {
        let output = TableFormatter.format_joins(&schema());
        assert!(output.contains("blog.Post"));
        assert!(output.contains("posts"));
    }

    #[test]
    fn test_empty_schema() {
        let empty = SchemaResult::default();
        assert_eq!(TableFormatter.format_apps(&empty), "No apps");
        assert_eq!(CsvFormatter.format_apps(&empty), "app,models,tables");
        assert_eq!(JsonFormatter.format_joins(&empty), "[]");
    }

    #[test]
    fn test_json_apps() {
        let output = JsonFormatter.format_apps(&schema());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[1]["app"], "blog");
        assert_eq!(value[1]["models"][0], "Post");
    }
}
