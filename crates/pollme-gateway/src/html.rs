//! Server-rendered pages over a reflected schema.

use pollme_core::reader::{ModelDetail, SchemaResult};

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem; color: #222; }
h1 { font-size: 1.6rem; }
h2 { margin-top: 2rem; font-size: 1.2rem; }
table { border-collapse: collapse; margin: 0.5rem 0 1.5rem; }
th, td { border: 1px solid #ccc; padding: 0.25rem 0.6rem; text-align: left; }
th { background: #f3f3f3; }
.pk { font-weight: bold; }
.doc { color: #666; font-style: italic; }
.models { display: flex; flex-wrap: wrap; gap: 1rem; }
.model { border: 1px solid #4a6fa5; border-radius: 4px; min-width: 14rem; }
.model h3 { margin: 0; padding: 0.4rem 0.6rem; background: #4a6fa5; color: #fff; font-size: 1rem; }
.model ul { list-style: none; margin: 0; padding: 0.4rem 0.6rem; }
.model li span { color: #888; float: right; margin-left: 1rem; }
"#;

/// Escape text for HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape(title),
        css = CSS,
        body = body,
    )
}

/// Table listing of every reflected model and its columns.
pub fn models_list_page(schema: &SchemaResult) -> String {
    let mut body = String::new();

    if schema.is_empty() {
        body.push_str("<p>No models to show.</p>\n");
    }

    for app_name in &schema.lst_apps {
        let Some(app) = schema.dct_data.get(app_name) else {
            continue;
        };
        body.push_str(&format!("<h2>{}</h2>\n", escape(app_name)));

        for model in app.ordered_models() {
            body.push_str(&model_table(model));
        }
    }

    layout("Database Tables List", &body)
}

fn model_table(model: &ModelDetail) -> String {
    let mut rows = String::new();
    for column in &model.lst_column_details {
        let is_pk = model.lst_primary_fields.contains(&column.field_name);
        let related = column
            .related
            .as_ref()
            .map(|r| format!("{}.{}", r.related_db_table_name, r.related_db_column_name))
            .unwrap_or_default();

        rows.push_str(&format!(
            "<tr{class}><td>{field}</td><td>{column}</td><td>{datatype}</td><td>{related}</td></tr>\n",
            class = if is_pk { r#" class="pk""# } else { "" },
            field = escape(&column.field_name),
            column = escape(&column.db_column_name),
            datatype = escape(&column.datatype),
            related = escape(&related),
        ));
    }

    let doc = model
        .model_doc_string
        .as_deref()
        .map(|doc| format!("<p class=\"doc\">{}</p>\n", escape(doc)))
        .unwrap_or_default();

    format!(
        "<h3>{model} <small>({table})</small></h3>\n{doc}<table>\n\
         <tr><th>Field</th><th>Column</th><th>Type</th><th>References</th></tr>\n{rows}</table>\n",
        model = escape(&model.model_name),
        table = escape(&model.db_table_name),
        doc = doc,
        rows = rows,
    )
}

/// Model boxes, the join list and the schema as embedded JSON.
pub fn schema_page(schema: &SchemaResult) -> Result<String, serde_json::Error> {
    let mut boxes = String::new();
    for model in schema.models() {
        let fields: String = model
            .lst_column_details
            .iter()
            .map(|c| {
                format!(
                    "<li>{}<span>{}</span></li>",
                    escape(&c.field_name),
                    escape(&c.datatype)
                )
            })
            .collect();

        boxes.push_str(&format!(
            "<div class=\"model\" id=\"{app}.{model}\"><h3>{app}.{model}</h3><ul>{fields}</ul></div>\n",
            app = escape(&model.app_name),
            model = escape(&model.model_name),
            fields = fields,
        ));
    }

    let mut joins = String::new();
    for edge in schema.joins() {
        joins.push_str(&format!(
            "<li>{}.{} &rarr; {}.{} on {}</li>\n",
            escape(&edge.source_app_label),
            escape(&edge.source_model_name),
            escape(&edge.related_app_label),
            escape(&edge.related_model_name),
            escape(&edge.related_field),
        ));
    }
    if joins.is_empty() {
        joins.push_str("<li>No joins.</li>\n");
    }

    // "</" would end the script element early
    let data = serde_json::to_string(schema)?.replace("</", "<\\/");

    let body = format!(
        "<div class=\"models\">\n{boxes}</div>\n<h2>Joins</h2>\n<ul class=\"joins\">\n{joins}</ul>\n\
         <script type=\"application/json\" id=\"schema-data\">{data}</script>\n",
    );

    Ok(layout("Database Schema Visualization", &body))
}
