//! Schema reader endpoints.

use axum::{extract::State, response::Html, routing::get, Json, Router};
use pollme_core::reader::SchemaResult;

use crate::error::AppError;
use crate::html;
use crate::AppState;

/// Schema reader routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/get_models_data/", get(get_models_data))
        .route("/view_models_list/", get(view_models_list))
        .route("/view_models_schema/", get(view_models_schema))
}

/// Reflected schema as JSON.
async fn get_models_data(State(state): State<AppState>) -> Json<SchemaResult> {
    Json(state.reader().reflect_all())
}

/// Table listing page.
async fn view_models_list(State(state): State<AppState>) -> Html<String> {
    Html(html::models_list_page(&state.reader().reflect_all()))
}

/// Schema visualization page.
async fn view_models_schema(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(html::schema_page(&state.reader().reflect_all())?))
}
