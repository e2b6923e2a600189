//! Genre and sample-data tree routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pollme_polls::{
    Genre, NewGenre, NewSampleNode, SampleData, SampleNode, SampleTree, TreeNode,
};

use crate::error::AppError;
use crate::json::{MessageResponse, SuccessResponse, TreeQuery};
use crate::user::CurrentUser;
use crate::AppState;

/// Hierarchy routes. Reads are public, writes need a user.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/polls/genres/", get(list_genres))
        .route("/polls/genres/add/", post(add_genre))
        .route("/polls/genres/:id/delete/", post(delete_genre))
        .route("/polls/sample_data/", get(sample_roots))
        .route("/polls/sample_data/add/", post(add_sample_data))
        .route("/polls/sample_data/nodes/add/", post(add_sample_node))
        .route("/polls/sample_tree/", get(sample_tree))
}

async fn list_genres(
    State(state): State<AppState>,
) -> Result<Json<Vec<TreeNode<Genre>>>, AppError> {
    Ok(Json(state.polls.genres()?))
}

async fn add_genre(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(input): Json<NewGenre>,
) -> Result<(StatusCode, Json<SuccessResponse<Genre>>), AppError> {
    let genre = state.polls.add_genre(input)?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(genre))))
}

async fn delete_genre(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.polls.delete_genre(id)?;
    Ok(Json(MessageResponse::new("Genre deleted successfully.")))
}

async fn sample_roots(
    State(state): State<AppState>,
) -> Result<Json<Vec<SampleTree>>, AppError> {
    Ok(Json(state.polls.sample_roots()?))
}

async fn add_sample_data(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(row): Json<SampleData>,
) -> Result<(StatusCode, Json<SuccessResponse<SampleData>>), AppError> {
    let row = state.polls.add_sample_data(row)?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(row))))
}

async fn add_sample_node(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(input): Json<NewSampleNode>,
) -> Result<(StatusCode, Json<SuccessResponse<SampleNode>>), AppError> {
    let node = state.polls.add_sample_node(input)?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(node))))
}

async fn sample_tree(
    State(state): State<AppState>,
    Query(query): Query<TreeQuery>,
) -> Result<Json<Vec<SampleTree>>, AppError> {
    Ok(Json(state.polls.sample_tree(query.root)?))
}
