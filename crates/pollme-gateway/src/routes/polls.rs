//! Polls JSON API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pollme_polls::{
    Choice, ChoiceInput, EditPoll, NewPoll, Page, Poll, PollQuery, PollResults, PollSummary,
    PollView,
};

use crate::error::AppError;
use crate::json::{MessageResponse, PageQuery, SuccessResponse, VoteRequest};
use crate::user::CurrentUser;
use crate::AppState;

/// Poll routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/polls/", get(list_polls))
        .route("/polls/mine/", get(list_by_user))
        .route("/polls/add/", post(add_poll))
        .route("/polls/:id/", get(poll_detail))
        .route("/polls/:id/edit/", post(edit_poll))
        .route("/polls/:id/delete/", post(delete_poll))
        .route("/polls/:id/choice/add/", post(add_choice))
        .route("/polls/:id/vote/", post(vote))
        .route("/polls/:id/end/", post(end_poll))
        .route("/polls/choice/:id/edit/", post(edit_choice))
        .route("/polls/choice/:id/delete/", post(delete_choice))
}

async fn list_polls(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<PollQuery>,
) -> Result<Json<Page<PollSummary>>, AppError> {
    Ok(Json(state.polls.list_polls(&query)?))
}

async fn list_by_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<PollSummary>>, AppError> {
    Ok(Json(state.polls.list_by_user(&user, query.page.as_deref())?))
}

async fn add_poll(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<NewPoll>,
) -> Result<(StatusCode, Json<SuccessResponse<Poll>>), AppError> {
    let poll = state.polls.create_poll(&user, input)?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(poll))))
}

async fn poll_detail(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PollView>, AppError> {
    Ok(Json(state.polls.poll_detail(id)?))
}

async fn edit_poll(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
    Json(input): Json<EditPoll>,
) -> Result<Json<SuccessResponse<Poll>>, AppError> {
    let poll = state.polls.edit_poll(&user, id, input)?;
    Ok(Json(SuccessResponse::new(poll)))
}

async fn delete_poll(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.polls.delete_poll(&user, id)?;
    Ok(Json(MessageResponse::new("Poll deleted successfully.")))
}

async fn add_choice(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
    Json(input): Json<ChoiceInput>,
) -> Result<(StatusCode, Json<SuccessResponse<Choice>>), AppError> {
    let choice = state.polls.add_choice(&user, id, input)?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(choice))))
}

async fn edit_choice(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
    Json(input): Json<ChoiceInput>,
) -> Result<Json<SuccessResponse<Choice>>, AppError> {
    let choice = state.polls.edit_choice(&user, id, input)?;
    Ok(Json(SuccessResponse::new(choice)))
}

async fn delete_choice(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.polls.delete_choice(&user, id)?;
    Ok(Json(MessageResponse::new("Choice deleted successfully.")))
}

async fn vote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<PollResults>, AppError> {
    Ok(Json(state.polls.vote(&user, id, request.choice)?))
}

async fn end_poll(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Json<PollResults>, AppError> {
    Ok(Json(state.polls.end_poll(&user, id)?))
}
