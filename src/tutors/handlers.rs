use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    extract::AppJson,
    state::AppState,
    tutors::{
        dto::{CreateTutorRequest, SearchParams},
        repo_types::Tutor,
        services,
    },
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/tutors", get(list_tutors))
        .route("/tutors/search", get(search_tutors))
        .route("/tutors/:id", get(get_tutor))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/tutors", post(create_tutor))
}

#[instrument(skip(state))]
pub async fn list_tutors(State(state): State<AppState>) -> AppResult<Json<Vec<Tutor>>> {
    let tutors = services::search(state.tutors.as_ref(), "", "").await?;
    Ok(Json(tutors))
}

#[instrument(skip(state))]
pub async fn search_tutors(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Tutor>>> {
    let tutors = services::search(state.tutors.as_ref(), &params.q, &params.curriculum).await?;
    Ok(Json(tutors))
}

#[instrument(skip(state))]
pub async fn get_tutor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Tutor>> {
    let tutor = services::list_by_id(state.tutors.as_ref(), &id).await?;
    Ok(Json(tutor))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_tutor(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateTutorRequest>,
) -> AppResult<(StatusCode, Json<Tutor>)> {
    let tutor = services::create(state.tutors.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(tutor)))
}
