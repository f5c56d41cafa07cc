use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    bookings::{
        dto::CreateBookingRequest,
        repo_types::{Booking, PopulatedBooking},
        services,
    },
    error::AppResult,
    extract::AppJson,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/:id", get(get_booking))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<Booking>)> {
    let booking = services::create(
        state.users.as_ref(),
        state.tutors.as_ref(),
        state.bookings.as_ref(),
        user.id,
        payload,
        OffsetDateTime::now_utc(),
    )
    .await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/bookings/{}", booking.id).parse::<HeaderValue>() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(booking)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<PopulatedBooking>>> {
    let bookings = services::list_for_user(state.bookings.as_ref(), user.id).await?;
    Ok(Json(bookings))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<PopulatedBooking>> {
    let booking = services::get_for_user(state.bookings.as_ref(), user.id, &id).await?;
    Ok(Json(booking))
}
