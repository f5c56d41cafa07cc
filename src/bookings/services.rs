use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    bookings::{
        dto::CreateBookingRequest,
        repo::BookingRepo,
        repo_types::{Booking, NewBooking, PopulatedBooking},
    },
    auth::repo::UserRepo,
    error::{AppError, AppResult},
    tutors::repo::TutorRepo,
};

/// Checks a booking request for `caller` against the clock reading `now`.
pub fn validate(
    caller: Uuid,
    req: &CreateBookingRequest,
    now: OffsetDateTime,
) -> AppResult<NewBooking> {
    if let Some(student) = req.student.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if student.parse::<Uuid>().ok() != Some(caller) {
            warn!(%caller, %student, "booking on behalf of another student");
            return Err(AppError::Auth(
                "Cannot create a booking for another student".into(),
            ));
        }
    }

    let tutor = req
        .tutor
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("tutor is required"))?
        .parse::<Uuid>()
        .map_err(|_| AppError::validation("tutor must be a valid id"))?;

    let date = req
        .date
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("date is required"))?;
    let date = OffsetDateTime::parse(date, &Rfc3339)
        .map_err(|_| AppError::validation("date must be an RFC 3339 timestamp"))?;
    if date <= now {
        return Err(AppError::validation("date must be in the future"));
    }

    let duration = req
        .duration
        .ok_or_else(|| AppError::validation("duration is required"))?;
    if duration <= 0 {
        return Err(AppError::validation("duration must be a positive number of minutes"));
    }

    Ok(NewBooking {
        student: caller,
        tutor,
        date,
        duration,
    })
}

pub async fn create(
    users: &dyn UserRepo,
    tutors: &dyn TutorRepo,
    bookings: &dyn BookingRepo,
    caller: Uuid,
    req: CreateBookingRequest,
    now: OffsetDateTime,
) -> AppResult<Booking> {
    let new = validate(caller, &req, now)?;
    if users.find_by_id(caller).await?.is_none() {
        warn!(%caller, "booking from unknown user");
        return Err(AppError::Auth("User not found".into()));
    }
    if tutors.find_by_id(new.tutor).await?.is_none() {
        return Err(AppError::NotFound("Tutor not found".into()));
    }
    let booking = bookings.create(new).await?;
    info!(
        booking_id = %booking.id,
        student_id = %booking.student,
        tutor_id = %booking.tutor,
        duration = booking.duration,
        "booking created"
    );
    Ok(booking)
}

pub async fn list_for_user(
    bookings: &dyn BookingRepo,
    user_id: Uuid,
) -> AppResult<Vec<PopulatedBooking>> {
    Ok(bookings.list_for_student(user_id).await?)
}

pub async fn get_for_user(
    bookings: &dyn BookingRepo,
    user_id: Uuid,
    booking_id: &str,
) -> AppResult<PopulatedBooking> {
    let not_found = || AppError::NotFound("Booking not found".into());
    let booking_id: Uuid = booking_id.trim().parse().map_err(|_| not_found())?;
    bookings
        .find_for_student(user_id, booking_id)
        .await?
        .ok_or_else(not_found)
}
