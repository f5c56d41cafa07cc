use serde::Deserialize;

/// Request body of `POST /bookings`. `student` is optional and, when sent,
/// must be the caller's own id. Status fields are never read from the client.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBookingRequest {
    pub student: Option<String>,
    pub tutor: Option<String>,
    pub date: Option<String>,
    pub duration: Option<i32>, // minutes
}
