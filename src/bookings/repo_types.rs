use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::tutors::repo_types::{Tutor, TutorRow};

/// Lifecycle of a session. Every booking starts `Pending`; nothing moves it yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => anyhow::bail!("unknown booking status {other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            other => anyhow::bail!("unknown payment status {other:?}"),
        }
    }
}

/// A tutoring session. `T` is the tutor reference: its id, or the full
/// profile once populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking<T = Uuid> {
    pub id: Uuid,
    pub student: Uuid,
    pub tutor: T,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub duration: i32, // minutes
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub type PopulatedBooking = Booking<Tutor>;

impl Booking {
    pub fn populate(self, tutor: Tutor) -> PopulatedBooking {
        Booking {
            id: self.id,
            student: self.student,
            tutor,
            date: self.date,
            duration: self.duration,
            status: self.status,
            payment_status: self.payment_status,
            created_at: self.created_at,
        }
    }
}

/// Validated input for a new booking. Status fields are not settable.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub student: Uuid,
    pub tutor: Uuid,
    pub date: OffsetDateTime,
    pub duration: i32,
}

impl NewBooking {
    pub fn into_booking(self, id: Uuid, created_at: OffsetDateTime) -> Booking {
        Booking {
            id,
            student: self.student,
            tutor: self.tutor,
            date: self.date,
            duration: self.duration,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub scheduled_at: OffsetDateTime,
    pub duration: i32,
    pub status: String,
    pub payment_status: String,
    pub created_at: OffsetDateTime,
}

impl TryFrom<BookingRow> for Booking {
    type Error = anyhow::Error;

    fn try_from(r: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            student: r.student_id,
            tutor: r.tutor_id,
            date: r.scheduled_at,
            duration: r.duration,
            status: r.status.parse()?,
            payment_status: r.payment_status.parse()?,
            created_at: r.created_at,
        })
    }
}

/// A booking joined with its tutor; tutor columns carry a `tutor_` prefix.
#[derive(Debug, FromRow)]
pub struct BookingTutorRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub scheduled_at: OffsetDateTime,
    pub duration: i32,
    pub status: String,
    pub payment_status: String,
    pub created_at: OffsetDateTime,
    pub tutor_id: Uuid,
    pub tutor_name: String,
    pub tutor_subject: String,
    pub tutor_curriculum: String,
    pub tutor_rating: f64,
    pub tutor_sessions: i32,
    pub tutor_hourly_rate: f64,
    pub tutor_online: bool,
    pub tutor_image: Option<String>,
}

impl TryFrom<BookingTutorRow> for PopulatedBooking {
    type Error = anyhow::Error;

    fn try_from(r: BookingTutorRow) -> Result<Self, Self::Error> {
        let tutor = Tutor::try_from(TutorRow {
            id: r.tutor_id,
            name: r.tutor_name,
            subject: r.tutor_subject,
            curriculum: r.tutor_curriculum,
            rating: r.tutor_rating,
            sessions: r.tutor_sessions,
            hourly_rate: r.tutor_hourly_rate,
            online: r.tutor_online,
            image: r.tutor_image,
        })?;
        let booking = Booking::try_from(BookingRow {
            id: r.id,
            student_id: r.student_id,
            tutor_id: r.tutor_id,
            scheduled_at: r.scheduled_at,
            duration: r.duration,
            status: r.status,
            payment_status: r.payment_status,
            created_at: r.created_at,
        })?;
        Ok(booking.populate(tutor))
    }
}
