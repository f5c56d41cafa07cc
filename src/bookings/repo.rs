use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::bookings::repo_types::{
    Booking, BookingRow, BookingTutorRow, NewBooking, PopulatedBooking,
};

#[async_trait]
pub trait BookingRepo: Send + Sync {
    /// Inserts a booking as pending and unpaid.
    async fn create(&self, new: NewBooking) -> anyhow::Result<Booking>;
    /// The student's bookings with tutors populated, newest first.
    async fn list_for_student(&self, student_id: Uuid) -> anyhow::Result<Vec<PopulatedBooking>>;
    async fn find_for_student(
        &self,
        student_id: Uuid,
        booking_id: Uuid,
    ) -> anyhow::Result<Option<PopulatedBooking>>;
}

#[derive(Clone)]
pub struct PgBookingRepo {
    db: PgPool,
}

impl PgBookingRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const POPULATED_SELECT: &str = r#"
    SELECT b.id, b.student_id, b.scheduled_at, b.duration, b.status, b.payment_status,
           b.created_at,
           t.id AS tutor_id, t.name AS tutor_name, t.subject AS tutor_subject,
           t.curriculum AS tutor_curriculum, t.rating AS tutor_rating,
           t.sessions AS tutor_sessions, t.hourly_rate AS tutor_hourly_rate,
           t.online AS tutor_online, t.image AS tutor_image
    FROM bookings b
    JOIN tutors t ON t.id = b.tutor_id
"#;

#[async_trait]
impl BookingRepo for PgBookingRepo {
    async fn create(&self, new: NewBooking) -> anyhow::Result<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (student_id, tutor_id, scheduled_at, duration, status, payment_status)
            VALUES ($1, $2, $3, $4, 'pending', 'unpaid')
            RETURNING id, student_id, tutor_id, scheduled_at, duration, status, payment_status, created_at
            "#,
        )
        .bind(new.student)
        .bind(new.tutor)
        .bind(new.date)
        .bind(new.duration)
        .fetch_one(&self.db)
        .await?;
        Booking::try_from(row)
    }

    async fn list_for_student(&self, student_id: Uuid) -> anyhow::Result<Vec<PopulatedBooking>> {
        let sql = format!(
            "{POPULATED_SELECT} WHERE b.student_id = $1 ORDER BY b.created_at DESC, b.id DESC"
        );
        let rows = sqlx::query_as::<_, BookingTutorRow>(&sql)
            .bind(student_id)
            .fetch_all(&self.db)
            .await?;
        rows.into_iter().map(PopulatedBooking::try_from).collect()
    }

    async fn find_for_student(
        &self,
        student_id: Uuid,
        booking_id: Uuid,
    ) -> anyhow::Result<Option<PopulatedBooking>> {
        let sql = format!("{POPULATED_SELECT} WHERE b.id = $1 AND b.student_id = $2");
        let row = sqlx::query_as::<_, BookingTutorRow>(&sql)
            .bind(booking_id)
            .bind(student_id)
            .fetch_optional(&self.db)
            .await?;
        row.map(PopulatedBooking::try_from).transpose()
    }
}
