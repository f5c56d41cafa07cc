//! In-process store used when no database is configured, and by the tests.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
    bookings::{
        repo::BookingRepo,
        repo_types::{Booking, NewBooking, PopulatedBooking},
    },
    tutors::{
        repo::{TutorFilter, TutorRepo},
        repo_types::{NewTutor, Tutor},
    },
};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    tutors: Vec<Tutor>,
    bookings: Vec<Booking>,
}

impl Collections {
    fn populate(&self, booking: &Booking) -> Option<PopulatedBooking> {
        let tutor = self.tutors.iter().find(|t| t.id == booking.tutor)?;
        Some(booking.clone().populate(tutor.clone()))
    }
}

/// All three collections behind one lock, so joins see a consistent snapshot.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let c = self.inner.read().await;
        Ok(c.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let c = self.inner.read().await;
        Ok(c.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<Option<User>> {
        let mut c = self.inner.write().await;
        if c.users.iter().any(|u| u.email == new.email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            role: new.role,
            password_hash: new.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        c.users.push(user.clone());
        Ok(Some(user))
    }
}

#[async_trait]
impl TutorRepo for MemoryStore {
    async fn search(&self, filter: &TutorFilter) -> anyhow::Result<Vec<Tutor>> {
        let c = self.inner.read().await;
        Ok(c.tutors
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Tutor>> {
        let c = self.inner.read().await;
        Ok(c.tutors.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, new: NewTutor) -> anyhow::Result<Tutor> {
        let tutor = new.into_tutor(Uuid::new_v4());
        self.inner.write().await.tutors.push(tutor.clone());
        Ok(tutor)
    }
}

#[async_trait]
impl BookingRepo for MemoryStore {
    async fn create(&self, new: NewBooking) -> anyhow::Result<Booking> {
        let mut c = self.inner.write().await;
        if !c.tutors.iter().any(|t| t.id == new.tutor) {
            anyhow::bail!("booking references unknown tutor {}", new.tutor);
        }
        let booking = new.into_booking(Uuid::new_v4(), OffsetDateTime::now_utc());
        c.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn list_for_student(&self, student_id: Uuid) -> anyhow::Result<Vec<PopulatedBooking>> {
        let c = self.inner.read().await;
        // reverse insertion order is newest first
        Ok(c.bookings
            .iter()
            .rev()
            .filter(|b| b.student == student_id)
            .filter_map(|b| c.populate(b))
            .collect())
    }

    async fn find_for_student(
        &self,
        student_id: Uuid,
        booking_id: Uuid,
    ) -> anyhow::Result<Option<PopulatedBooking>> {
        let c = self.inner.read().await;
        Ok(c.bookings
            .iter()
            .find(|b| b.id == booking_id && b.student == student_id)
            .and_then(|b| c.populate(b)))
    }
}
