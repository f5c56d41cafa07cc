use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::tutors::repo_types::{Curriculum, NewTutor, Tutor, TutorRow};

/// Directory listing criteria. An empty `query` and `None` curriculum match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TutorFilter {
    pub query: String,
    pub curriculum: Option<Curriculum>,
}

impl TutorFilter {
    pub fn new(query: &str, curriculum: Option<Curriculum>) -> Self {
        Self {
            query: query.to_string(),
            curriculum,
        }
    }

    /// Case-insensitive substring on name or subject, plus curriculum equality.
    pub fn matches(&self, tutor: &Tutor) -> bool {
        if let Some(c) = self.curriculum {
            if tutor.curriculum != c {
                return false;
            }
        }
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        tutor.name.to_lowercase().contains(&needle)
            || tutor.subject.to_lowercase().contains(&needle)
    }
}

#[async_trait]
pub trait TutorRepo: Send + Sync {
    /// Matching tutors in insertion order.
    async fn search(&self, filter: &TutorFilter) -> anyhow::Result<Vec<Tutor>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Tutor>>;
    async fn create(&self, new: NewTutor) -> anyhow::Result<Tutor>;
}

#[derive(Clone)]
pub struct PgTutorRepo {
    db: PgPool,
}

impl PgTutorRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TutorRepo for PgTutorRepo {
    async fn search(&self, filter: &TutorFilter) -> anyhow::Result<Vec<Tutor>> {
        // strpos instead of ILIKE so '%' and '_' in the query stay literal
        let rows = sqlx::query_as::<_, TutorRow>(
            r#"
            SELECT id, name, subject, curriculum, rating, sessions, hourly_rate, online, image
            FROM tutors
            WHERE ($1 = ''
                   OR strpos(lower(name), lower($1)) > 0
                   OR strpos(lower(subject), lower($1)) > 0)
              AND ($2::text IS NULL OR curriculum = $2)
            ORDER BY created_at, id
            "#,
        )
        .bind(&filter.query)
        .bind(filter.curriculum.map(|c| c.as_str()))
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(Tutor::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Tutor>> {
        let row = sqlx::query_as::<_, TutorRow>(
            r#"
            SELECT id, name, subject, curriculum, rating, sessions, hourly_rate, online, image
            FROM tutors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(Tutor::try_from).transpose()
    }

    async fn create(&self, new: NewTutor) -> anyhow::Result<Tutor> {
        let row = sqlx::query_as::<_, TutorRow>(
            r#"
            INSERT INTO tutors (name, subject, curriculum, rating, sessions, hourly_rate, online, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, subject, curriculum, rating, sessions, hourly_rate, online, image
            "#,
        )
        .bind(&new.name)
        .bind(&new.subject)
        .bind(new.curriculum.as_str())
        .bind(new.rating)
        .bind(new.sessions)
        .bind(new.hourly_rate)
        .bind(new.online)
        .bind(&new.image)
        .fetch_one(&self.db)
        .await?;
        Tutor::try_from(row)
    }
}
