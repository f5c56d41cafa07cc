use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    auth::{
        jwt::JwtKeys,
        repo::{PgUserRepo, UserRepo},
    },
    bookings::repo::{BookingRepo, PgBookingRepo},
    config::AppConfig,
    db,
    memory::MemoryStore,
    tutors::repo::{PgTutorRepo, TutorRepo},
};

/// Everything a handler needs. Built once at startup, closed at shutdown.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub tutors: Arc<dyn TutorRepo>,
    pub bookings: Arc<dyn BookingRepo>,
    pool: Option<PgPool>,
}

impl AppState {
    /// Connects to Postgres when `DATABASE_URL` is set, otherwise keeps data in memory.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let Some(url) = config.database_url.clone() else {
            tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on exit");
            return Ok(Self::in_memory(config));
        };

        let pool = db::connect(&url).await?;
        db::migrate(&pool).await?;

        Ok(Self {
            keys: JwtKeys::new(&config.jwt),
            config: Arc::new(config),
            users: Arc::new(PgUserRepo::new(pool.clone())),
            tutors: Arc::new(PgTutorRepo::new(pool.clone())),
            bookings: Arc::new(PgBookingRepo::new(pool.clone())),
            pool: Some(pool),
        })
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            keys: JwtKeys::new(&config.jwt),
            config: Arc::new(config),
            users: store.clone(),
            tutors: store.clone(),
            bookings: store,
            pool: None,
        }
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            tracing::info!("database pool closed");
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
