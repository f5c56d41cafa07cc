pub mod app;
pub mod auth;
pub mod bookings;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod memory;
pub mod state;
pub mod tutors;

pub use app::{build_app, serve};
pub use state::AppState;
