use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    tutors::{
        dto::CreateTutorRequest,
        repo::{TutorFilter, TutorRepo},
        repo_types::{Curriculum, NewTutor, Tutor},
    },
};

/// Parses an optional curriculum filter; blank means "any".
pub fn parse_curriculum_filter(raw: &str) -> AppResult<Option<Curriculum>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    raw.parse::<Curriculum>()
        .map(Some)
        .map_err(|_| AppError::validation("curriculum must be one of IGCSE, CBC, GCSE"))
}

pub async fn search(tutors: &dyn TutorRepo, query: &str, curriculum: &str) -> AppResult<Vec<Tutor>> {
    let filter = TutorFilter::new(query, parse_curriculum_filter(curriculum)?);
    let found = tutors.search(&filter).await?;
    debug!(query = %filter.query, curriculum = ?filter.curriculum, count = found.len(), "tutor search");
    Ok(found)
}

pub async fn list_by_id(tutors: &dyn TutorRepo, id: &str) -> AppResult<Tutor> {
    let not_found = || AppError::NotFound("Tutor not found".into());
    let id: Uuid = id.trim().parse().map_err(|_| not_found())?;
    tutors.find_by_id(id).await?.ok_or_else(not_found)
}

pub async fn create(tutors: &dyn TutorRepo, req: CreateTutorRequest) -> AppResult<Tutor> {
    let name = req.name.trim();
    let subject = req.subject.trim();
    if name.is_empty() || subject.is_empty() || req.curriculum.trim().is_empty() {
        return Err(AppError::validation(
            "name, subject and curriculum are required",
        ));
    }
    let curriculum = parse_curriculum_filter(&req.curriculum)?
        .ok_or_else(|| AppError::validation("curriculum is required"))?;

    let hourly_rate = req
        .hourly_rate
        .ok_or_else(|| AppError::validation("hourlyRate is required"))?;
    if !hourly_rate.is_finite() || hourly_rate < 0.0 {
        return Err(AppError::validation("hourlyRate must be a non-negative number"));
    }

    let mut new = NewTutor::new(name, subject, curriculum, hourly_rate);
    if let Some(rating) = req.rating {
        if !rating.is_finite() || rating < 0.0 {
            return Err(AppError::validation("rating must be a non-negative number"));
        }
        new.rating = rating;
    }
    if let Some(sessions) = req.sessions {
        if sessions < 0 {
            return Err(AppError::validation("sessions must not be negative"));
        }
        new.sessions = sessions;
    }
    new.online = req.online.unwrap_or(false);
    new.image = req.image.filter(|s| !s.trim().is_empty());

    let tutor = tutors.create(new).await?;
    info!(tutor_id = %tutor.id, curriculum = %tutor.curriculum, "tutor created");
    Ok(tutor)
}
