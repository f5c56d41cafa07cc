use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Academic syllabus a tutor teaches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Curriculum {
    #[serde(rename = "IGCSE")]
    Igcse,
    #[serde(rename = "CBC")]
    Cbc,
    #[serde(rename = "GCSE")]
    Gcse,
}

impl Curriculum {
    pub const ALL: [Curriculum; 3] = [Curriculum::Igcse, Curriculum::Cbc, Curriculum::Gcse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Curriculum::Igcse => "IGCSE",
            Curriculum::Cbc => "CBC",
            Curriculum::Gcse => "GCSE",
        }
    }
}

impl fmt::Display for Curriculum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Curriculum {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow::anyhow!("unknown curriculum {wanted:?}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutor {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub curriculum: Curriculum,
    pub rating: f64,
    pub sessions: i32,
    pub hourly_rate: f64,
    pub online: bool,
    pub image: Option<String>,
}

/// A tutor profile ready to insert; defaults already applied.
#[derive(Debug, Clone)]
pub struct NewTutor {
    pub name: String,
    pub subject: String,
    pub curriculum: Curriculum,
    pub rating: f64,
    pub sessions: i32,
    pub hourly_rate: f64,
    pub online: bool,
    pub image: Option<String>,
}

impl NewTutor {
    /// Profile with the default rating, session count and availability.
    pub fn new(name: &str, subject: &str, curriculum: Curriculum, hourly_rate: f64) -> Self {
        Self {
            name: name.to_string(),
            subject: subject.to_string(),
            curriculum,
            rating: 0.0,
            sessions: 0,
            hourly_rate,
            online: false,
            image: None,
        }
    }

    pub fn into_tutor(self, id: Uuid) -> Tutor {
        Tutor {
            id,
            name: self.name,
            subject: self.subject,
            curriculum: self.curriculum,
            rating: self.rating,
            sessions: self.sessions,
            hourly_rate: self.hourly_rate,
            online: self.online,
            image: self.image,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct TutorRow {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub curriculum: String,
    pub rating: f64,
    pub sessions: i32,
    pub hourly_rate: f64,
    pub online: bool,
    pub image: Option<String>,
}

impl TryFrom<TutorRow> for Tutor {
    type Error = anyhow::Error;

    fn try_from(r: TutorRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            name: r.name,
            subject: r.subject,
            curriculum: r.curriculum.parse()?,
            rating: r.rating,
            sessions: r.sessions,
            hourly_rate: r.hourly_rate,
            online: r.online,
            image: r.image,
        })
    }
}
