use serde::Deserialize;

/// Query string of `GET /tutors/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub curriculum: String,
}

/// Request body for a new tutor profile.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTutorRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub curriculum: String,
    pub hourly_rate: Option<f64>,
    pub rating: Option<f64>,
    pub sessions: Option<i32>,
    pub online: Option<bool>,
    pub image: Option<String>,
}
