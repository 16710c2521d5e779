use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted job application. The resume bytes live on disk; only the
/// storage-relative path is recorded here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub degree: String,
    pub college: String,
    pub video_assessment: Option<String>,
    pub resume_path: String,
    pub created_at: DateTime<Utc>,
}

/// A validated submission ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub degree: String,
    pub college: String,
    pub video_assessment: Option<String>,
    pub resume_path: String,
}
