use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub username: String,
    pub avatar_url: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatsSnapshotRow {
    pub id: i64,
    pub profile_id: i64,
    pub total_commits: i64,
    pub total_repositories: i64,
    pub stars_received: i64,
    pub contribution_score: i64,
    pub most_used_language: Option<String>,
    pub collaborator_count: Option<i64>,
    pub follower_count: i64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArtifactRow {
    pub id: i64,
    pub snapshot_id: i64,
    pub stat_name: String,
    pub stat_value: String,
    pub prompt: String,
    pub quotation: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub username: String,
    pub avatar_url: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub profile_id: i64,
    pub total_commits: i64,
    pub total_repositories: i64,
    pub stars_received: i64,
    pub contribution_score: i64,
    pub most_used_language: Option<String>,
    pub collaborator_count: Option<i64>,
    pub follower_count: i64,
}

#[derive(Debug, Clone)]
pub struct NewArtifact {
    pub snapshot_id: i64,
    pub stat_name: String,
    pub stat_value: String,
    pub prompt: String,
    pub quotation: String,
    pub image_url: String,
}
