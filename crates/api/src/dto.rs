use chrono::{DateTime, Utc};
use serde::Serialize;

use db::models::{ArtifactRow, ProfileRow, StatsSnapshotRow};
use pipeline::{PipelineOutcome, WrappedBundle};

#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub username: String,
    pub avatar_url: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileRow> for ProfileDto {
    fn from(row: ProfileRow) -> Self {
        Self {
            username: row.username,
            avatar_url: row.avatar_url,
            display_name: row.display_name,
            bio: row.bio,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsDto {
    pub total_commits: i64,
    pub total_repositories: i64,
    pub stars_received: i64,
    pub contribution_score: i64,
    pub most_used_language: Option<String>,
    pub collaborator_count: Option<i64>,
    pub follower_count: i64,
    pub generated_at: DateTime<Utc>,
}

impl From<StatsSnapshotRow> for StatsDto {
    fn from(row: StatsSnapshotRow) -> Self {
        Self {
            total_commits: row.total_commits,
            total_repositories: row.total_repositories,
            stars_received: row.stars_received,
            contribution_score: row.contribution_score,
            most_used_language: row.most_used_language,
            collaborator_count: row.collaborator_count,
            follower_count: row.follower_count,
            generated_at: row.generated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtifactDto {
    pub stat_name: String,
    pub stat_value: String,
    pub prompt: String,
    pub quotation: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<ArtifactRow> for ArtifactDto {
    fn from(row: ArtifactRow) -> Self {
        Self {
            stat_name: row.stat_name,
            stat_value: row.stat_value,
            prompt: row.prompt,
            quotation: row.quotation,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WrappedResponse {
    pub profile: ProfileDto,
    pub stats: StatsDto,
    pub artifacts: Vec<ArtifactDto>,
    pub served_from_cache: bool,
}

impl WrappedResponse {
    pub fn from_bundle(bundle: WrappedBundle, served_from_cache: bool) -> Self {
        Self {
            profile: bundle.profile.into(),
            stats: bundle.snapshot.into(),
            artifacts: bundle.artifacts.into_iter().map(ArtifactDto::from).collect(),
            served_from_cache,
        }
    }

    pub fn from_outcome(outcome: PipelineOutcome) -> Self {
        let served_from_cache = outcome.served_from_cache();
        Self::from_bundle(outcome.into_bundle(), served_from_cache)
    }
}
