use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::time::{sleep, Duration};
use tracing::{instrument, warn};

use crate::errors::{DbError, Result};
use crate::models::{
    ArtifactRow, NewArtifact, NewProfile, NewSnapshot, ProfileRow, StatsSnapshotRow,
};
use crate::repositories::{
    ArtifactRepository, ClaimRepository, ProfileRepository, Repositories, SnapshotRepository,
};

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(DbError::Migration)
}

#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
    profile_repo: Arc<PgProfileRepository>,
    snapshot_repo: Arc<PgSnapshotRepository>,
    artifact_repo: Arc<PgArtifactRepository>,
    claim_repo: Arc<PgClaimRepository>,
}

impl PgDatabase {
    pub async fn connect(database_url: &str) -> Result<Self> {
        const MAX_ATTEMPTS: u32 = 5;
        const BASE_DELAY_MS: u64 = 500;

        let mut attempts = 0;
        loop {
            match PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
            {
                Ok(pool) => {
                    run_migrations(&pool).await?;
                    return Ok(Self::from_pool(pool));
                }
                Err(err) => {
                    attempts += 1;
                    if attempts >= MAX_ATTEMPTS {
                        return Err(DbError::Query(err));
                    }

                    let exp = (attempts - 1).min(5);
                    let backoff = Duration::from_millis(BASE_DELAY_MS * (1u64 << exp));
                    warn!(
                        attempts,
                        error = %err,
                        wait_ms = backoff.as_millis(),
                        "database connection failed; retrying"
                    );
                    sleep(backoff).await;
                }
            }
        }
    }

    pub fn from_pool(pool: PgPool) -> Self {
        let profile_repo = Arc::new(PgProfileRepository { pool: pool.clone() });
        let snapshot_repo = Arc::new(PgSnapshotRepository { pool: pool.clone() });
        let artifact_repo = Arc::new(PgArtifactRepository { pool: pool.clone() });
        let claim_repo = Arc::new(PgClaimRepository { pool: pool.clone() });

        Self {
            pool,
            profile_repo,
            snapshot_repo,
            artifact_repo,
            claim_repo,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Repositories for PgDatabase {
    fn profiles(&self) -> &dyn ProfileRepository {
        &*self.profile_repo
    }

    fn snapshots(&self) -> &dyn SnapshotRepository {
        &*self.snapshot_repo
    }

    fn artifacts(&self) -> &dyn ArtifactRepository {
        &*self.artifact_repo
    }

    fn claims(&self) -> &dyn ClaimRepository {
        &*self.claim_repo
    }
}

#[derive(Clone)]
struct PgProfileRepository {
    pool: PgPool,
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self, profile), fields(username = %profile.username))]
    async fn get_or_create(&self, profile: NewProfile) -> Result<ProfileRow> {
        let inserted = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (username, avatar_url, display_name, bio)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, avatar_url, display_name, bio, created_at
            "#,
        )
        .bind(&profile.username)
        .bind(&profile.avatar_url)
        .bind(&profile.display_name)
        .bind(&profile.bio)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)?;

        if let Some(row) = inserted {
            return Ok(row);
        }

        sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, username, avatar_url, display_name, bio, created_at
            FROM profiles
            WHERE username = $1
            "#,
        )
        .bind(&profile.username)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<ProfileRow>> {
        sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, username, avatar_url, display_name, bio, created_at
            FROM profiles
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }
}

#[derive(Clone)]
struct PgSnapshotRepository {
    pool: PgPool,
}

#[async_trait]
impl SnapshotRepository for PgSnapshotRepository {
    #[instrument(skip(self, snapshot), fields(profile_id = snapshot.profile_id))]
    async fn insert(&self, snapshot: NewSnapshot) -> Result<StatsSnapshotRow> {
        sqlx::query_as::<_, StatsSnapshotRow>(
            r#"
            INSERT INTO stats_snapshots (
                profile_id, total_commits, total_repositories, stars_received,
                contribution_score, most_used_language, collaborator_count, follower_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, profile_id, total_commits, total_repositories, stars_received,
                      contribution_score, most_used_language, collaborator_count,
                      follower_count, generated_at
            "#,
        )
        .bind(snapshot.profile_id)
        .bind(snapshot.total_commits)
        .bind(snapshot.total_repositories)
        .bind(snapshot.stars_received)
        .bind(snapshot.contribution_score)
        .bind(&snapshot.most_used_language)
        .bind(snapshot.collaborator_count)
        .bind(snapshot.follower_count)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    async fn latest_for_profile(&self, profile_id: i64) -> Result<Option<StatsSnapshotRow>> {
        sqlx::query_as::<_, StatsSnapshotRow>(
            r#"
            SELECT id, profile_id, total_commits, total_repositories, stars_received,
                   contribution_score, most_used_language, collaborator_count,
                   follower_count, generated_at
            FROM stats_snapshots
            WHERE profile_id = $1
            ORDER BY generated_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }
}

#[derive(Clone)]
struct PgArtifactRepository {
    pool: PgPool,
}

#[async_trait]
impl ArtifactRepository for PgArtifactRepository {
    #[instrument(skip(self, artifact), fields(snapshot_id = artifact.snapshot_id, stat = %artifact.stat_name))]
    async fn insert(&self, artifact: NewArtifact) -> Result<ArtifactRow> {
        sqlx::query_as::<_, ArtifactRow>(
            r#"
            INSERT INTO artifacts (snapshot_id, stat_name, stat_value, prompt, quotation, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, snapshot_id, stat_name, stat_value, prompt, quotation, image_url, created_at
            "#,
        )
        .bind(artifact.snapshot_id)
        .bind(&artifact.stat_name)
        .bind(&artifact.stat_value)
        .bind(&artifact.prompt)
        .bind(&artifact.quotation)
        .bind(&artifact.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    async fn list_for_snapshot(&self, snapshot_id: i64) -> Result<Vec<ArtifactRow>> {
        sqlx::query_as::<_, ArtifactRow>(
            r#"
            SELECT id, snapshot_id, stat_name, stat_value, prompt, quotation, image_url, created_at
            FROM artifacts
            WHERE snapshot_id = $1
            ORDER BY id
            "#,
        )
        .bind(snapshot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }
}

#[derive(Clone)]
struct PgClaimRepository {
    pool: PgPool,
}

#[async_trait]
impl ClaimRepository for PgClaimRepository {
    #[instrument(skip(self))]
    async fn try_acquire(&self, username: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO pipeline_claims (username)
            VALUES ($1)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(username)
        .execute(&self.pool)
        .await
        .map_err(DbError::Query)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn release(&self, username: &str) -> Result<()> {
        sqlx::query("DELETE FROM pipeline_claims WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(DbError::Query)?;
        Ok(())
    }
}
