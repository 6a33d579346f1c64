use std::sync::Arc;
use std::time::{Duration, Instant};

use artgen::ArtGenerator;
use collector::ProfileCollector;
use common::config::PipelineConfig;
use db::models::{ArtifactRow, NewArtifact, NewProfile, NewSnapshot, ProfileRow, StatsSnapshotRow};
use db::Repositories;
use stats::{derive_stats, StatKind};
use tracing::{info, instrument, warn};

use crate::error::PipelineError;
use crate::metrics;

/// Everything a finished (or cached) run hands back to the caller.
#[derive(Debug, Clone)]
pub struct WrappedBundle {
    pub profile: ProfileRow,
    pub snapshot: StatsSnapshotRow,
    pub artifacts: Vec<ArtifactRow>,
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    ServedFromCache(WrappedBundle),
    Completed(WrappedBundle),
}

impl PipelineOutcome {
    pub fn served_from_cache(&self) -> bool {
        matches!(self, PipelineOutcome::ServedFromCache(_))
    }

    pub fn into_bundle(self) -> WrappedBundle {
        match self {
            PipelineOutcome::ServedFromCache(bundle) => bundle,
            PipelineOutcome::Completed(bundle) => bundle,
        }
    }
}

/// One state machine per username request: claim, cache check, collect,
/// derive, generate, assemble. The claim guarantees at most one concurrent
/// run per username; the cache check guarantees at most one full run per
/// username for the lifetime of the store.
pub struct Pipeline {
    collector: ProfileCollector,
    generator: ArtGenerator,
    repos: Arc<dyn Repositories>,
    run_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        collector: ProfileCollector,
        generator: ArtGenerator,
        repos: Arc<dyn Repositories>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            collector,
            generator,
            repos,
            run_timeout: Duration::from_secs(config.run_timeout_secs),
        }
    }

    #[instrument(skip(self))]
    pub async fn run(&self, username: &str) -> Result<PipelineOutcome, PipelineError> {
        let username = username.trim();
        if username.is_empty() {
            metrics::RUNS_TOTAL.with_label_values(&["validation"]).inc();
            return Err(PipelineError::Validation("username is required".into()));
        }

        if !self.repos.claims().try_acquire(username).await? {
            metrics::RUNS_TOTAL.with_label_values(&["busy"]).inc();
            return Err(PipelineError::Busy(username.to_string()));
        }

        let result = match tokio::time::timeout(self.run_timeout, self.run_claimed(username)).await
        {
            Ok(result) => result,
            Err(_) => Err(PipelineError::Timeout(self.run_timeout)),
        };

        // Already-persisted records stay; only the claim is cleaned up.
        if let Err(err) = self.repos.claims().release(username).await {
            warn!(username, error = %err, "failed to release pipeline claim");
        }

        match &result {
            Ok(outcome) => {
                let label = if outcome.served_from_cache() {
                    "cache_hit"
                } else {
                    "completed"
                };
                metrics::RUNS_TOTAL.with_label_values(&[label]).inc();
            }
            Err(err) => {
                metrics::RUNS_TOTAL.with_label_values(&[err.reason()]).inc();
            }
        }
        result
    }

    /// Cache-only read used by the GET surface; never touches upstream or
    /// generative APIs.
    pub async fn lookup(&self, username: &str) -> Result<Option<WrappedBundle>, PipelineError> {
        self.load_cached(username.trim()).await
    }

    async fn run_claimed(&self, username: &str) -> Result<PipelineOutcome, PipelineError> {
        if let Some(bundle) = self.load_cached(username).await? {
            info!(username, "serving wrapped stats from cache");
            return Ok(PipelineOutcome::ServedFromCache(bundle));
        }

        // Collect
        let collect_started = Instant::now();
        let profile_info = self.collector.fetch_profile(username).await?;
        let profile = self
            .repos
            .profiles()
            .get_or_create(NewProfile {
                username: username.to_string(),
                avatar_url: profile_info.avatar_url.clone(),
                display_name: profile_info.name.clone(),
                bio: profile_info.bio.clone(),
            })
            .await?;
        metrics::STAGE_DURATION_SECONDS
            .with_label_values(&["collect"])
            .observe(collect_started.elapsed().as_secs_f64());

        // Derive
        let derive_started = Instant::now();
        let repositories = self.collector.fetch_all_repositories(username).await?;
        let commits = self.collector.fetch_commit_summary(username).await?;
        let summary = derive_stats(&profile_info, &repositories, &commits);
        let snapshot = self
            .repos
            .snapshots()
            .insert(NewSnapshot {
                profile_id: profile.id,
                total_commits: summary.total_commits,
                total_repositories: summary.total_repositories,
                stars_received: summary.stars_received,
                contribution_score: summary.contribution_score,
                most_used_language: summary.most_used_language.clone(),
                collaborator_count: summary.collaborator_count,
                follower_count: summary.follower_count,
            })
            .await?;
        metrics::STAGE_DURATION_SECONDS
            .with_label_values(&["derive"])
            .observe(derive_started.elapsed().as_secs_f64());
        info!(
            username,
            repositories = summary.total_repositories,
            commits = summary.total_commits,
            "derived stats snapshot"
        );

        // Generate: fixed order, persist each artifact immediately so prior
        // progress survives a later failure; stop on the first failure.
        let generate_started = Instant::now();
        let mut artifacts = Vec::with_capacity(StatKind::ALL.len());
        for kind in StatKind::ALL {
            let stat_name = kind.display_name();
            let stat_value = summary.value_text(kind);
            let generated = self
                .generator
                .generate(stat_name, &stat_value)
                .await
                .map_err(|source| PipelineError::Generation {
                    stat: stat_name.to_string(),
                    source,
                })?;
            let artifact = self
                .repos
                .artifacts()
                .insert(NewArtifact {
                    snapshot_id: snapshot.id,
                    stat_name: stat_name.to_string(),
                    stat_value,
                    prompt: generated.prompt,
                    quotation: generated.quotation,
                    image_url: generated.image_url,
                })
                .await?;
            metrics::ARTIFACTS_GENERATED_TOTAL.inc();
            artifacts.push(artifact);
        }
        metrics::STAGE_DURATION_SECONDS
            .with_label_values(&["generate"])
            .observe(generate_started.elapsed().as_secs_f64());

        info!(username, artifacts = artifacts.len(), "pipeline completed");
        Ok(PipelineOutcome::Completed(WrappedBundle {
            profile,
            snapshot,
            artifacts,
        }))
    }

    async fn load_cached(&self, username: &str) -> Result<Option<WrappedBundle>, PipelineError> {
        let Some(profile) = self.repos.profiles().get_by_username(username).await? else {
            return Ok(None);
        };
        let Some(snapshot) = self.repos.snapshots().latest_for_profile(profile.id).await? else {
            return Ok(None);
        };
        let artifacts = self.repos.artifacts().list_for_snapshot(snapshot.id).await?;
        Ok(Some(WrappedBundle {
            profile,
            snapshot,
            artifacts,
        }))
    }
}
