use std::sync::Arc;
use std::time::Instant;

use common::config::GithubConfig;
use tracing::{info, instrument};

use crate::client::GithubClient;
use crate::error::UpstreamError;
use crate::metrics;
use crate::payloads::{CommitSearchPayload, RepoPayload, UserPayload};

/// Fetches everything the stats derivation needs for one username: the
/// profile record, the exhaustive repository collection, and the
/// commit-search summary.
pub struct ProfileCollector {
    client: Arc<dyn GithubClient>,
    page_size: u32,
    max_pages: u32,
}

impl ProfileCollector {
    pub fn new(config: &GithubConfig, client: Arc<dyn GithubClient>) -> Self {
        Self {
            client,
            page_size: config.page_size.min(100),
            max_pages: config.max_pages,
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch_profile(&self, username: &str) -> Result<UserPayload, UpstreamError> {
        let started = Instant::now();
        let result = self.client.get_user(username).await;
        record("profile", &result, started);
        result
    }

    /// Concatenates repository pages until the first empty page. An upstream
    /// that keeps returning full pages past `max_pages` is reported as
    /// `PaginationOverflow` instead of looping forever.
    #[instrument(skip(self))]
    pub async fn fetch_all_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<RepoPayload>, UpstreamError> {
        let started = Instant::now();
        let result = self.fetch_repo_pages(username).await;
        record("repositories", &result, started);
        result
    }

    async fn fetch_repo_pages(&self, username: &str) -> Result<Vec<RepoPayload>, UpstreamError> {
        let mut all_repos = Vec::new();
        let mut page = 1u32;

        loop {
            if page > self.max_pages {
                metrics::PAGINATION_OVERFLOWS_TOTAL.inc();
                return Err(UpstreamError::PaginationOverflow {
                    max_pages: self.max_pages,
                });
            }

            let repos = self
                .client
                .list_user_repos(username, page, self.page_size)
                .await?;
            metrics::REPO_PAGES_TOTAL.inc();

            if repos.is_empty() {
                break;
            }

            metrics::REPOS_COLLECTED_TOTAL.inc_by(repos.len() as u64);
            all_repos.extend(repos);
            page += 1;
        }

        info!(
            username,
            pages = page,
            repositories = all_repos.len(),
            "collected repository pages"
        );
        Ok(all_repos)
    }

    /// Only `total_count` is consumed downstream; the match list itself is
    /// never materialized.
    #[instrument(skip(self))]
    pub async fn fetch_commit_summary(
        &self,
        username: &str,
    ) -> Result<CommitSearchPayload, UpstreamError> {
        let started = Instant::now();
        let result = self.client.search_commits(username).await;
        record("commit_summary", &result, started);
        result
    }
}

fn record<T>(op: &str, result: &Result<T, UpstreamError>, started: Instant) {
    let outcome = if result.is_ok() { "success" } else { "error" };
    metrics::FETCH_REQUESTS_TOTAL
        .with_label_values(&[op, outcome])
        .inc();
    metrics::FETCH_LATENCY_SECONDS
        .with_label_values(&[op])
        .observe(started.elapsed().as_secs_f64());
}
