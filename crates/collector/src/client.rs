use async_trait::async_trait;
use http::header;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::error::UpstreamError;
use crate::payloads::{CommitSearchPayload, RepoPayload, UserPayload};

const API_VERSION: &str = "2022-11-28";
const ACCEPT_JSON: &str = "application/vnd.github+json";
// Commit search still sits behind the cloak preview media type.
const ACCEPT_COMMIT_SEARCH: &str = "application/vnd.github.cloak-preview+json";

#[async_trait]
pub trait GithubClient: Send + Sync {
    async fn get_user(&self, username: &str) -> Result<UserPayload, UpstreamError>;
    async fn list_user_repos(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoPayload>, UpstreamError>;
    async fn search_commits(&self, author: &str) -> Result<CommitSearchPayload, UpstreamError>;
}

pub struct RestGithubClient {
    client: reqwest::Client,
    base: Url,
    token: String,
}

impl RestGithubClient {
    pub fn new(token: impl Into<String>, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .expect("reqwest client");
        Self {
            client,
            base: Url::parse("https://api.github.com/").expect("valid base url"),
            token: token.into(),
        }
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        accept: &str,
    ) -> Result<T, UpstreamError> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        debug!(endpoint = %endpoint, "dispatching GitHub request");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, accept)
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::status(status, endpoint));
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode { endpoint, source })
    }

    fn join(&self, path: &str) -> Result<Url, UpstreamError> {
        Ok(self.base.join(path)?)
    }

    fn with_query(url: &mut Url, params: &[(&str, String)]) {
        let mut query_pairs = url.query_pairs_mut();
        for (key, val) in params {
            query_pairs.append_pair(key, val);
        }
    }
}

#[async_trait]
impl GithubClient for RestGithubClient {
    async fn get_user(&self, username: &str) -> Result<UserPayload, UpstreamError> {
        let url = self.join(&format!("users/{username}"))?;
        self.get_json(url, ACCEPT_JSON).await
    }

    async fn list_user_repos(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoPayload>, UpstreamError> {
        let mut url = self.join(&format!("users/{username}/repos"))?;
        let params = [
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        Self::with_query(&mut url, &params);
        self.get_json(url, ACCEPT_JSON).await
    }

    async fn search_commits(&self, author: &str) -> Result<CommitSearchPayload, UpstreamError> {
        let mut url = self.join("search/commits")?;
        let params = [("q", format!("author:{author}"))];
        Self::with_query(&mut url, &params);
        self.get_json(url, ACCEPT_COMMIT_SEARCH).await
    }
}
