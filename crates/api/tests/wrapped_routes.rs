use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use artgen::client::GenerativeClient;
use artgen::error::GenerationError;
use artgen::ArtGenerator;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::Router;
use chrono::Utc;
use collector::client::GithubClient;
use collector::error::UpstreamError;
use collector::payloads::{CommitSearchPayload, RepoPayload, UserPayload};
use collector::ProfileCollector;
use common::config::{GeneratorConfig, GithubConfig, PipelineConfig};
use db::errors::Result as DbResult;
use db::models::{
    ArtifactRow, NewArtifact, NewProfile, NewSnapshot, ProfileRow, StatsSnapshotRow,
};
use db::repositories::{
    ArtifactRepository, ClaimRepository, ProfileRepository, Repositories, SnapshotRepository,
};
use pipeline::Pipeline;
use serde_json::Value;
use tower::util::ServiceExt;

use api::{build_router, ApiState};

// --- Test doubles ---

#[derive(Default)]
struct MemStore {
    profiles: Mutex<Vec<ProfileRow>>,
    snapshots: Mutex<Vec<StatsSnapshotRow>>,
    artifacts: Mutex<Vec<ArtifactRow>>,
    claims: Mutex<HashSet<String>>,
    next_id: AtomicI64,
}

impl MemStore {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl ProfileRepository for MemStore {
    async fn get_or_create(&self, profile: NewProfile) -> DbResult<ProfileRow> {
        let mut profiles = self.profiles.lock().unwrap();
        if let Some(existing) = profiles.iter().find(|row| row.username == profile.username) {
            return Ok(existing.clone());
        }
        let row = ProfileRow {
            id: self.next_id(),
            username: profile.username,
            avatar_url: profile.avatar_url,
            display_name: profile.display_name,
            bio: profile.bio,
            created_at: Utc::now(),
        };
        profiles.push(row.clone());
        Ok(row)
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<ProfileRow>> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles
            .iter()
            .find(|row| row.username == username)
            .cloned())
    }
}

#[async_trait]
impl SnapshotRepository for MemStore {
    async fn insert(&self, snapshot: NewSnapshot) -> DbResult<StatsSnapshotRow> {
        let row = StatsSnapshotRow {
            id: self.next_id(),
            profile_id: snapshot.profile_id,
            total_commits: snapshot.total_commits,
            total_repositories: snapshot.total_repositories,
            stars_received: snapshot.stars_received,
            contribution_score: snapshot.contribution_score,
            most_used_language: snapshot.most_used_language,
            collaborator_count: snapshot.collaborator_count,
            follower_count: snapshot.follower_count,
            generated_at: Utc::now(),
        };
        self.snapshots.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn latest_for_profile(&self, profile_id: i64) -> DbResult<Option<StatsSnapshotRow>> {
        let snapshots = self.snapshots.lock().unwrap();
        Ok(snapshots
            .iter()
            .filter(|row| row.profile_id == profile_id)
            .max_by_key(|row| row.id)
            .cloned())
    }
}

#[async_trait]
impl ArtifactRepository for MemStore {
    async fn insert(&self, artifact: NewArtifact) -> DbResult<ArtifactRow> {
        let row = ArtifactRow {
            id: self.next_id(),
            snapshot_id: artifact.snapshot_id,
            stat_name: artifact.stat_name,
            stat_value: artifact.stat_value,
            prompt: artifact.prompt,
            quotation: artifact.quotation,
            image_url: artifact.image_url,
            created_at: Utc::now(),
        };
        self.artifacts.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_for_snapshot(&self, snapshot_id: i64) -> DbResult<Vec<ArtifactRow>> {
        let artifacts = self.artifacts.lock().unwrap();
        Ok(artifacts
            .iter()
            .filter(|row| row.snapshot_id == snapshot_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ClaimRepository for MemStore {
    async fn try_acquire(&self, username: &str) -> DbResult<bool> {
        Ok(self.claims.lock().unwrap().insert(username.to_string()))
    }

    async fn release(&self, username: &str) -> DbResult<()> {
        self.claims.lock().unwrap().remove(username);
        Ok(())
    }
}

impl Repositories for MemStore {
    fn profiles(&self) -> &dyn ProfileRepository {
        self
    }

    fn snapshots(&self) -> &dyn SnapshotRepository {
        self
    }

    fn artifacts(&self) -> &dyn ArtifactRepository {
        self
    }

    fn claims(&self) -> &dyn ClaimRepository {
        self
    }
}

struct StubGithub;

#[async_trait]
impl GithubClient for StubGithub {
    async fn get_user(&self, username: &str) -> Result<UserPayload, UpstreamError> {
        Ok(UserPayload {
            login: username.to_string(),
            avatar_url: Some("https://example.com/avatar.png".to_string()),
            name: Some("Octo Cat".to_string()),
            bio: None,
            followers: Some(3),
            collaborators: None,
        })
    }

    async fn list_user_repos(
        &self,
        _username: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<RepoPayload>, UpstreamError> {
        if page > 1 {
            return Ok(Vec::new());
        }
        Ok(vec![RepoPayload {
            name: "alpha".to_string(),
            stargazers_count: 9,
            size: 4,
            language: Some("Rust".to_string()),
        }])
    }

    async fn search_commits(&self, _author: &str) -> Result<CommitSearchPayload, UpstreamError> {
        Ok(CommitSearchPayload { total_count: 77 })
    }
}

struct StubGen;

#[async_trait]
impl GenerativeClient for StubGen {
    async fn chat(
        &self,
        _model: &str,
        _system: &str,
        _user: &str,
    ) -> Result<String, GenerationError> {
        Ok("generated text".to_string())
    }

    async fn generate_image(
        &self,
        _model: &str,
        _prompt: &str,
        _size: &str,
        _quality: &str,
    ) -> Result<String, GenerationError> {
        Ok("https://images.example.com/card.png".to_string())
    }
}

fn setup_app() -> Router {
    let store = Arc::new(MemStore::default());
    let collector = ProfileCollector::new(
        &GithubConfig {
            token: "test-token".to_string(),
            user_agent: "api-tests".to_string(),
            page_size: 100,
            max_pages: 1000,
        },
        Arc::new(StubGithub),
    );
    let generator = ArtGenerator::new(
        &GeneratorConfig {
            primary_model: "primary".to_string(),
            fallback_model: "fallback".to_string(),
            image_model: "image-model".to_string(),
            image_size: "1024x1024".to_string(),
            image_quality: "standard".to_string(),
        },
        Arc::new(StubGen),
    );
    let pipeline = Arc::new(Pipeline::new(
        collector,
        generator,
        store,
        &PipelineConfig {
            run_timeout_secs: 600,
        },
    ));
    build_router(Arc::new(ApiState {
        pipeline,
        metrics_path: "/metrics",
    }))
}

fn post_wrapped(body: &str) -> Request<Body> {
    Request::post("/wrapped")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// --- Tests ---

#[tokio::test]
async fn post_wrapped_generates_the_full_card_set() {
    let app = setup_app();

    let response = app
        .oneshot(post_wrapped(r#"{"username":"octocat"}"#))
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body = body_json(response).await;
    assert_eq!(body["profile"]["username"], "octocat");
    assert_eq!(body["stats"]["total_commits"], 77);
    assert_eq!(body["stats"]["stars_received"], 9);
    assert_eq!(body["served_from_cache"], false);

    let artifacts = body["artifacts"].as_array().expect("artifact array");
    assert_eq!(artifacts.len(), 7);
    assert_eq!(artifacts[0]["stat_name"], "Total Commits");
    assert_eq!(artifacts[6]["stat_name"], "Followers");
    assert_eq!(
        artifacts[0]["image_url"],
        "https://images.example.com/card.png"
    );
}

#[tokio::test]
async fn repeat_post_is_served_from_cache() {
    let app = setup_app();

    let first = app
        .clone()
        .oneshot(post_wrapped(r#"{"username":"octocat"}"#))
        .await
        .unwrap();
    assert!(first.status().is_success());

    let second = app
        .oneshot(post_wrapped(r#"{"username":"octocat"}"#))
        .await
        .unwrap();
    assert!(second.status().is_success());
    let body = body_json(second).await;
    assert_eq!(body["served_from_cache"], true);
    assert_eq!(body["artifacts"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn missing_username_is_a_structured_bad_request() {
    let app = setup_app();

    let response = app.oneshot(post_wrapped("{}")).await.unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("username"));
}

#[tokio::test]
async fn get_unknown_username_is_not_found() {
    let app = setup_app();

    let response = app
        .oneshot(
            Request::get("/wrapped/nobody")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("nobody"));
}

#[tokio::test]
async fn get_after_generation_reads_the_cache() {
    let app = setup_app();

    let post = app
        .clone()
        .oneshot(post_wrapped(r#"{"username":"octocat"}"#))
        .await
        .unwrap();
    assert!(post.status().is_success());

    let response = app
        .oneshot(
            Request::get("/wrapped/octocat")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body = body_json(response).await;
    assert_eq!(body["profile"]["username"], "octocat");
    assert_eq!(body["served_from_cache"], true);
    assert_eq!(body["artifacts"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = setup_app();

    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}
