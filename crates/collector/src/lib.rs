pub mod client;
pub mod error;
pub mod metrics;
pub mod payloads;
pub mod service;

pub use client::{GithubClient, RestGithubClient};
pub use service::ProfileCollector;
pub use error::UpstreamError;
pub use payloads::{CommitSearchPayload, RepoPayload, UserPayload};
