use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{
    ArtifactRow, NewArtifact, NewProfile, NewSnapshot, ProfileRow, StatsSnapshotRow,
};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert-if-absent keyed by username; an existing profile is returned
    /// unchanged, never overwritten.
    async fn get_or_create(&self, profile: NewProfile) -> Result<ProfileRow>;
    async fn get_by_username(&self, username: &str) -> Result<Option<ProfileRow>>;
}

#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn insert(&self, snapshot: NewSnapshot) -> Result<StatsSnapshotRow>;
    async fn latest_for_profile(&self, profile_id: i64) -> Result<Option<StatsSnapshotRow>>;
}

#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    async fn insert(&self, artifact: NewArtifact) -> Result<ArtifactRow>;
    async fn list_for_snapshot(&self, snapshot_id: i64) -> Result<Vec<ArtifactRow>>;
}

#[async_trait]
pub trait ClaimRepository: Send + Sync {
    /// Returns false when another run already holds the claim.
    async fn try_acquire(&self, username: &str) -> Result<bool>;
    async fn release(&self, username: &str) -> Result<()>;
}

pub trait Repositories: Send + Sync {
    fn profiles(&self) -> &dyn ProfileRepository;
    fn snapshots(&self) -> &dyn SnapshotRepository;
    fn artifacts(&self) -> &dyn ArtifactRepository;
    fn claims(&self) -> &dyn ClaimRepository;
}
