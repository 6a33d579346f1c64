use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
    pub avatar_url: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub followers: Option<i64>,
    /// The public user endpoint does not return this field for arbitrary
    /// users; it stays optional end to end.
    pub collaborators: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoPayload {
    pub name: String,
    #[serde(default)]
    pub stargazers_count: i64,
    /// Repository size in kilobytes; summed downstream as a simplified
    /// contribution proxy.
    #[serde(default)]
    pub size: i64,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSearchPayload {
    #[serde(default)]
    pub total_count: i64,
}
