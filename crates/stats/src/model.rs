use serde::Serialize;

/// The fixed set of derived statistics. `ALL` is the generation and
/// persistence order; cache replay relies on it staying stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatKind {
    TotalCommits,
    TotalRepositories,
    StarsReceived,
    MostUsedLanguage,
    Contributions,
    Collaborators,
    Followers,
}

impl StatKind {
    pub const ALL: [StatKind; 7] = [
        StatKind::TotalCommits,
        StatKind::TotalRepositories,
        StatKind::StarsReceived,
        StatKind::MostUsedLanguage,
        StatKind::Contributions,
        StatKind::Collaborators,
        StatKind::Followers,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            StatKind::TotalCommits => "Total Commits",
            StatKind::TotalRepositories => "Total Repositories",
            StatKind::StarsReceived => "Stars Received",
            StatKind::MostUsedLanguage => "Most Used Language",
            StatKind::Contributions => "Contributions",
            StatKind::Collaborators => "Collaborators",
            StatKind::Followers => "Followers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub total_commits: i64,
    pub total_repositories: i64,
    pub stars_received: i64,
    pub contribution_score: i64,
    pub most_used_language: Option<String>,
    pub collaborator_count: Option<i64>,
    pub follower_count: i64,
}

impl StatsSummary {
    /// The value text embedded in model instructions and stored on the
    /// artifact; absent optional values render as "N/A".
    pub fn value_text(&self, kind: StatKind) -> String {
        match kind {
            StatKind::TotalCommits => self.total_commits.to_string(),
            StatKind::TotalRepositories => self.total_repositories.to_string(),
            StatKind::StarsReceived => self.stars_received.to_string(),
            StatKind::MostUsedLanguage => self
                .most_used_language
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            StatKind::Contributions => self.contribution_score.to_string(),
            StatKind::Collaborators => self
                .collaborator_count
                .map(|count| count.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            StatKind::Followers => self.follower_count.to_string(),
        }
    }
}
