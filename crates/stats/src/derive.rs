use collector::payloads::{CommitSearchPayload, RepoPayload, UserPayload};

use crate::model::StatsSummary;

/// Pure reduction of the raw collector output into the snapshot values.
/// No I/O; the same inputs always derive the same summary.
pub fn derive_stats(
    profile: &UserPayload,
    repos: &[RepoPayload],
    commits: &CommitSearchPayload,
) -> StatsSummary {
    StatsSummary {
        total_commits: commits.total_count,
        total_repositories: repos.len() as i64,
        stars_received: repos.iter().map(|repo| repo.stargazers_count).sum(),
        // Sum of repository sizes, a knowingly simplified contribution proxy.
        contribution_score: repos.iter().map(|repo| repo.size).sum(),
        most_used_language: most_used_language(repos),
        collaborator_count: profile.collaborators,
        follower_count: profile.followers.unwrap_or(0),
    }
}

/// Most frequent declared language; ties break to the language whose first
/// occurrence comes earliest in the repository sequence.
fn most_used_language(repos: &[RepoPayload]) -> Option<String> {
    let mut counts: Vec<(&str, u32)> = Vec::new();
    for repo in repos {
        let Some(language) = repo.language.as_deref() else {
            continue;
        };
        if language.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(seen, _)| *seen == language) {
            Some((_, count)) => *count += 1,
            None => counts.push((language, 1)),
        }
    }

    let mut best: Option<(&str, u32)> = None;
    for (language, count) in counts {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((language, count)),
        }
    }
    best.map(|(language, _)| language.to_string())
}
