use activity_core::text::derive_title;
use activity_core::{ItemPayload, Platform, TimelineItem};
use activity_providers::RawGithub;

/// Normalize one account's GitHub activity into commit and PR items.
/// Inputs with zero entries yield an empty slice.
pub fn normalize_github(raw: &RawGithub) -> Vec<TimelineItem> {
    let mut items = Vec::new();

    for (repo, activity) in &raw.repos {
        for commit in &activity.commits {
            items.push(TimelineItem {
                id: format!("github:commit:{}", commit.sha),
                platform: Platform::Github,
                timestamp: commit.author_date,
                title: derive_title(&commit.message),
                url: format!("https://github.com/{repo}/commit/{}", commit.sha),
                payload: ItemPayload::Commit {
                    sha: commit.sha.clone(),
                    message: commit.message.clone(),
                    repo: repo.clone(),
                    branch: commit.branch.clone(),
                    additions: commit.additions as i64,
                    deletions: commit.deletions as i64,
                    files_changed: commit.files_changed as i64,
                },
            });
        }

        for pr in &activity.prs {
            let timestamp = pr.merged_at.unwrap_or(pr.updated_at);
            items.push(TimelineItem {
                id: format!("github:pull_request:{repo}#{}", pr.number),
                platform: Platform::Github,
                timestamp,
                title: derive_title(&pr.title),
                url: format!("https://github.com/{repo}/pull/{}", pr.number),
                payload: ItemPayload::PullRequest {
                    repo: repo.clone(),
                    number: pr.number as i64,
                    title: pr.title.clone(),
                    state: pr.state.clone(),
                    head_ref: pr.head_ref.clone(),
                    base_ref: pr.base_ref.clone(),
                    additions: pr.additions as i64,
                    deletions: pr.deletions as i64,
                    changed_files: pr.changed_files as i64,
                    commit_shas: pr.commit_shas.clone(),
                    merge_commit_sha: pr.merge_commit_sha.clone(),
                },
            });
        }
    }

    items
}
