use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Payload carried by a [`TimelineItem`], tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemPayload {
    Commit {
        sha: String,
        message: String,
        repo: String,
        branch: String,
        additions: i64,
        deletions: i64,
        files_changed: i64,
    },
    PullRequest {
        repo: String,
        number: i64,
        title: String,
        state: String,
        head_ref: String,
        base_ref: String,
        additions: i64,
        deletions: i64,
        changed_files: i64,
        commit_shas: Vec<String>,
        merge_commit_sha: Option<String>,
    },
    Post {
        author: String,
        content: String,
        reply_count: i64,
        repost_count: i64,
        like_count: i64,
        has_media: bool,
        is_reply: bool,
        is_repost: bool,
        subreddit: Option<String>,
    },
    Comment {
        content: String,
        parent_title: String,
        parent_url: String,
        subreddit: Option<String>,
        score: i64,
        is_op: bool,
    },
    Video {
        video_id: String,
        channel: String,
        duration_seconds: i64,
        view_count: i64,
        like_count: i64,
    },
    Task {
        task_id: String,
        status: String,
        project: Option<String>,
    },
}

impl ItemPayload {
    /// The `type` discriminator as it appears on the wire.
    pub fn type_name(&self) -> &'static str {
        match self {
            ItemPayload::Commit { .. } => "commit",
            ItemPayload::PullRequest { .. } => "pull_request",
            ItemPayload::Post { .. } => "post",
            ItemPayload::Comment { .. } => "comment",
            ItemPayload::Video { .. } => "video",
            ItemPayload::Task { .. } => "task",
        }
    }

    /// Repo this item belongs to, for GitHub include/exclude filters.
    pub fn repo(&self) -> Option<&str> {
        match self {
            ItemPayload::Commit { repo, .. } => Some(repo),
            ItemPayload::PullRequest { repo, .. } => Some(repo),
            _ => None,
        }
    }

    /// Subreddit this item belongs to, for Reddit include/exclude filters.
    pub fn subreddit(&self) -> Option<&str> {
        match self {
            ItemPayload::Post { subreddit, .. } => subreddit.as_deref(),
            ItemPayload::Comment { subreddit, .. } => subreddit.as_deref(),
            _ => None,
        }
    }

    /// Free text used for keyword filtering: `content` where the payload
    /// carries one, falling back to nothing for payloads without prose.
    pub fn content_text(&self) -> Option<&str> {
        match self {
            ItemPayload::Post { content, .. } => Some(content),
            ItemPayload::Comment { content, .. } => Some(content),
            ItemPayload::Commit { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// A single normalized activity entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: String,
    pub platform: Platform,
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub url: String,
    #[serde(flatten)]
    pub payload: ItemPayload,
}

impl TimelineItem {
    pub fn type_name(&self) -> &'static str {
        self.payload.type_name()
    }
}

/// A run of same-repo, same-branch, same-day commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitGroup {
    #[serde(rename = "type")]
    pub kind: CommitGroupTag,
    pub repo: String,
    pub branch: String,
    pub date: NaiveDate,
    pub commits: Vec<TimelineItem>,
    pub total_additions: i64,
    pub total_deletions: i64,
    pub total_files_changed: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitGroupTag {
    CommitGroup,
}

impl CommitGroup {
    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        self.commits
            .iter()
            .map(|c| c.timestamp)
            .max()
            .unwrap_or_else(|| {
                self.date
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    .and_utc()
            })
    }
}

/// Either a plain item or a grouped run of commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    CommitGroup(CommitGroup),
    Item(TimelineItem),
}

impl Entry {
    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        match self {
            Entry::Item(i) => i.timestamp,
            Entry::CommitGroup(g) => g.sort_timestamp(),
        }
    }

    pub fn date_key(&self) -> NaiveDate {
        self.sort_timestamp().date_naive()
    }
}

/// Entries for a single UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub items: Vec<Entry>,
}

/// Persisted payload of a `timeline/<user>` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePayload {
    pub user_id: String,
    pub generated_at: DateTime<Utc>,
    pub groups: Vec<DateGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
}
