use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw (un-normalized) GitHub commit, as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGithubCommit {
    pub sha: String,
    pub message: String,
    pub branch: String,
    pub author_date: DateTime<Utc>,
    pub additions: u32,
    pub deletions: u32,
    pub files_changed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGithubPr {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub head_ref: String,
    pub base_ref: String,
    pub additions: u32,
    pub deletions: u32,
    pub changed_files: u32,
    pub commit_shas: Vec<String>,
    pub merge_commit_sha: Option<String>,
    pub merged_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGithubRepoActivity {
    pub commits: Vec<RawGithubCommit>,
    pub prs: Vec<RawGithubPr>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGithubMeta {
    pub login: String,
    pub tracked_repos: Vec<String>,
}

/// `meta` plus `map<repo, {commits, prs}>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGithub {
    pub meta: RawGithubMeta,
    pub repos: HashMap<String, RawGithubRepoActivity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSocialPost {
    pub id: String,
    pub url: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub reply_count: u32,
    pub repost_count: u32,
    pub like_count: u32,
    pub has_media: bool,
    pub is_reply: bool,
    pub is_repost: bool,
    pub subreddit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRedditComment {
    pub id: String,
    pub url: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub parent_title: String,
    pub parent_url: String,
    pub subreddit: String,
    pub score: i32,
    pub is_op: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReddit {
    pub posts: Vec<RawSocialPost>,
    pub comments: Vec<RawRedditComment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTwitter {
    pub tweets: Vec<RawSocialPost>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBluesky {
    pub posts: Vec<RawSocialPost>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVideo {
    pub video_id: String,
    pub url: String,
    pub title: String,
    pub channel: String,
    pub published_at: DateTime<Utc>,
    pub duration_seconds: u32,
    pub view_count: u64,
    pub like_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawYoutube {
    pub videos: Vec<RawVideo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTask {
    pub task_id: String,
    pub url: String,
    pub title: String,
    pub status: String,
    pub project: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDevpad {
    pub tasks: Vec<RawTask>,
}

/// The platform-shaped result of one `Provider::fetch` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum PlatformResult {
    Github(RawGithub),
    Reddit(RawReddit),
    Twitter(RawTwitter),
    Bluesky(RawBluesky),
    Youtube(RawYoutube),
    Devpad(RawDevpad),
}
