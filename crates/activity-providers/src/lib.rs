mod bluesky;
mod devpad;
mod error;
mod github;
mod http_util;
mod memory;
mod provider;
mod raw;
mod reddit;
mod twitter;
mod youtube;

pub use bluesky::BlueskyProvider;
pub use devpad::DevpadProvider;
pub use error::ProviderError;
pub use github::GithubProvider;
pub use memory::MemoryProvider;
pub use provider::{FetchOutcome, Provider};
pub use raw::{
    PlatformResult, RawBluesky, RawDevpad, RawGithub, RawGithubCommit, RawGithubMeta,
    RawGithubPr, RawGithubRepoActivity, RawReddit, RawRedditComment, RawSocialPost, RawTask,
    RawTwitter, RawVideo, RawYoutube,
};
pub use reddit::RedditProvider;
pub use twitter::TwitterProvider;
pub use youtube::YoutubeProvider;
