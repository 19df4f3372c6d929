mod combine;
mod devpad;
mod github;
mod social;
mod youtube;

pub use combine::{combine_timelines, group_by_date, group_commits};
pub use devpad::normalize_devpad;
pub use github::normalize_github;
pub use social::{normalize_bluesky, normalize_posts, normalize_reddit, normalize_twitter};
pub use youtube::normalize_youtube;
