use activity_core::text::derive_title;
use activity_core::{ItemPayload, Platform, TimelineItem};
use activity_providers::{RawBluesky, RawRedditComment, RawReddit, RawSocialPost, RawTwitter};

fn normalize_post(platform: Platform, post: &RawSocialPost) -> TimelineItem {
    TimelineItem {
        id: format!("{platform}:post:{}", post.id),
        platform,
        timestamp: post.created_at,
        title: derive_title(&post.content),
        url: post.url.clone(),
        payload: ItemPayload::Post {
            author: post.author.clone(),
            content: post.content.clone(),
            reply_count: post.reply_count as i64,
            repost_count: post.repost_count as i64,
            like_count: post.like_count as i64,
            has_media: post.has_media,
            is_reply: post.is_reply,
            is_repost: post.is_repost,
            subreddit: post.subreddit.clone(),
        },
    }
}

/// Normalize Bluesky / Twitter / Reddit posts into timeline entries.
pub fn normalize_posts(platform: Platform, posts: &[RawSocialPost]) -> Vec<TimelineItem> {
    posts.iter().map(|p| normalize_post(platform, p)).collect()
}

pub fn normalize_twitter(raw: &RawTwitter) -> Vec<TimelineItem> {
    normalize_posts(Platform::Twitter, &raw.tweets)
}

pub fn normalize_bluesky(raw: &RawBluesky) -> Vec<TimelineItem> {
    normalize_posts(Platform::Bluesky, &raw.posts)
}

fn normalize_comment(comment: &RawRedditComment) -> TimelineItem {
    TimelineItem {
        id: format!("reddit:comment:{}", comment.id),
        platform: Platform::Reddit,
        timestamp: comment.created_at,
        title: derive_title(&comment.content),
        url: comment.url.clone(),
        payload: ItemPayload::Comment {
            content: comment.content.clone(),
            parent_title: comment.parent_title.clone(),
            parent_url: comment.parent_url.clone(),
            subreddit: Some(comment.subreddit.clone()),
            score: comment.score as i64,
            is_op: comment.is_op,
        },
    }
}

/// Reddit: posts plus comments, combined (posts carry an optional
/// `subreddit`, comments always carry one).
pub fn normalize_reddit(raw: &RawReddit) -> Vec<TimelineItem> {
    let mut items = normalize_posts(Platform::Reddit, &raw.posts);
    items.extend(raw.comments.iter().map(normalize_comment));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_post(id: &str) -> RawSocialPost {
        RawSocialPost {
            id: id.into(),
            url: format!("https://example.com/{id}"),
            author: "alice".into(),
            content: "hello world".into(),
            created_at: Utc::now(),
            reply_count: 0,
            repost_count: 0,
            like_count: 0,
            has_media: false,
            is_reply: false,
            is_repost: false,
            subreddit: None,
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize_twitter(&RawTwitter::default()).is_empty());
    }

    #[test]
    fn normalizes_each_post() {
        let raw = RawTwitter {
            tweets: vec![sample_post("1"), sample_post("2")],
        };
        let items = normalize_twitter(&raw);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].platform, Platform::Twitter);
    }

    #[test]
    fn reddit_combines_posts_and_comments() {
        let raw = RawReddit {
            posts: vec![sample_post("p1")],
            comments: vec![RawRedditComment {
                id: "c1".into(),
                url: "https://reddit.com/c1".into(),
                content: "nice post".into(),
                created_at: Utc::now(),
                parent_title: "parent".into(),
                parent_url: "https://reddit.com/parent".into(),
                subreddit: "rust".into(),
                score: 10,
                is_op: false,
            }],
        };
        let items = normalize_reddit(&raw);
        assert_eq!(items.len(), 2);
        assert!(items.iter().any(|i| matches!(i.payload, ItemPayload::Comment { .. })));
    }
}
