use activity_core::text::derive_title;
use activity_core::{ItemPayload, Platform, TimelineItem};
use activity_providers::RawYoutube;

/// Normalize YouTube video items into timeline entries.
pub fn normalize_youtube(raw: &RawYoutube) -> Vec<TimelineItem> {
    raw.videos
        .iter()
        .map(|v| TimelineItem {
            id: format!("youtube:video:{}", v.video_id),
            platform: Platform::Youtube,
            timestamp: v.published_at,
            title: derive_title(&v.title),
            url: v.url.clone(),
            payload: ItemPayload::Video {
                video_id: v.video_id.clone(),
                channel: v.channel.clone(),
                duration_seconds: v.duration_seconds as i64,
                view_count: v.view_count as i64,
                like_count: v.like_count as i64,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize_youtube(&RawYoutube::default()).is_empty());
    }
}
