use activity_core::text::derive_title;
use activity_core::{ItemPayload, Platform, TimelineItem};
use activity_providers::RawDevpad;

/// Normalize Devpad task items into timeline entries.
pub fn normalize_devpad(raw: &RawDevpad) -> Vec<TimelineItem> {
    raw.tasks
        .iter()
        .map(|t| TimelineItem {
            id: format!("devpad:task:{}", t.task_id),
            platform: Platform::Devpad,
            timestamp: t.updated_at,
            title: derive_title(&t.title),
            url: t.url.clone(),
            payload: ItemPayload::Task {
                task_id: t.task_id.clone(),
                status: t.status.clone(),
                project: Some(t.project.clone()),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize_devpad(&RawDevpad::default()).is_empty());
    }
}
