use activity_core::{DateGroup, Entry, TimelineItem};
use activity_normalize::{combine_timelines, group_by_date, group_commits};
use chrono::NaiveDate;

/// The optional `{ before, limit }` window a timeline read can request,
/// mirroring the `GET /profiles/:slug/timeline` query params.
#[derive(Debug, Clone, Copy, Default)]
pub struct Window {
    pub before: Option<NaiveDate>,
    pub limit: Option<usize>,
}

/// Drop date groups newer than `before`, then flatten/truncate/re-group
/// to `limit` total items.
pub fn apply_window(mut groups: Vec<DateGroup>, window: Window) -> Vec<DateGroup> {
    if let Some(before) = window.before {
        groups.retain(|g| g.date <= before);
    }

    if let Some(limit) = window.limit {
        let mut flat: Vec<TimelineItem> = Vec::new();
        for group in &groups {
            for entry in &group.items {
                match entry {
                    Entry::Item(item) => flat.push(item.clone()),
                    Entry::CommitGroup(commit_group) => flat.extend(commit_group.commits.iter().cloned()),
                }
            }
        }
        flat.truncate(limit);
        let entries = combine_timelines(group_commits(flat));
        groups = group_by_date(entries);
    }

    groups
}
