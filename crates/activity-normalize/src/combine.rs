use std::collections::HashMap;

use activity_core::{CommitGroup, CommitGroupTag, DateGroup, Entry, ItemPayload, TimelineItem};
use chrono::NaiveDate;

/// Commit items are grouped by `(repo, branch, day)`;
/// every other item passes through unchanged. Emitted order preserves the
/// first-appearance order of each group's first member, interleaved with
/// passthrough items.
pub fn group_commits(items: Vec<TimelineItem>) -> Vec<Entry> {
    let mut output: Vec<Entry> = Vec::with_capacity(items.len());
    let mut group_index: HashMap<(String, String, NaiveDate), usize> = HashMap::new();

    for item in items {
        let ItemPayload::Commit {
            ref repo,
            ref branch,
            additions,
            deletions,
            files_changed,
            ..
        } = item.payload
        else {
            output.push(Entry::Item(item));
            continue;
        };

        let date = item.timestamp.date_naive();
        let key = (repo.clone(), branch.clone(), date);

        if let Some(&idx) = group_index.get(&key) {
            if let Entry::CommitGroup(group) = &mut output[idx] {
                group.total_additions += additions;
                group.total_deletions += deletions;
                group.total_files_changed += files_changed;
                group.commits.push(item);
            }
        } else {
            group_index.insert(key.clone(), output.len());
            output.push(Entry::CommitGroup(CommitGroup {
                kind: CommitGroupTag::CommitGroup,
                repo: key.0,
                branch: key.1,
                date: key.2,
                total_additions: additions,
                total_deletions: deletions,
                total_files_changed: files_changed,
                commits: vec![item],
            }));
        }
    }

    output
}

fn sort_key(entry: &Entry) -> String {
    match entry {
        Entry::Item(i) => i.id.clone(),
        Entry::CommitGroup(g) => g
            .commits
            .first()
            .map(|c| c.id.clone())
            .unwrap_or_default(),
    }
}

/// Stable sort descending by timestamp, ties
/// broken by id ascending for determinism.
pub fn combine_timelines(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by(|a, b| {
        b.sort_timestamp()
            .cmp(&a.sort_timestamp())
            .then_with(|| sort_key(a).cmp(&sort_key(b)))
    });
    entries
}

/// Bucket entries by the UTC day of each entry's sort
/// timestamp, preserving input order within a bucket. Buckets are
/// returned date-descending.
pub fn group_by_date(entries: Vec<Entry>) -> Vec<DateGroup> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut buckets: HashMap<NaiveDate, Vec<Entry>> = HashMap::new();

    for entry in entries {
        let date = entry.date_key();
        if !buckets.contains_key(&date) {
            order.push(date);
        }
        buckets.entry(date).or_default().push(entry);
    }

    order.sort_by(|a, b| b.cmp(a));
    order
        .into_iter()
        .map(|date| DateGroup {
            date,
            items: buckets.remove(&date).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use activity_core::Platform;
    use chrono::{TimeZone, Utc};

    fn commit(id: &str, repo: &str, branch: &str, ts: chrono::DateTime<Utc>) -> TimelineItem {
        TimelineItem {
            id: id.into(),
            platform: Platform::Github,
            timestamp: ts,
            title: id.into(),
            url: format!("https://github.com/{repo}/commit/{id}"),
            payload: ItemPayload::Commit {
                sha: id.into(),
                message: id.into(),
                repo: repo.into(),
                branch: branch.into(),
                additions: 1,
                deletions: 0,
                files_changed: 1,
            },
        }
    }

    #[test]
    fn groups_same_day_same_repo_branch_commits() {
        let day = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let items = vec![
            commit("aaa", "user/repo", "main", day),
            commit("bbb", "user/repo", "main", day + chrono::Duration::hours(1)),
            commit("ccc", "user/repo", "main", day + chrono::Duration::hours(2)),
        ];
        let entries = group_commits(items);
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            Entry::CommitGroup(g) => {
                assert_eq!(g.repo, "user/repo");
                assert_eq!(g.branch, "main");
                assert_eq!(g.commits.len(), 3);
                assert_eq!(
                    g.commits.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
                    vec!["aaa", "bbb", "ccc"]
                );
            }
            _ => panic!("expected a commit group"),
        }
    }

    #[test]
    fn passthrough_items_preserve_position() {
        let day = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let post = TimelineItem {
            id: "p1".into(),
            platform: Platform::Twitter,
            timestamp: day,
            title: "hi".into(),
            url: "https://twitter.com/x".into(),
            payload: ItemPayload::Post {
                author: "a".into(),
                content: "hi".into(),
                reply_count: 0,
                repost_count: 0,
                like_count: 0,
                has_media: false,
                is_reply: false,
                is_repost: false,
                subreddit: None,
            },
        };
        let items = vec![commit("aaa", "r", "main", day), post.clone()];
        let entries = group_commits(items);
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[1], Entry::Item(ref i) if i.id == "p1"));
    }

    #[test]
    fn combine_sorts_desc_with_id_tiebreak() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let old = Entry::Item(commit("old", "r", "b", base - chrono::Duration::days(2)));
        let new = Entry::Item(commit("new", "r", "b", base));
        let mid = Entry::Item(commit("mid", "r", "b", base - chrono::Duration::days(1)));
        let combined = combine_timelines(vec![old, new, mid]);
        let ids: Vec<_> = combined
            .iter()
            .map(|e| match e {
                Entry::Item(i) => i.id.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn group_by_date_returns_date_desc_buckets() {
        let d1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let d2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let entries = vec![
            Entry::Item(commit("a", "r", "b", d1)),
            Entry::Item(commit("b", "r", "b", d2)),
        ];
        let groups = group_by_date(entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, d2.date_naive());
        assert_eq!(groups[1].date, d1.date_naive());
    }
}
