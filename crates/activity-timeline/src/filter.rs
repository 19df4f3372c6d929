use activity_core::TimelineItem;
use activity_store::{FilterKey, FilterType, ProfileFilter};

/// Apply one account's profile filters to that account's items.
/// `items` must already be scoped to the filters' `account_id`.
///
/// Include filters on the same key are OR'd together (a item survives if
/// it matches any of the allowed values); include filters across keys are
/// AND'd (each key's stage is applied in sequence, so an item must
/// survive every stage it's subject to).
pub fn apply_account_filters(items: Vec<TimelineItem>, filters: &[&ProfileFilter]) -> Vec<TimelineItem> {
    let repo_includes: Vec<&str> = values_for(filters, FilterType::Include, FilterKey::Repo);
    let subreddit_includes: Vec<&str> = values_for(filters, FilterType::Include, FilterKey::Subreddit);
    let repo_excludes: Vec<&str> = values_for(filters, FilterType::Exclude, FilterKey::Repo);
    let subreddit_excludes: Vec<&str> = values_for(filters, FilterType::Exclude, FilterKey::Subreddit);
    let keyword_excludes: Vec<String> = values_for(filters, FilterType::Exclude, FilterKey::Keyword)
        .into_iter()
        .map(|v| v.to_lowercase())
        .collect();

    items
        .into_iter()
        .filter(|item| {
            if !repo_includes.is_empty() {
                if let Some(repo) = item.payload.repo() {
                    if !repo_includes.contains(&repo) {
                        return false;
                    }
                }
            }
            if !subreddit_includes.is_empty() {
                if let Some(subreddit) = item.payload.subreddit() {
                    if !subreddit_includes.contains(&subreddit) {
                        return false;
                    }
                }
            }
            if let Some(repo) = item.payload.repo() {
                if repo_excludes.contains(&repo) {
                    return false;
                }
            }
            if let Some(subreddit) = item.payload.subreddit() {
                if subreddit_excludes.contains(&subreddit) {
                    return false;
                }
            }
            if !keyword_excludes.is_empty() {
                let text = item.payload.content_text().unwrap_or(&item.title).to_lowercase();
                if keyword_excludes.iter().any(|kw| text.contains(kw.as_str())) {
                    return false;
                }
            }
            true
        })
        .collect()
}

fn values_for<'a>(filters: &[&'a ProfileFilter], filter_type: FilterType, key: FilterKey) -> Vec<&'a str> {
    filters
        .iter()
        .filter(|f| f.filter_type == filter_type && f.filter_key == key)
        .map(|f| f.filter_value.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use activity_core::{ItemPayload, Platform};
    use chrono::Utc;

    fn commit(id: &str, repo: &str) -> TimelineItem {
        TimelineItem {
            id: id.into(),
            platform: Platform::Github,
            timestamp: Utc::now(),
            title: id.into(),
            url: "https://example.com".into(),
            payload: ItemPayload::Commit {
                sha: id.into(),
                message: id.into(),
                repo: repo.into(),
                branch: "main".into(),
                additions: 0,
                deletions: 0,
                files_changed: 0,
            },
        }
    }

    fn filter(filter_type: FilterType, filter_key: FilterKey, value: &str) -> ProfileFilter {
        ProfileFilter {
            id: "f1".into(),
            profile_id: "p1".into(),
            account_id: "a1".into(),
            filter_type,
            filter_key,
            filter_value: value.into(),
        }
    }

    #[test]
    fn include_repo_keeps_only_matching_repos() {
        let items = vec![commit("a", "org/one"), commit("b", "org/two")];
        let f = filter(FilterType::Include, FilterKey::Repo, "org/one");
        let filtered = apply_account_filters(items, &[&f]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a");
    }

    #[test]
    fn multiple_includes_on_same_key_are_ored() {
        let items = vec![commit("a", "org/one"), commit("b", "org/two"), commit("c", "org/three")];
        let f1 = filter(FilterType::Include, FilterKey::Repo, "org/one");
        let f2 = filter(FilterType::Include, FilterKey::Repo, "org/two");
        let filtered = apply_account_filters(items, &[&f1, &f2]);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn exclude_repo_drops_matching_items() {
        let items = vec![commit("a", "org/one"), commit("b", "org/two")];
        let f = filter(FilterType::Exclude, FilterKey::Repo, "org/two");
        let filtered = apply_account_filters(items, &[&f]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a");
    }

    #[test]
    fn exclude_keyword_is_case_insensitive() {
        let mut item = commit("a", "org/one");
        item.payload = ItemPayload::Commit {
            sha: "a".into(),
            message: "Fix CRITICAL bug".into(),
            repo: "org/one".into(),
            branch: "main".into(),
            additions: 0,
            deletions: 0,
            files_changed: 0,
        };
        let f = filter(FilterType::Exclude, FilterKey::Keyword, "critical");
        let filtered = apply_account_filters(vec![item], &[&f]);
        assert!(filtered.is_empty());
    }
}
