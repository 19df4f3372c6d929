use std::sync::Arc;

use activity_core::{StoreId, TimelinePayload};
use activity_store::{Backend, Directory, ParentRef, Profile, PutOptions, Snapshot, Store};
use chrono::Utc;

use crate::error::TimelineError;
use crate::filter::apply_account_filters;
use crate::loader::load_account;
use crate::window::{apply_window, Window};
use activity_normalize::{combine_timelines, group_by_date, group_commits};

/// Assemble and persist `profile`'s timeline.
pub async fn assemble_profile_timeline(
    directory: &dyn Directory,
    backend: Arc<dyn Backend>,
    profile: &Profile,
    window: Window,
) -> Result<Snapshot<TimelinePayload>, TimelineError> {
    let accounts = directory
        .list_accounts_for_profile(&profile.id)
        .await?
        .into_iter()
        .filter(|a| a.is_active)
        .collect::<Vec<_>>();

    let all_filters = directory.list_filters_for_profile(&profile.id).await?;

    let mut items = Vec::new();
    let mut parents: Vec<ParentRef> = Vec::new();

    for account in &accounts {
        let loaded = load_account(backend.clone(), account).await?;
        let account_filters: Vec<_> = all_filters.iter().filter(|f| f.account_id == account.id).collect();
        let filtered = apply_account_filters(loaded.items, &account_filters);
        items.extend(filtered);
        parents.extend(loaded.parents);
    }

    let entries = combine_timelines(group_commits(items));
    let groups = group_by_date(entries);
    let groups = apply_window(groups, window);

    let payload = TimelinePayload {
        user_id: profile.user_id.clone(),
        generated_at: Utc::now(),
        groups,
        profile_id: Some(profile.id.clone()),
        profile_slug: Some(profile.slug.clone()),
        profile_name: Some(profile.name.clone()),
    };

    let store_id = StoreId::Timeline { user: profile.user_id.clone() }.to_string();
    let store: Store<TimelinePayload> = Store::new(backend, store_id);
    let meta = store.put(&payload, PutOptions::with_parents(parents)).await?;

    Ok(Snapshot { meta, data: payload })
}
