use activity_core::Platform;
use activity_store::{Account, Directory, InMemoryDirectory, Profile, User};

fn test_account(id: &str, profile_id: &str) -> Account {
    Account {
        id: id.into(),
        profile_id: profile_id.into(),
        platform: Platform::Bluesky,
        platform_user_id: Some("p1".into()),
        platform_username: Some("alice".into()),
        access_token_encrypted: "enc".into(),
        refresh_token_encrypted: None,
        token_expires_at: None,
        is_active: true,
        last_fetched_at: None,
    }
}

#[tokio::test]
async fn list_active_accounts_page_covers_every_account_exactly_once() {
    let directory = InMemoryDirectory::new();
    let user = directory
        .create_user(User {
            id: "user-1".into(),
            external_user_id: "ext-1".into(),
            email: None,
            name: None,
        })
        .await
        .unwrap();
    let profile = directory
        .create_profile(Profile {
            id: "profile-1".into(),
            user_id: user.id.clone(),
            slug: "main".into(),
            name: "Main".into(),
            description: None,
            theme: None,
        })
        .await
        .unwrap();

    for i in 0..25 {
        let mut account = test_account(&format!("acct-{i:03}"), &profile.id);
        account.is_active = i % 2 == 0;
        directory.create_account(account).await.unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let (page, next) = directory.list_active_accounts_page(cursor.as_deref(), 4).await.unwrap();
        assert!(page.len() <= 4);
        seen.extend(page.into_iter().map(|a| a.id));
        match next {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }

    seen.sort();
    let mut expected: Vec<String> = (0..25).step_by(2).map(|i| format!("acct-{i:03}")).collect();
    expected.sort();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn list_active_accounts_page_empty_directory_returns_no_cursor() {
    let directory = InMemoryDirectory::new();
    let (page, next) = directory.list_active_accounts_page(None, 10).await.unwrap();
    assert!(page.is_empty());
    assert!(next.is_none());
}
