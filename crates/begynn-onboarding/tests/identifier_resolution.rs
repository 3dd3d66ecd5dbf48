//! Integration tests: the component resolves, persists and reuses the
//! installation identifier through a host-supplied store.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;

use begynn_onboarding::application::{
    ComponentState, EventCallbacks, KeyValueStore, OnboardingBridge, StoreError, UID_STORAGE_KEY,
};
use begynn_onboarding::domain::{OnboardingConfig, UidSource};
use begynn_onboarding::infrastructure::{FileStore, STORE_FILE_NAME};

mock! {
    Store {}

    #[async_trait]
    impl KeyValueStore for Store {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    }
}

fn is_v4_layout(uid: &str) -> bool {
    let chars: Vec<char> = uid.chars().collect();
    chars.len() == 36
        && chars.iter().enumerate().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => *c == '-',
            _ => c.is_ascii_hexdigit() && !c.is_ascii_uppercase(),
        })
        && chars[14] == '4'
        && matches!(chars[19], '8' | '9' | 'a' | 'b')
}

fn resolving_bridge(store: Arc<dyn KeyValueStore>) -> OnboardingBridge {
    let config = OnboardingConfig::new("welcome", UidSource::Resolve);
    OnboardingBridge::new(config, EventCallbacks::new()).with_identifier_store(store)
}

fn scratch_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("begynn-it-{}", begynn_core::generate_uid()))
        .join(STORE_FILE_NAME)
}

#[tokio::test]
async fn test_empty_store_gets_a_fresh_v4_identifier() {
    // Arrange
    let mut store = MockStore::new();
    store.expect_get().times(1).returning(|_| Ok(None));
    store
        .expect_set()
        .withf(|key: &str, value: &str| key == UID_STORAGE_KEY && is_v4_layout(value))
        .times(1)
        .returning(|_, _| Ok(()));
    let mut bridge = resolving_bridge(Arc::new(store));

    // Act
    bridge.mount().await;

    // Assert
    let uid = bridge.uid().expect("ready after mount").to_string();
    assert!(is_v4_layout(&uid), "{uid}");
    assert_eq!(
        bridge.url(),
        Some(format!("https://begynn.com/render/welcome?uid={uid}").as_str())
    );
}

#[tokio::test]
async fn test_stored_identifier_is_reused_without_writing() {
    let mut store = MockStore::new();
    store
        .expect_get()
        .withf(|key: &str| key == UID_STORAGE_KEY)
        .returning(|_| Ok(Some("abc-123".to_string())));
    store.expect_set().never();
    let mut bridge = resolving_bridge(Arc::new(store));

    let state = bridge.mount().await.clone();

    assert_eq!(
        state,
        ComponentState::Ready {
            uid: "abc-123".to_string(),
            url: "https://begynn.com/render/welcome?uid=abc-123".to_string(),
        }
    );
}

#[tokio::test]
async fn test_broken_store_still_produces_an_identifier() {
    // Arrange: both operations fail
    let mut store = MockStore::new();
    store
        .expect_get()
        .returning(|_| Err(StoreError::Unavailable("keychain locked".to_string())));
    store
        .expect_set()
        .returning(|_, _| Err(StoreError::Unavailable("keychain locked".to_string())));
    let mut bridge = resolving_bridge(Arc::new(store));

    // Act
    bridge.mount().await;

    // Assert
    assert!(bridge.uid().is_some_and(is_v4_layout));
}

#[tokio::test]
async fn test_file_store_identifier_is_stable_across_launches() {
    // Arrange
    let path = scratch_path();

    // Act: two "launches" over the same file
    let mut first = resolving_bridge(Arc::new(FileStore::new(&path)));
    first.mount().await;
    let mut second = resolving_bridge(Arc::new(FileStore::new(&path)));
    second.mount().await;

    // Assert
    assert!(first.uid().is_some());
    assert_eq!(first.uid(), second.uid());

    if let Some(dir) = path.parent() {
        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}

#[tokio::test]
async fn test_provided_and_preview_never_touch_the_store() {
    for source in [UidSource::Provided("host-user".to_string()), UidSource::Preview] {
        let mut store = MockStore::new();
        store.expect_get().never();
        store.expect_set().never();
        let config = OnboardingConfig::new("welcome", source);
        let mut bridge: OnboardingBridge =
            OnboardingBridge::new(config, EventCallbacks::new()).with_identifier_store(Arc::new(store));

        bridge.mount().await;

        assert!(bridge.url().is_some());
    }
}
