//! Integration tests for the cache/store flow: populate on miss, check
//! through the manager, invalidate on mutation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use binauth::{
    Action, Grant, InMemoryGrantStore, PermissionCache, PermissionStore, PermissionsManager,
    ScopeRegistry,
};

fn manager() -> Arc<PermissionsManager> {
    let tasks = ScopeRegistry::builder("tasks")
        .described_action("CREATE", 1 << 0, "Create new tasks")
        .described_action("READ", 1 << 1, "View tasks")
        .described_action("UPDATE", 1 << 2, "Edit tasks")
        .described_action("DELETE", 1 << 3, "Remove tasks")
        .build()
        .unwrap();
    Arc::new(PermissionsManager::new([tasks]))
}

type Store = PermissionStore<InMemoryGrantStore<Grant<u64>>, Grant<u64>>;

// The flow a request handler runs: serve from the cache when fresh,
// otherwise read the store and populate the cache.
async fn permissions_for(
    store: &Store,
    cache: &PermissionCache<u64>,
    subject: u64,
) -> HashMap<String, u32> {
    if let Some(cached) = cache.get(&subject) {
        return cached;
    }
    let permissions = store.get_all_user_permissions(&subject).await.unwrap();
    cache.set(subject, permissions.clone());
    permissions
}

fn action(manager: &PermissionsManager, name: &str) -> Action {
    manager
        .get_registry("tasks")
        .unwrap()
        .action(name)
        .unwrap()
        .clone()
}

#[tokio::test]
async fn cache_populates_on_miss_and_serves_checks() {
    let manager = manager();
    let store = Store::new(InMemoryGrantStore::new(), manager.clone());
    let cache = PermissionCache::new(Duration::from_secs(60));
    let create = action(&manager, "CREATE");

    store.set_permission(1, "tasks", 3).await.unwrap();

    let permissions = permissions_for(&store, &cache, 1).await;
    assert!(manager
        .check_permission(&permissions, "tasks", &create)
        .unwrap());

    // Second lookup is served from the cache even after the grant is
    // deleted underneath it.
    store.delete_permission(&1, "tasks").await.unwrap();
    let cached = permissions_for(&store, &cache, 1).await;
    assert_eq!(cached.get("tasks"), Some(&3));
}

#[tokio::test]
async fn mutation_then_invalidate_is_visible() {
    let manager = manager();
    let store = Store::new(InMemoryGrantStore::new(), manager.clone());
    let cache = PermissionCache::new(Duration::from_secs(60));
    let delete = action(&manager, "DELETE");

    store.set_permission(1, "tasks", 15).await.unwrap();
    permissions_for(&store, &cache, 1).await;

    // Mutate through the store, then honor the liveness contract.
    store.revoke_actions(1, "tasks", &[&delete]).await.unwrap();
    cache.invalidate(&1);

    let fresh = permissions_for(&store, &cache, 1).await;
    assert_eq!(fresh.get("tasks"), Some(&7));
}

#[tokio::test]
async fn zero_ttl_always_reads_the_store() {
    let manager = manager();
    let store = Store::new(InMemoryGrantStore::new(), manager.clone());
    let cache = PermissionCache::new(Duration::ZERO);

    store.set_permission(1, "tasks", 1).await.unwrap();
    permissions_for(&store, &cache, 1).await;

    store.set_permission(1, "tasks", 2).await.unwrap();
    // No invalidation needed: nothing was ever cached.
    let fresh = permissions_for(&store, &cache, 1).await;
    assert_eq!(fresh.get("tasks"), Some(&2));
}

#[tokio::test]
async fn concurrent_checks_share_the_cache() {
    let manager = manager();
    let store = Arc::new(Store::new(InMemoryGrantStore::new(), manager.clone()));
    let cache = Arc::new(PermissionCache::new(Duration::from_secs(60)));

    store.set_permission(1, "tasks", 3).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let permissions = permissions_for(&store, &cache, 1).await;
            permissions.get("tasks").copied()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), Some(3));
    }
    assert_eq!(cache.len(), 1);
}
