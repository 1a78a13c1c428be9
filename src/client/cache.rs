use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;

/// Cache key for a query result: the entity name plus, for by-id queries,
/// the record id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub entity: &'static str,
    pub id: Option<String>,
}

impl QueryKey {
    pub fn list(entity: &'static str) -> Self {
        Self { entity, id: None }
    }

    pub fn item(entity: &'static str, id: impl Into<String>) -> Self {
        Self { entity, id: Some(id.into()) }
    }
}

/// Query result cache shared by every hook on one client. Mutation success
/// invalidates by entity name, so staleness between cache and store is
/// bounded by the next mutation, not by time.
#[derive(Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, Value>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &QueryKey) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn put(&self, key: QueryKey, value: Value) {
        self.entries.write().await.insert(key, value);
    }

    /// Drop every cached query for an entity, list and by-id alike.
    pub async fn invalidate(&self, entity: &str) {
        self.entries.write().await.retain(|key, _| key.entity != entity);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn invalidation_is_scoped_to_the_entity() {
        let cache = QueryCache::new();
        cache.put(QueryKey::list("tickets"), json!([1])).await;
        cache.put(QueryKey::item("tickets", "t1"), json!(1)).await;
        cache.put(QueryKey::list("users"), json!([2])).await;

        cache.invalidate("tickets").await;

        assert!(cache.get(&QueryKey::list("tickets")).await.is_none());
        assert!(cache.get(&QueryKey::item("tickets", "t1")).await.is_none());
        assert!(cache.get(&QueryKey::list("users")).await.is_some());
    }

    #[tokio::test]
    async fn clear_empties_everything() {
        let cache = QueryCache::new();
        cache.put(QueryKey::list("tickets"), json!([])).await;
        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }
}
