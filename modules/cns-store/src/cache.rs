//! In-memory mirror of the `cns` prefix. Written only by the classifier;
//! read by the matchmaker, connection writer, and propagator/updater.
//!
//! Mirrors the lifecycle of the teacher's `SignalCache`: loaded once at
//! connect time (`Cache::load`), then kept current by individual mutations
//! as watch events arrive — no periodic reload.

use std::collections::HashMap;

use crate::key;
use crate::client::StoreClient;

#[derive(Debug, Default)]
pub struct Cache {
    entries: HashMap<String, String>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the full `cns` prefix at connect time.
    pub async fn load(client: &StoreClient) -> anyhow::Result<Self> {
        let entries = client.all(key::ROOT_SEGMENT).await?;
        tracing::info!(entries = entries.len(), "cache loaded");
        Ok(Self { entries })
    }

    pub fn put(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }

    pub fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Wildcard filter over the cache; see `key::filter` for the glob rules.
    pub fn filter(&self, pattern: &str) -> HashMap<&str, &str> {
        key::filter(&self.entries, pattern)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete() {
        let mut cache = Cache::new();
        cache.put("cns/n1/name".to_string(), "Net One".to_string());
        assert_eq!(cache.get("cns/n1/name"), Some("Net One"));
        cache.delete("cns/n1/name");
        assert_eq!(cache.get("cns/n1/name"), None);
    }

    #[test]
    fn filter_delegates_to_key_module() {
        let mut cache = Cache::new();
        cache.put("cns/n1/name".to_string(), "Net One".to_string());
        cache.put("cns/n2/name".to_string(), "Net Two".to_string());
        cache.put("cns/n1/orchestrator".to_string(), "bysystem".to_string());
        let matched = cache.filter("cns/*/name");
        assert_eq!(matched.len(), 2);
    }
}
