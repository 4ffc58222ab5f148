// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of Storelens.
//
// Storelens is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// Storelens is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with Storelens. If not, see <https://www.gnu.org/licenses/>.

//! In-memory async store implementation.
//!
//! ## Purpose
//! HashMap-based [`AsyncStorage`] backend for tests and host environments
//! without the native module. Implements the same JSON merge semantics the
//! real backend applies in `merge_item`.

use crate::{AsyncStorage, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory [`AsyncStorage`] implementation.
///
/// ## Example
/// ```rust
/// use storelens_asyncstore::{AsyncStorage, MemoryAsyncStorage};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryAsyncStorage::new();
/// store.set_item("user.name", "Ann").await?;
/// assert_eq!(store.get_item("user.name").await?, Some("Ann".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MemoryAsyncStorage {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryAsyncStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `incoming` into `existing` the way the real backend does:
    /// deep-merge when both sides are JSON objects, replace otherwise.
    fn merge_values(existing: Option<&str>, incoming: &str) -> String {
        let Some(existing) = existing else {
            return incoming.to_string();
        };
        match (
            serde_json::from_str::<Value>(existing),
            serde_json::from_str::<Value>(incoming),
        ) {
            (Ok(Value::Object(mut base)), Ok(Value::Object(patch))) => {
                for (key, value) in patch {
                    Self::merge_json(&mut base, key, value);
                }
                Value::Object(base).to_string()
            }
            _ => incoming.to_string(),
        }
    }

    fn merge_json(base: &mut serde_json::Map<String, Value>, key: String, value: Value) {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(patch)) => {
                for (nested_key, nested_value) in patch {
                    Self::merge_json(existing, nested_key, nested_value);
                }
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[async_trait]
impl AsyncStorage for MemoryAsyncStorage {
    async fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.data
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.data.write().await.remove(key);
        Ok(())
    }

    async fn merge_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let merged = Self::merge_values(data.get(key).map(String::as_str), value);
        data.insert(key.to_string(), merged);
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.data.write().await.clear();
        Ok(())
    }

    async fn multi_set(&self, pairs: &[(String, String)]) -> StoreResult<()> {
        let mut data = self.data.write().await;
        for (key, value) in pairs {
            data.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn multi_remove(&self, keys: &[String]) -> StoreResult<()> {
        let mut data = self.data.write().await;
        for key in keys {
            data.remove(key);
        }
        Ok(())
    }

    async fn multi_merge(&self, pairs: &[(String, String)]) -> StoreResult<()> {
        let mut data = self.data.write().await;
        for (key, value) in pairs {
            let merged = Self::merge_values(data.get(key).map(String::as_str), value);
            data.insert(key.clone(), merged);
        }
        Ok(())
    }

    async fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn get_all_keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.data.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryAsyncStorage::new();

        store.set_item("k", "v").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap(), Some("v".to_string()));

        store.remove_item("k").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap(), None);

        // Removing an absent key is idempotent
        store.remove_item("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryAsyncStorage::new();
        store.set_item("a", "1").await.unwrap();
        store.set_item("b", "2").await.unwrap();

        store.clear().await.unwrap();
        assert!(store.get_all_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_multi_operations() {
        let store = MemoryAsyncStorage::new();
        store
            .multi_set(&[
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), "3".to_string()),
            ])
            .await
            .unwrap();

        let mut keys = store.get_all_keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "c"]);

        store
            .multi_remove(&["a".to_string(), "c".to_string()])
            .await
            .unwrap();
        assert_eq!(store.get_all_keys().await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_merge_deep_objects() {
        let store = MemoryAsyncStorage::new();
        store
            .set_item("user", r#"{"name":"Ann","prefs":{"theme":"dark","size":12}}"#)
            .await
            .unwrap();
        store
            .merge_item("user", r#"{"prefs":{"theme":"light"},"age":30}"#)
            .await
            .unwrap();

        let merged: Value =
            serde_json::from_str(&store.get_item("user").await.unwrap().unwrap()).unwrap();
        assert_eq!(merged["name"], "Ann");
        assert_eq!(merged["age"], 30);
        assert_eq!(merged["prefs"]["theme"], "light");
        assert_eq!(merged["prefs"]["size"], 12);
    }

    #[tokio::test]
    async fn test_merge_non_json_replaces() {
        let store = MemoryAsyncStorage::new();
        store.set_item("k", "plain text").await.unwrap();
        store.merge_item("k", r#"{"a":1}"#).await.unwrap();
        assert_eq!(
            store.get_item("k").await.unwrap(),
            Some(r#"{"a":1}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_merge_absent_key_inserts() {
        let store = MemoryAsyncStorage::new();
        store.merge_item("k", r#"{"a":1}"#).await.unwrap();
        assert_eq!(
            store.get_item("k").await.unwrap(),
            Some(r#"{"a":1}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_multi_merge() {
        let store = MemoryAsyncStorage::new();
        store.set_item("a", r#"{"x":1}"#).await.unwrap();
        store
            .multi_merge(&[
                ("a".to_string(), r#"{"y":2}"#.to_string()),
                ("b".to_string(), r#"{"z":3}"#.to_string()),
            ])
            .await
            .unwrap();

        let a: Value = serde_json::from_str(&store.get_item("a").await.unwrap().unwrap()).unwrap();
        assert_eq!(a["x"], 1);
        assert_eq!(a["y"], 2);
        assert_eq!(
            store.get_item("b").await.unwrap(),
            Some(r#"{"z":3}"#.to_string())
        );
    }
}
