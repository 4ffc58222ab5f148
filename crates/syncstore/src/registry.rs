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

//! Monitored-instance registry.
//!
//! The registry is deliberately a dumb map: `register` on an existing id
//! silently overwrites. Idempotency for double registration is enforced one
//! layer up, in [`crate::SyncStorageMonitor`], which checks `has` before
//! registering. Keeping the registry dumb keeps that policy in one place.

use crate::SyncStorage;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A monitored sync store instance and its metadata.
#[derive(Clone)]
pub struct InstanceInfo {
    /// Identifier the instance was registered under.
    pub instance_id: String,
    /// The instance handle itself.
    pub handle: Arc<dyn SyncStorage>,
    /// Whether the instance is encrypted.
    pub encrypted: bool,
    /// Whether the instance rejects writes.
    pub read_only: bool,
}

impl std::fmt::Debug for InstanceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceInfo")
            .field("instance_id", &self.instance_id)
            .field("encrypted", &self.encrypted)
            .field("read_only", &self.read_only)
            .finish()
    }
}

/// Map from instance id to handle + metadata.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: RwLock<HashMap<String, InstanceInfo>>,
}

impl InstanceRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or overwrite) an instance.
    pub fn register(&self, info: InstanceInfo) {
        self.instances
            .write()
            .expect("instance registry lock poisoned")
            .insert(info.instance_id.clone(), info);
    }

    /// Remove an instance, returning it if present.
    pub fn unregister(&self, instance_id: &str) -> Option<InstanceInfo> {
        self.instances
            .write()
            .expect("instance registry lock poisoned")
            .remove(instance_id)
    }

    /// Look up an instance by id.
    pub fn get(&self, instance_id: &str) -> Option<InstanceInfo> {
        self.instances
            .read()
            .expect("instance registry lock poisoned")
            .get(instance_id)
            .cloned()
    }

    /// Every registered instance.
    pub fn get_all(&self) -> Vec<InstanceInfo> {
        self.instances
            .read()
            .expect("instance registry lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Whether `instance_id` is registered.
    pub fn has(&self, instance_id: &str) -> bool {
        self.instances
            .read()
            .expect("instance registry lock poisoned")
            .contains_key(instance_id)
    }

    /// Number of registered instances.
    pub fn count(&self) -> usize {
        self.instances
            .read()
            .expect("instance registry lock poisoned")
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySyncStorage;

    fn info(id: &str, encrypted: bool) -> InstanceInfo {
        InstanceInfo {
            instance_id: id.to_string(),
            handle: Arc::new(MemorySyncStorage::new()),
            encrypted,
            read_only: false,
        }
    }

    #[test]
    fn test_register_lookup_unregister() {
        let registry = InstanceRegistry::new();
        registry.register(info("cache", false));

        assert!(registry.has("cache"));
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get("cache").unwrap().instance_id, "cache");
        assert!(registry.get("other").is_none());

        let removed = registry.unregister("cache").unwrap();
        assert_eq!(removed.instance_id, "cache");
        assert!(!registry.has("cache"));
        assert!(registry.unregister("cache").is_none());
    }

    #[test]
    fn test_register_overwrites_silently() {
        // Dumb-store semantics: last registration wins. The monitor layer is
        // responsible for not re-registering a live id.
        let registry = InstanceRegistry::new();
        registry.register(info("cache", false));
        registry.register(info("cache", true));

        assert_eq!(registry.count(), 1);
        assert!(registry.get("cache").unwrap().encrypted);
    }

    #[test]
    fn test_get_all() {
        let registry = InstanceRegistry::new();
        registry.register(info("a", false));
        registry.register(info("b", true));

        let mut ids: Vec<String> = registry
            .get_all()
            .into_iter()
            .map(|info| info.instance_id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
