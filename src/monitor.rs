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

//! The devtools-owned monitoring context.
//!
//! ## Purpose
//! One object owning everything the storage-monitoring subsystem shares:
//! both listener buses, the ignored-key set, the sync instance monitor, and
//! the sync backend availability state. The devtools lifecycle constructs
//! exactly one of these; tests construct as many isolated ones as they like.
//! Nothing in storelens is a module-level global.

use crate::MonitorConfig;
use std::sync::Arc;
use storelens_asyncstore::{AsyncStorage, MonitoredAsyncStorage};
use storelens_events::{IgnoredKeySet, ListenerBus, StorageEvent, Subscription};
use storelens_syncstore::{
    InstanceOptions, MonitoredSyncStorage, SyncStorage, SyncStorageMonitor,
};

/// Owner of all shared monitoring state.
///
/// ## Example
/// ```rust
/// use storelens::StorageMonitor;
/// use storelens_asyncstore::{AsyncStorage, MemoryAsyncStorage};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let monitor = StorageMonitor::new();
/// let store = monitor.watch_async(MemoryAsyncStorage::new());
///
/// let _sub = monitor.add_async_listener(|event| {
///     println!("{} {:?}", event.operation, event.key);
/// });
/// store.start_listening();
/// store.set_item("user.name", "Ann").await?;
/// # Ok(())
/// # }
/// ```
pub struct StorageMonitor {
    async_bus: Arc<ListenerBus>,
    sync_bus: Arc<ListenerBus>,
    ignored: Arc<IgnoredKeySet>,
    sync_monitor: SyncStorageMonitor,
    enabled: bool,
    sync_backend_error: Option<String>,
}

impl StorageMonitor {
    /// Monitor with default configuration.
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    /// Monitor configured from environment variables.
    pub fn from_env() -> Self {
        Self::with_config(MonitorConfig::from_env())
    }

    /// Monitor with explicit configuration.
    pub fn with_config(config: MonitorConfig) -> Self {
        let ignored = Arc::new(IgnoredKeySet::with_defaults());
        for pattern in &config.extra_ignored_keys {
            ignored.insert(pattern.clone());
        }

        let sync_bus = Arc::new(ListenerBus::new());
        let sync_monitor = SyncStorageMonitor::new(Arc::clone(&sync_bus), Arc::clone(&ignored));

        if let Some(reason) = &config.sync_backend_error {
            tracing::debug!(%reason, "sync storage backend unavailable, registrations will no-op");
        }

        Self {
            async_bus: Arc::new(ListenerBus::new()),
            sync_bus,
            ignored,
            sync_monitor,
            enabled: config.enabled,
            sync_backend_error: config.sync_backend_error,
        }
    }

    /// Whether monitoring is active at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // =========================================================================
    // Async store surface
    // =========================================================================

    /// Wrap an async store for monitoring. The wrapper starts silent; call
    /// [`MonitoredAsyncStorage::start_listening`] to begin emitting.
    pub fn watch_async<S: AsyncStorage>(&self, store: S) -> MonitoredAsyncStorage<S> {
        MonitoredAsyncStorage::new(store, Arc::clone(&self.async_bus), Arc::clone(&self.ignored))
    }

    /// Subscribe to async store events. Returns `None` when monitoring is
    /// disabled. Dropping the returned guard detaches the subscriber; use
    /// [`Subscription::forget`] to keep it for the monitor's lifetime.
    pub fn add_async_listener(
        &self,
        callback: impl Fn(&StorageEvent) + Send + Sync + 'static,
    ) -> Option<Subscription> {
        if !self.enabled {
            tracing::debug!("monitoring disabled, async listener not registered");
            return None;
        }
        Some(ListenerBus::subscribe_on(&self.async_bus, callback))
    }

    /// Drop every async store subscriber.
    pub fn clear_async_listeners(&self) {
        self.async_bus.clear();
    }

    /// Number of async store subscribers.
    pub fn async_listener_count(&self) -> usize {
        self.async_bus.subscriber_count()
    }

    // =========================================================================
    // Sync store surface
    // =========================================================================

    /// Whether the sync backend loaded in this runtime.
    pub fn sync_backend_available(&self) -> bool {
        self.sync_backend_error.is_none()
    }

    /// Why the sync backend is unavailable, when it is.
    pub fn unavailability_reason(&self) -> Option<&str> {
        self.sync_backend_error.as_deref()
    }

    /// Register a sync store instance for monitoring, returning the wrapper
    /// to route traffic through.
    ///
    /// Safe no-op (returns `None`) when monitoring is disabled or the sync
    /// backend is unavailable. Registering an already-tracked id keeps the
    /// first registration.
    pub fn register_instance(
        &self,
        instance_id: &str,
        handle: Arc<dyn SyncStorage>,
        options: InstanceOptions,
    ) -> Option<MonitoredSyncStorage> {
        if !self.enabled {
            tracing::debug!(instance_id, "monitoring disabled, instance not registered");
            return None;
        }
        if let Some(reason) = &self.sync_backend_error {
            tracing::debug!(instance_id, %reason, "sync backend unavailable, instance not registered");
            return None;
        }
        Some(self.sync_monitor.add_instance(instance_id, handle, options))
    }

    /// Stop monitoring an instance. No-op if untracked.
    pub fn unregister_instance(&self, instance_id: &str) -> bool {
        self.sync_monitor.remove_instance(instance_id)
    }

    /// Whether an instance is currently monitored.
    pub fn has_instance(&self, instance_id: &str) -> bool {
        self.sync_monitor.has_instance(instance_id)
    }

    /// Ids of every monitored instance.
    pub fn monitored_instances(&self) -> Vec<String> {
        self.sync_monitor.monitored_instances()
    }

    /// Subscribe to sync store events. Returns `None` when monitoring is
    /// disabled. Dropping the returned guard detaches the subscriber; use
    /// [`Subscription::forget`] to keep it for the monitor's lifetime.
    pub fn add_sync_listener(
        &self,
        callback: impl Fn(&StorageEvent) + Send + Sync + 'static,
    ) -> Option<Subscription> {
        if !self.enabled {
            tracing::debug!("monitoring disabled, sync listener not registered");
            return None;
        }
        Some(ListenerBus::subscribe_on(&self.sync_bus, callback))
    }

    /// Drop every sync store subscriber.
    pub fn clear_sync_listeners(&self) {
        self.sync_bus.clear();
    }

    /// Number of sync store subscribers.
    pub fn sync_listener_count(&self) -> usize {
        self.sync_bus.subscriber_count()
    }

    // =========================================================================
    // Shared
    // =========================================================================

    /// Add an ignored-key pattern (exact key or prefix) at runtime.
    pub fn ignore_key(&self, pattern: impl Into<String>) {
        self.ignored.insert(pattern);
    }

    /// The shared ignored-key set.
    pub fn ignored_keys(&self) -> &Arc<IgnoredKeySet> {
        &self.ignored
    }
}

impl Default for StorageMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StorageMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageMonitor")
            .field("enabled", &self.enabled)
            .field("sync_backend_available", &self.sync_backend_available())
            .field("async_listeners", &self.async_listener_count())
            .field("sync_listeners", &self.sync_listener_count())
            .field("instances", &self.monitored_instances())
            .finish()
    }
}
