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

//! Zero-subscriber fast path: with nobody subscribed, monitoring an instance
//! must not run type detection at all. Verified with a counting decorator
//! around the store's typed getters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storelens_events::{IgnoredKeySet, ListenerBus, StorageValue};
use storelens_syncstore::{
    InstanceOptions, MemorySyncStorage, SyncResult, SyncStorage, SyncStorageMonitor,
    ValueChangedHandle, ValueChangedListener,
};

/// Decorator counting every typed-getter call reaching the inner store.
struct CountingStore {
    inner: MemorySyncStorage,
    typed_reads: Arc<AtomicUsize>,
}

impl CountingStore {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let typed_reads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner: MemorySyncStorage::new(),
                typed_reads: Arc::clone(&typed_reads),
            },
            typed_reads,
        )
    }

    fn count(&self) {
        self.typed_reads.fetch_add(1, Ordering::SeqCst);
    }
}

impl SyncStorage for CountingStore {
    fn set(&self, key: &str, value: StorageValue) -> SyncResult<()> {
        self.inner.set(key, value)
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.count();
        self.inner.get_string(key)
    }

    fn get_number(&self, key: &str) -> Option<f64> {
        self.count();
        self.inner.get_number(key)
    }

    fn get_boolean(&self, key: &str) -> Option<bool> {
        self.count();
        self.inner.get_boolean(key)
    }

    fn get_buffer(&self, key: &str) -> Option<Vec<u8>> {
        self.count();
        self.inner.get_buffer(key)
    }

    fn delete(&self, key: &str) -> SyncResult<()> {
        self.inner.delete(key)
    }

    fn clear_all(&self) -> SyncResult<()> {
        self.inner.clear_all()
    }

    fn get_all_keys(&self) -> Vec<String> {
        self.inner.get_all_keys()
    }

    fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn on_value_changed(&self, listener: ValueChangedListener) -> Option<ValueChangedHandle> {
        self.inner.on_value_changed(listener)
    }
}

#[test]
fn zero_subscribers_means_zero_detection() {
    let bus = Arc::new(ListenerBus::new());
    let monitor = SyncStorageMonitor::new(Arc::clone(&bus), Arc::new(IgnoredKeySet::new()));

    let (counting, typed_reads) = CountingStore::new();
    let store = monitor.add_instance("cache", Arc::new(counting), InstanceOptions::default());

    for i in 0..10_000 {
        store
            .set(&format!("key:{}", i), StorageValue::Number(i as f64))
            .unwrap();
    }

    // Every write fired the native notification, but with no subscribers the
    // detector must never have probed a getter.
    assert_eq!(typed_reads.load(Ordering::SeqCst), 0);
}

#[test]
fn detection_runs_once_subscribed() {
    let bus = Arc::new(ListenerBus::new());
    let monitor = SyncStorageMonitor::new(Arc::clone(&bus), Arc::new(IgnoredKeySet::new()));

    let (counting, typed_reads) = CountingStore::new();
    let store = monitor.add_instance("cache", Arc::new(counting), InstanceOptions::default());

    bus.subscribe(|_| {});
    store.set("k", StorageValue::Number(1.0)).unwrap();

    // Native path probed string then number for the changed key
    assert_eq!(typed_reads.load(Ordering::SeqCst), 2);
}
