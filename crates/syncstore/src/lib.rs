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

//! # Storelens SyncStore
//!
//! ## Purpose
//! Models the synchronous, multi-instance, typed key-value store (the
//! high-performance native engine mobile apps use for hot state) and makes
//! its per-instance traffic observable to devtools: type detection over its
//! typed getters, an instance registry, and a monitoring layer combining
//! native change notifications with a wrapping interceptor.
//!
//! ## Architecture Context
//! ```text
//!              application code
//!                    │ set / get_number / delete / ...
//!                    ▼
//! ┌────────────────────────────────┐
//! │ MonitoredSyncStorage           │──typed events──▶ ListenerBus
//! └───────────────┬────────────────┘
//!                 │ delegates
//!                 ▼
//! ┌────────────────────────────────┐   native on_value_changed
//! │ handle: dyn SyncStorage        │────────────────────────────┐
//! └────────────────────────────────┘                            │
//!                 ▲                      key only, no type      ▼
//! ┌───────────────┴────────────────┐   ┌──────────────────────────────┐
//! │ InstanceRegistry (id → handle) │   │ detect() → Set/Delete event  │
//! └────────────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Key Components
//! - [`SyncStorage`]: the fixed external method contract (typed getters, no
//!   universal read, optional native change notification)
//! - [`MemorySyncStorage`]: in-memory implementation, including read-only and
//!   notification-less configurations
//! - [`detect_value`]: sequential-probe type detection
//! - [`InstanceRegistry`]: id → handle + metadata map
//! - [`SyncStorageMonitor`]: per-instance monitoring lifecycle
//!
//! ## Design Decisions
//! - **Dual emission**: a write observed through both the native notification
//!   and the wrapper emits twice, deliberately. The native path alone cannot
//!   recover types or see reads; the wrapper alone cannot see writes issued
//!   through other references to the same instance. Neither path is
//!   suppressed; subscribers that care can dedupe on (instance, key, time).
//! - **Graceful degradation**: instances without native change notifications
//!   (encrypted or otherwise restricted configurations) are monitored
//!   wrap-only, never rejected.
//!
//! ## Testing
//! ```bash
//! cargo test -p storelens-syncstore
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::sync::Arc;
use storelens_events::StorageValue;

pub mod detect;
pub mod error;
pub mod memory;
pub mod monitor;
pub mod registry;

pub use detect::{buffer_placeholder, detect_value, DetectedValue};
pub use error::{SyncResult, SyncStoreError};
pub use memory::MemorySyncStorage;
pub use monitor::{InstanceOptions, MonitoredSyncStorage, SyncStorageMonitor};
pub use registry::{InstanceInfo, InstanceRegistry};

/// Callback invoked with the changed key whenever an instance writes or
/// deletes. The notification carries the key only: no value, no type, no
/// operation kind.
pub type ValueChangedListener = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// Handle returned by [`SyncStorage::on_value_changed`]; removes the
/// registered listener when consumed.
pub struct ValueChangedHandle {
    remove: Box<dyn FnOnce() + Send>,
}

impl ValueChangedHandle {
    /// Wrap the removal action for a registered listener.
    pub fn new(remove: impl FnOnce() + Send + 'static) -> Self {
        Self {
            remove: Box::new(remove),
        }
    }

    /// Unregister the listener.
    pub fn remove(self) {
        (self.remove)()
    }
}

impl std::fmt::Debug for ValueChangedHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValueChangedHandle")
    }
}

/// The sync store's fixed method contract.
///
/// The real engine exposes one overloaded write, four typed readers that each
/// return nothing when the stored value is not of their type (or the key is
/// absent), and no type introspection call at all. [`detect_value`] exists
/// because of that last property.
pub trait SyncStorage: Send + Sync {
    /// Write `value` under `key`.
    fn set(&self, key: &str, value: StorageValue) -> SyncResult<()>;

    /// Read `key` as a string, if it holds one.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Read `key` as a number, if it holds one.
    fn get_number(&self, key: &str) -> Option<f64>;

    /// Read `key` as a boolean, if it holds one.
    fn get_boolean(&self, key: &str) -> Option<bool>;

    /// Read `key` as raw bytes, if it holds them.
    fn get_buffer(&self, key: &str) -> Option<Vec<u8>>;

    /// Remove `key`. Succeeds even if the key is absent.
    fn delete(&self, key: &str) -> SyncResult<()>;

    /// Remove every key in this instance.
    fn clear_all(&self) -> SyncResult<()>;

    /// List every key currently present.
    fn get_all_keys(&self) -> Vec<String>;

    /// Whether `key` is present.
    fn contains(&self, key: &str) -> bool;

    /// Whether this instance rejects writes.
    fn is_read_only(&self) -> bool {
        false
    }

    /// Number of keys currently present.
    fn size(&self) -> usize;

    /// Register a native value-changed listener, if this instance supports
    /// the mechanism. Returns `None` when unsupported; callers must probe,
    /// not assume, and degrade to wrap-only monitoring.
    fn on_value_changed(&self, listener: ValueChangedListener) -> Option<ValueChangedHandle> {
        let _ = listener;
        None
    }
}
