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

//! # Storelens
//!
//! ## Purpose
//! In-app developer-tools core for observing key-value storage traffic.
//! Storelens wraps an application's storage primitives transparently,
//! classifies each operation, suppresses the tool's own bookkeeping noise,
//! and fans the resulting events out synchronously to any number of devtools
//! subscribers — with zero overhead while nobody is watching.
//!
//! ## Architecture Context
//! Two store shapes are monitored, each through its own crate:
//!
//! - **Async store** ([`storelens_asyncstore`]): promise-style, one implicit
//!   global instance, string values, batch variants. Writes are intercepted;
//!   reads are not (the backend has no read notification).
//! - **Sync store** ([`storelens_syncstore`]): synchronous, multi-instance,
//!   typed getters with no type introspection. Monitoring combines native
//!   change notifications with a wrapping interceptor, and recovers value
//!   types by sequential probing.
//!
//! Both emit [`StorageEvent`]s through [`storelens_events`]; the
//! [`StorageMonitor`] context object owns all shared state, so tests can run
//! any number of isolated monitors.
//!
//! ## Examples
//!
//! ### Observe async store traffic
//! ```rust
//! use storelens::StorageMonitor;
//! use storelens_asyncstore::{AsyncStorage, MemoryAsyncStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let monitor = StorageMonitor::new();
//! let store = monitor.watch_async(MemoryAsyncStorage::new());
//!
//! let _sub = monitor.add_async_listener(|event| {
//!     println!("{}: {:?}", event.operation, event.key);
//! });
//!
//! store.start_listening();
//! store.set_item("user.name", "Ann").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Monitor a sync store instance
//! ```rust
//! use std::sync::Arc;
//! use storelens::StorageMonitor;
//! use storelens_events::StorageValue;
//! use storelens_syncstore::{InstanceOptions, MemorySyncStorage, SyncStorage};
//!
//! let monitor = StorageMonitor::new();
//! let _sub = monitor.add_sync_listener(|event| {
//!     println!("{} {} {:?}", event.instance_id, event.operation, event.key);
//! });
//!
//! let cache = monitor
//!     .register_instance(
//!         "cache",
//!         Arc::new(MemorySyncStorage::new()),
//!         InstanceOptions::default(),
//!     )
//!     .expect("monitoring enabled");
//! cache.set("count", StorageValue::Number(42.0)).unwrap();
//! ```
//!
//! ## Testing
//! ```bash
//! cargo test --workspace
//! cargo bench -p storelens-asyncstore
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod monitor;

pub use config::MonitorConfig;
pub use monitor::StorageMonitor;

pub use storelens_events::{
    EventPayload, IgnoredKeySet, ListenerBus, Operation, StorageEvent, StorageValue, Subscription,
    ValueKind, DEFAULT_INSTANCE_ID,
};
