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

//! # Storelens AsyncStore
//!
//! ## Purpose
//! Models the promise-based key-value store mobile apps keep their string
//! state in: one implicit global instance, seven write operations, all async.
//! Provides the store contract, an in-memory backend, and the monitoring
//! wrapper that makes its traffic observable to devtools.
//!
//! ## Architecture Context
//! ```text
//! application code
//!       │  set_item / multi_set / clear / ...
//!       ▼
//! ┌───────────────────────────┐
//! │ MonitoredAsyncStorage<S>  │──emit──▶ ListenerBus ──▶ devtools UI
//! └───────────┬───────────────┘
//!             │ delegates, arguments untouched
//!             ▼
//! ┌───────────────────────────┐
//! │ S: AsyncStorage           │  (MemoryAsyncStorage, or the real backend)
//! └───────────────────────────┘
//! ```
//!
//! ## Key Components
//! - [`AsyncStorage`]: the fixed external method contract
//! - [`MemoryAsyncStorage`]: HashMap-backed implementation with JSON merge
//! - [`MonitoredAsyncStorage`]: transparent interception wrapper
//!
//! ## Design Decisions
//! - **Wrapper, not patching**: interception is a decorator implementing the
//!   same trait, so "restore the original methods" reduces to using the inner
//!   store directly; there is no per-method bookkeeping to corrupt.
//! - **Observability only**: event filtering never changes what is written;
//!   batch operations always run with their original, unfiltered arguments.
//!
//! ## Testing
//! ```bash
//! cargo test -p storelens-asyncstore
//! cargo bench -p storelens-asyncstore
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;

pub mod error;
pub mod memory;
pub mod monitor;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryAsyncStorage;
pub use monitor::MonitoredAsyncStorage;

/// The async store's fixed method contract.
///
/// Mirrors the promise-based storage API the monitored backend exposes:
/// string values, seven write operations (single and batch variants), plus
/// the two read operations devtools use to render store contents. Reads are
/// not intercepted; the backend has no read notification and the devtools UI
/// polls them directly.
#[async_trait]
pub trait AsyncStorage: Send + Sync {
    /// Write `value` under `key`, overwriting any existing value.
    async fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Succeeds even if the key is absent.
    async fn remove_item(&self, key: &str) -> StoreResult<()>;

    /// JSON-merge `value` into the existing value under `key`.
    ///
    /// When both the stored value and `value` parse as JSON objects they are
    /// deep-merged; otherwise `value` replaces the stored value.
    async fn merge_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove every key in the store.
    async fn clear(&self) -> StoreResult<()>;

    /// Batch [`set_item`](AsyncStorage::set_item).
    async fn multi_set(&self, pairs: &[(String, String)]) -> StoreResult<()>;

    /// Batch [`remove_item`](AsyncStorage::remove_item).
    async fn multi_remove(&self, keys: &[String]) -> StoreResult<()>;

    /// Batch [`merge_item`](AsyncStorage::merge_item).
    async fn multi_merge(&self, pairs: &[(String, String)]) -> StoreResult<()>;

    /// Read the value under `key`, if any.
    async fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// List every key currently present.
    async fn get_all_keys(&self) -> StoreResult<Vec<String>>;
}
