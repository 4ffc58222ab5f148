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

//! # Storelens Events
//!
//! ## Purpose
//! Foundation crate for the storelens developer-tools suite: the storage
//! event model, the ignored-key filter, and the synchronous listener bus
//! that fans events out to devtools subscribers.
//!
//! ## Architecture Context
//! Every other storelens crate emits through this one:
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │ storelens-asyncstore │   │ storelens-syncstore  │
//! │  (monitor wrapper)   │   │  (monitor wrapper)   │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            │  StorageEvent            │
//!            ▼                          ▼
//! ┌─────────────────────────────────────────────────┐
//! │ IgnoredKeySet   →   ListenerBus (sync fan-out)  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Components
//! - [`StorageEvent`]: One event per intercepted storage call
//! - [`StorageValue`] / [`ValueKind`]: Tagged value union and its kind tag
//! - [`IgnoredKeySet`]: Suppresses events for the tool's own bookkeeping keys
//! - [`ListenerBus`]: Ordered, panic-isolated, synchronous broadcast
//!
//! ## Design Decisions
//! - **Events are observability only**: filtering an event never changes what
//!   the underlying store reads or writes.
//! - **Zero-subscriber fast path**: with no subscribers, callers are expected
//!   to skip event construction entirely; [`ListenerBus::has_subscribers`]
//!   makes that check cheap.
//! - **Panic isolation**: a panicking subscriber never aborts delivery to the
//!   remaining subscribers and never reaches the storage call site.
//!
//! ## Testing
//! ```bash
//! cargo test -p storelens-events
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bus;
pub mod event;
pub mod filter;

pub use bus::{ListenerBus, Subscription, SubscriptionId};
pub use event::{
    EventPayload, Operation, StorageEvent, StorageValue, ValueKind, DEFAULT_INSTANCE_ID,
};
pub use filter::{IgnoredKeySet, DEFAULT_IGNORED_KEYS};
