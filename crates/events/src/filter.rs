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

//! Ignored-key filtering.
//!
//! ## Purpose
//! Storelens persists its own settings and reports through the very stores it
//! monitors. Without filtering, every bookkeeping write would surface as an
//! observed event, and a subscriber that writes in response would loop
//! forever. The [`IgnoredKeySet`] suppresses events for those keys.
//!
//! Filtering gates event emission only. The underlying read or write always
//! proceeds, so an ignored key behaves like any other key to the host app.

use std::collections::HashSet;
use std::sync::RwLock;

/// Patterns ignored by default: the tool's own bookkeeping keys plus the
/// offline cache key a popular query library persists through the same store.
pub const DEFAULT_IGNORED_KEYS: &[&str] = &[
    "@storelens/settings",
    "@storelens/reports",
    "offline-query-cache",
];

/// Process-wide set of ignored key patterns.
///
/// A key is ignored when it equals a pattern exactly or starts with one.
/// The scan is O(patterns) per call; the set stays in the single digits, and
/// intercepted storage calls are nowhere near a hot numeric loop.
#[derive(Debug, Default)]
pub struct IgnoredKeySet {
    patterns: RwLock<HashSet<String>>,
}

impl IgnoredKeySet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pre-populated with [`DEFAULT_IGNORED_KEYS`].
    pub fn with_defaults() -> Self {
        let set = Self::new();
        for pattern in DEFAULT_IGNORED_KEYS {
            set.insert(*pattern);
        }
        set
    }

    /// Add a pattern (exact key or prefix).
    pub fn insert(&self, pattern: impl Into<String>) {
        self.patterns
            .write()
            .expect("ignored-key set lock poisoned")
            .insert(pattern.into());
    }

    /// Remove a previously added pattern. Returns whether it was present.
    pub fn remove(&self, pattern: &str) -> bool {
        self.patterns
            .write()
            .expect("ignored-key set lock poisoned")
            .remove(pattern)
    }

    /// Whether events for `key` should be suppressed.
    pub fn should_ignore(&self, key: &str) -> bool {
        let patterns = self
            .patterns
            .read()
            .expect("ignored-key set lock poisoned");
        if patterns.contains(key) {
            return true;
        }
        patterns.iter().any(|pattern| key.starts_with(pattern))
    }

    /// Number of patterns currently held.
    pub fn len(&self) -> usize {
        self.patterns
            .read()
            .expect("ignored-key set lock poisoned")
            .len()
    }

    /// Whether the set holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
