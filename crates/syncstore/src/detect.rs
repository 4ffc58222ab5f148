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

//! Type detection over the sync store's typed getters.
//!
//! ## Purpose
//! The sync store offers four typed readers and no type introspection call,
//! so the only way to discover what a key holds is to try the readers in
//! sequence. String first: it is by far the most common kind, so the average
//! probe count stays low.
//!
//! Detection keys on defined-ness, never truthiness: `false`, `0.0`, and the
//! empty string are all hits for their respective getters.

use crate::SyncStorage;
use storelens_events::{StorageValue, ValueKind};

/// Result of probing a key's stored type.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedValue {
    /// The value read back, `None` when the key is absent. Buffers are
    /// replaced by a byte-length placeholder, never carried raw.
    pub value: Option<StorageValue>,
    /// Which getter produced a defined result; `Unknown` when none did.
    pub kind: ValueKind,
}

/// Human-readable stand-in for a binary value.
///
/// Raw bytes are not meaningfully displayable, and copying large buffers into
/// every event would bloat the devtools event log.
pub fn buffer_placeholder(len: usize) -> String {
    format!("<buffer: {} bytes>", len)
}

/// Probe the typed getters in fixed priority order (string, number, boolean,
/// buffer) and return the first defined result.
///
/// All four undefined means the key is absent (or was just deleted), reported
/// as [`ValueKind::Unknown`].
pub fn detect_value(store: &dyn SyncStorage, key: &str) -> DetectedValue {
    if let Some(value) = store.get_string(key) {
        return DetectedValue {
            value: Some(StorageValue::String(value)),
            kind: ValueKind::String,
        };
    }
    if let Some(value) = store.get_number(key) {
        return DetectedValue {
            value: Some(StorageValue::Number(value)),
            kind: ValueKind::Number,
        };
    }
    if let Some(value) = store.get_boolean(key) {
        return DetectedValue {
            value: Some(StorageValue::Boolean(value)),
            kind: ValueKind::Boolean,
        };
    }
    if let Some(value) = store.get_buffer(key) {
        return DetectedValue {
            value: Some(StorageValue::String(buffer_placeholder(value.len()))),
            kind: ValueKind::Buffer,
        };
    }
    DetectedValue {
        value: None,
        kind: ValueKind::Unknown,
    }
}
