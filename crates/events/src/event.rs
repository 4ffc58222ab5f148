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

//! Storage event model.
//!
//! ## Purpose
//! Defines the single event shape delivered to devtools subscribers for every
//! intercepted storage operation, on both the async single-instance store and
//! the synchronous multi-instance store.
//!
//! ## Design Decisions
//! - **Tagged value union**: stored values are `string | number | boolean |
//!   buffer` with no tag in the real backends; [`StorageValue`] makes the tag
//!   explicit at the API boundary.
//! - **One event per call**: every emitted event corresponds 1:1 to exactly
//!   one call into the wrapped method surface.
//! - **Serializable**: events derive `Serialize` so the devtools UI (or a
//!   bridge to it) can ship them as JSON without a bespoke encoder.

use chrono::Utc;
use serde::Serialize;

/// Instance id used by stores that have exactly one implicit global instance.
pub const DEFAULT_INSTANCE_ID: &str = "default";

/// Kind tag for a stored value.
///
/// `Unknown` is the "key absent" outcome of type detection: none of the typed
/// getters produced a defined result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// UTF-8 string value
    String,
    /// Double-precision numeric value
    Number,
    /// Boolean value
    Boolean,
    /// Raw binary value
    Buffer,
    /// No typed getter produced a defined result (key absent or deleted)
    Unknown,
}

impl ValueKind {
    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Buffer => "buffer",
            ValueKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored value with an explicit type tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum StorageValue {
    /// UTF-8 string
    String(String),
    /// Double-precision number
    Number(f64),
    /// Boolean
    Boolean(bool),
    /// Raw bytes
    Buffer(Vec<u8>),
}

impl StorageValue {
    /// Kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            StorageValue::String(_) => ValueKind::String,
            StorageValue::Number(_) => ValueKind::Number,
            StorageValue::Boolean(_) => ValueKind::Boolean,
            StorageValue::Buffer(_) => ValueKind::Buffer,
        }
    }
}

impl From<&str> for StorageValue {
    fn from(value: &str) -> Self {
        StorageValue::String(value.to_string())
    }
}

impl From<String> for StorageValue {
    fn from(value: String) -> Self {
        StorageValue::String(value)
    }
}

impl From<f64> for StorageValue {
    fn from(value: f64) -> Self {
        StorageValue::Number(value)
    }
}

impl From<bool> for StorageValue {
    fn from(value: bool) -> Self {
        StorageValue::Boolean(value)
    }
}

impl From<Vec<u8>> for StorageValue {
    fn from(value: Vec<u8>) -> Self {
        StorageValue::Buffer(value)
    }
}

/// Operation kind of an intercepted storage call.
///
/// The first seven variants are the async store's method surface; the last
/// three (plus `Set`, which both stores share) are the synchronous store's,
/// whose value kind travels separately in [`StorageEvent::value_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Single-key write
    Set,
    /// Single-key removal (async store)
    Remove,
    /// Single-key JSON merge (async store)
    Merge,
    /// Whole-store clear (async store)
    Clear,
    /// Batch write (async store)
    MultiSet,
    /// Batch removal (async store)
    MultiRemove,
    /// Batch JSON merge (async store)
    MultiMerge,
    /// Single-key removal (sync store)
    Delete,
    /// Whole-instance clear (sync store)
    ClearAll,
    /// Typed read (sync store)
    Get,
}

impl Operation {
    /// Stable camelCase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Set => "set",
            Operation::Remove => "remove",
            Operation::Merge => "merge",
            Operation::Clear => "clear",
            Operation::MultiSet => "multiSet",
            Operation::MultiRemove => "multiRemove",
            Operation::MultiMerge => "multiMerge",
            Operation::Delete => "delete",
            Operation::ClearAll => "clearAll",
            Operation::Get => "get",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-operation payload carried by an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    /// No payload (clear / clearAll, or a read that found nothing)
    None,
    /// A single value (set / merge / get)
    Value(StorageValue),
    /// Keys involved in a batch removal
    Keys(Vec<String>),
    /// Key-value pairs involved in a batch write or batch merge
    Pairs(Vec<(String, String)>),
}

impl EventPayload {
    /// True for the payload-less case.
    pub fn is_none(&self) -> bool {
        matches!(self, EventPayload::None)
    }
}

/// One observed storage operation.
///
/// ## Invariants
/// - Exactly one event per intercepted call; none for ignored keys.
/// - `key` is absent only for whole-store operations (`Clear` / `ClearAll`).
/// - `timestamp_ms` is wall-clock milliseconds, non-decreasing per instance
///   under the single caller the interception layer assumes.
/// - `value_type` and `success` are populated only by the synchronous store,
///   whose API has typed getters and no universal read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageEvent {
    /// Which storage instance produced the event.
    pub instance_id: String,
    /// What the intercepted call was doing.
    pub operation: Operation,
    /// Completion wall-clock time, millisecond precision.
    pub timestamp_ms: i64,
    /// Key involved; `None` for whole-store operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Value(s) written or read.
    #[serde(skip_serializing_if = "EventPayload::is_none")]
    pub payload: EventPayload,
    /// Detected value kind (sync store only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueKind>,
    /// Whether a read found the key (sync store only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl StorageEvent {
    /// Create an event for `operation` on `instance_id`, stamped now.
    pub fn new(instance_id: impl Into<String>, operation: Operation) -> Self {
        Self {
            instance_id: instance_id.into(),
            operation,
            timestamp_ms: Utc::now().timestamp_millis(),
            key: None,
            payload: EventPayload::None,
            value_type: None,
            success: None,
        }
    }

    /// Attach the key the operation targeted.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attach a single-value payload.
    pub fn with_value(mut self, value: StorageValue) -> Self {
        self.payload = EventPayload::Value(value);
        self
    }

    /// Attach a batch-removal key list payload.
    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.payload = EventPayload::Keys(keys);
        self
    }

    /// Attach a batch-write pair list payload.
    pub fn with_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.payload = EventPayload::Pairs(pairs);
        self
    }

    /// Attach the detected value kind (sync store).
    pub fn with_value_type(mut self, kind: ValueKind) -> Self {
        self.value_type = Some(kind);
        self
    }

    /// Attach the read outcome (sync store).
    pub fn with_success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }
}
