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

//! Error types for async store operations.

use thiserror::Error;

/// Result type for async store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during async store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Value could not be used for the requested operation
    #[error("Invalid value for key '{key}': {reason}")]
    InvalidValue {
        /// Key the operation targeted
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Backend failure (native module, disk, etc.)
    #[error("Backend error: {0}")]
    BackendError(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::BackendError(format!("JSON error: {}", err))
    }
}
