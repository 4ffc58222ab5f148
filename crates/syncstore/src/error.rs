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

//! Error types for sync store operations.

use thiserror::Error;

/// Result type for sync store operations.
pub type SyncResult<T> = Result<T, SyncStoreError>;

/// Errors that can occur during sync store operations.
#[derive(Error, Debug)]
pub enum SyncStoreError {
    /// Write attempted on a read-only instance
    #[error("Instance is read-only, cannot write key '{0}'")]
    ReadOnly(String),

    /// The native store module could not be loaded in this runtime
    #[error("Sync storage backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend failure (native module, disk, etc.)
    #[error("Backend error: {0}")]
    BackendError(String),
}
