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

//! Configuration for the storage monitor.
//!
//! ## Purpose
//! Environment-based configuration so monitoring can be switched off or
//! tuned without code changes in the host app.
//!
//! ## Environment Variables
//! - `STORELENS_DISABLED`: `1` / `true` / `yes` turns every monitoring
//!   surface into a safe no-op (default: enabled)
//! - `STORELENS_IGNORED_KEYS`: comma-separated extra ignored key patterns,
//!   added on top of the built-in defaults

/// Storage monitor configuration.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Whether monitoring is active at all.
    pub enabled: bool,
    /// Extra ignored-key patterns, on top of the defaults.
    pub extra_ignored_keys: Vec<String>,
    /// Probe result for the sync backend: `Some(reason)` when the native
    /// module could not be loaded in this runtime.
    ///
    /// The host injects this once at construction, typically from its module
    /// loader; [`MonitorConfig::from_env`] cannot probe anything and always
    /// leaves it `None`.
    pub sync_backend_error: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extra_ignored_keys: Vec::new(),
            sync_backend_error: None,
        }
    }
}

impl MonitorConfig {
    /// Create configuration from environment variables.
    ///
    /// ## Examples
    /// ```rust
    /// use storelens::MonitorConfig;
    ///
    /// let config = MonitorConfig::from_env();
    /// assert!(config.enabled || std::env::var("STORELENS_DISABLED").is_ok());
    /// ```
    pub fn from_env() -> Self {
        let disabled = std::env::var("STORELENS_DISABLED")
            .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let extra_ignored_keys = std::env::var("STORELENS_IGNORED_KEYS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|pattern| !pattern.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            enabled: !disabled,
            extra_ignored_keys,
            sync_backend_error: None,
        }
    }
}
