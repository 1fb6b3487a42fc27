// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Builder configuration and shared constants.
//!
//! Tag keys, option names and environment variables live here and nowhere
//! else.
//!
//! # Environment Variables
//!
//! - `HDDS_DYNSTRUCT_RESET` - `keep-named` (default) or `clear-all`

use std::fmt;
use std::str::FromStr;

/// Separator used when joining tag fragments.
pub const TAG_SEPARATOR: &str = " ";

/// Tag key read by the JSON encoder/decoder.
pub const DEFAULT_TAG_KEY: &str = "json";

/// Tag name that removes a field from the encoded form.
pub const TAG_SKIP: &str = "-";

/// Tag option that drops zero-valued fields from the encoded form.
pub const TAG_OPT_OMITEMPTY: &str = "omitempty";

/// Environment variable selecting the [`ResetPolicy`].
pub const ENV_RESET_POLICY: &str = "HDDS_DYNSTRUCT_RESET";

/// What `Builder::reset` throws away besides the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetPolicy {
    /// Drop anonymous fields, keep named fields declared.
    #[default]
    KeepNamedFields,
    /// Drop every declaration.
    ClearAll,
}

impl FromStr for ResetPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep-named" | "keep_named" | "keep" => Ok(Self::KeepNamedFields),
            "clear-all" | "clear_all" | "clear" => Ok(Self::ClearAll),
            other => Err(ConfigError::InvalidResetPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepNamedFields => f.write_str("keep-named"),
            Self::ClearAll => f.write_str("clear-all"),
        }
    }
}

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown reset policy name.
    InvalidResetPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidResetPolicy(value) => write!(
                f,
                "invalid reset policy {:?} (expected keep-named or clear-all)",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Builder configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Reset behaviour.
    pub reset_policy: ResetPolicy,
    /// Name given to synthesized types (empty = unnamed record).
    pub type_name: String,
}

impl BuilderConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from the environment.
    ///
    /// Unset variables keep their default; an unparsable value is logged and
    /// ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(ENV_RESET_POLICY) {
            match value.parse() {
                Ok(policy) => config.reset_policy = policy,
                Err(e) => log::warn!("[dynstruct] ignoring {}: {}", ENV_RESET_POLICY, e),
            }
        }
        config
    }

    /// Set the reset policy.
    #[must_use]
    pub fn reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    /// Name synthesized types.
    #[must_use]
    pub fn type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = name.into();
        self
    }
}
