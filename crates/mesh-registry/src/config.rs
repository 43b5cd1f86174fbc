//! # Registry Configuration
//!
//! Genesis parameters for a registry instance, loaded from JSON.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MESH_REGISTRY_SUPER_ADMIN` | `super_admin` |
//! | `MESH_REGISTRY_EVENT_CAPACITY` | `event_channel_capacity` |
//!
//! ## Requirements
//!
//! - `super_admin` MUST NOT be the zero address
//! - Genesis allowlists MUST NOT repeat an address within one list

use crate::errors::ConfigError;
use registry_bus::DEFAULT_CHANNEL_CAPACITY;
use registry_types::{Address, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Environment variable overriding `super_admin`.
pub const ENV_SUPER_ADMIN: &str = "MESH_REGISTRY_SUPER_ADMIN";
/// Environment variable overriding `event_channel_capacity`.
pub const ENV_EVENT_CAPACITY: &str = "MESH_REGISTRY_EVENT_CAPACITY";

/// Genesis configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Immutable owner of the admin allowlists.
    pub super_admin: Address,
    /// User-admins granted at genesis, in order.
    #[serde(default)]
    pub user_admins: Vec<Address>,
    /// Exit-admins granted at genesis, in order.
    #[serde(default)]
    pub exit_admins: Vec<Address>,
    /// Broadcast buffer per notification subscriber.
    #[serde(default = "default_capacity")]
    pub event_channel_capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl RegistryConfig {
    /// A configuration with empty allowlists and default capacity.
    #[must_use]
    pub fn new(super_admin: Address) -> Self {
        Self {
            super_admin,
            user_admins: Vec::new(),
            exit_admins: Vec::new(),
            event_channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    #[must_use]
    pub fn with_user_admins(mut self, admins: impl IntoIterator<Item = Address>) -> Self {
        self.user_admins.extend(admins);
        self
    }

    #[must_use]
    pub fn with_exit_admins(mut self, admins: impl IntoIterator<Item = Address>) -> Self {
        self.exit_admins.extend(admins);
        self
    }

    /// Parses a JSON genesis document.
    ///
    /// # Errors
    ///
    /// `ConfigError::Json` on malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON genesis file.
    ///
    /// # Errors
    ///
    /// `ConfigError::Io` if the file is unreadable, `ConfigError::Json` if
    /// it is malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value when set.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidOverride` if a set variable does not parse.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_SUPER_ADMIN) {
            self.super_admin = value.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                var: ENV_SUPER_ADMIN,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_EVENT_CAPACITY) {
            self.event_channel_capacity =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidOverride {
                        var: ENV_EVENT_CAPACITY,
                        value: value.clone(),
                    })?;
        }
        Ok(())
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidOverride` if a set variable does not parse.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Checks the configuration before a registry is built from it.
    ///
    /// # Errors
    ///
    /// `ZeroSuperAdmin`, `ZeroChannelCapacity`, or `DuplicateAdmin`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.super_admin.is_zero() {
            return Err(ConfigError::ZeroSuperAdmin);
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        for (list, role) in [
            (&self.user_admins, Role::UserAdmin),
            (&self.exit_admins, Role::ExitAdmin),
        ] {
            let mut seen = HashSet::new();
            if let Some(address) = list.iter().find(|a| !seen.insert(**a)) {
                return Err(ConfigError::DuplicateAdmin {
                    address: *address,
                    role,
                });
            }
        }
        Ok(())
    }
}
