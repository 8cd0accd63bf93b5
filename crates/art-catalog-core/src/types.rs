// SPDX-License-Identifier: AGPL-3.0
// Art Catalog Core - Type definitions

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default catalog endpoint (mockapi.io `assignment` resource)
pub const DEFAULT_CATALOG_URL: &str = "https://66e7a752b17821a9d9d9817b.mockapi.io/assignment";

/// Opaque catalog identifier.
///
/// The remote service is free to send ids as JSON strings or integers;
/// both normalize to the same textual form so `1` and `"1"` compare equal.
/// Fractional numbers are not ids and fail to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => Self(id),
            RawId::Unsigned(id) => Self::from(id),
            RawId::Signed(id) => Self(id.to_string()),
        })
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Non-negative price
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    /// Fraction in [0, 1]; 0 means no active deal
    #[serde(default)]
    pub discount_fraction: f64,
    #[serde(default)]
    pub brand: String,
    /// Whether the tool is suitable for glass surfaces
    #[serde(default)]
    pub glass_surface: bool,
}

impl Item {
    /// Create an item with no description, image, brand or deal
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            description: String::new(),
            image_url: String::new(),
            discount_fraction: 0.0,
            brand: String::new(),
            glass_surface: false,
        }
    }

    pub fn with_discount(mut self, discount_fraction: f64) -> Self {
        self.discount_fraction = discount_fraction;
        self
    }

    /// Whether a limited time deal is active
    pub fn has_deal(&self) -> bool {
        self.discount_fraction > 0.0
    }

    /// Discount as a whole percentage (0.2 -> 20)
    pub fn discount_percent(&self) -> u32 {
        (self.discount_fraction * 100.0).round() as u32
    }

    /// Check the numeric invariants of an item
    pub fn validate(&self) -> Result<(), String> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("item {} has invalid price {}", self.id, self.price));
        }
        if !(0.0..=1.0).contains(&self.discount_fraction) {
            return Err(format!(
                "item {} has discount {} outside [0, 1]",
                self.id, self.discount_fraction
            ));
        }
        Ok(())
    }
}

/// Application settings (frontend-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Base endpoint of the remote catalog
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Directory for durable favorites. None means the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            data_dir: None,
        }
    }
}

impl AppSettings {
    /// Apply `ART_CATALOG_URL` and `ART_CATALOG_DATA_DIR` from the environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("ART_CATALOG_URL").ok(),
            std::env::var_os("ART_CATALOG_DATA_DIR").map(PathBuf::from),
        )
    }

    /// Replace the endpoint and data dir where an override is given
    pub fn with_overrides(mut self, catalog_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        if let Some(url) = catalog_url.filter(|u| !u.trim().is_empty()) {
            self.catalog_url = url;
        }
        if let Some(dir) = data_dir {
            self.data_dir = Some(dir);
        }
        self
    }
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Catalog unreachable: {0}")]
    RemoteUnavailable(String),

    #[error("Catalog returned an invalid response: {0}")]
    RemoteError(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Stored favorites are corrupt: {0}")]
    CorruptState(String),

    #[error("Failed to persist favorites: {0}")]
    PersistenceError(String),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileIo(err.to_string())
    }
}
