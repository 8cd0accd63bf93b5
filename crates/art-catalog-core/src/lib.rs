// SPDX-License-Identifier: AGPL-3.0
// Art Catalog Core - Shared logic for all frontends
//
// This crate provides:
// - Item, AppSettings and AppError types
// - CatalogClient for the remote catalog read path
// - FavoritesStore for persistent, synchronizable favorites
// - KeyValueStorage with file and in-memory backends
// - SettingsStore for persistent settings
//
// Frontend-specific code lives in separate crates.

pub mod catalog;
pub mod favorites;
pub mod settings;
pub mod storage;
pub mod types;

// Re-export commonly used items
pub use catalog::CatalogClient;
pub use favorites::{FavoriteSet, FavoritesEvent, FavoritesStore, StoreStatus, FAVORITES_KEY};
pub use settings::SettingsStore;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use types::{AppError, AppSettings, Item, ItemId, DEFAULT_CATALOG_URL};
