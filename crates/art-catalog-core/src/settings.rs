// SPDX-License-Identifier: AGPL-3.0
// Art Catalog Core - Settings persistence
//
// Settings are stored in a local JSON file in the platform config directory.

use crate::types::{AppError, AppSettings};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings loaded from disk, persisted again on changes
pub struct SettingsStore {
    settings: AppSettings,
    file_path: PathBuf,
}

impl SettingsStore {
    /// Open the settings file in the platform config directory
    pub fn new() -> Result<Self, AppError> {
        Self::open(Self::get_settings_path()?)
    }

    /// Open a settings file at an explicit path, creating it with defaults if absent
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let file_path = file_path.into();
        tracing::info!("Settings file path: {:?}", file_path);

        let settings = if file_path.exists() {
            let content = fs::read_to_string(&file_path)
                .map_err(|e| AppError::FileIo(format!("Failed to read settings: {}", e)))?;

            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse settings, using defaults: {}", e);
                AppSettings::default()
            })
        } else {
            tracing::info!("No settings file found, using defaults");
            AppSettings::default()
        };

        let store = Self {
            settings,
            file_path,
        };

        if !store.file_path.exists() {
            tracing::info!("Creating initial settings file");
            store.persist()?;
        }

        Ok(store)
    }

    /// Get the path to the settings file
    fn get_settings_path() -> Result<PathBuf, AppError> {
        let config_dir = directories::ProjectDirs::from("com", "artcatalog", "ArtCatalog")
            .ok_or_else(|| AppError::FileIo("Could not determine config directory".to_string()))?
            .config_dir()
            .to_path_buf();

        Ok(config_dir.join("settings.json"))
    }

    fn persist(&self) -> Result<(), AppError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::FileIo(format!("Failed to create config dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&self.file_path, content)
            .map_err(|e| AppError::FileIo(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &AppSettings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Replace settings and persist to disk
    pub fn update(&mut self, new_settings: AppSettings) -> Result<(), AppError> {
        tracing::info!("Updating settings, catalog: {}", new_settings.catalog_url);
        let previous = std::mem::replace(&mut self.settings, new_settings);

        if let Err(e) = self.persist() {
            tracing::error!("Failed to persist settings: {}", e);
            self.settings = previous;
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_CATALOG_URL;

    #[test]
    fn test_first_open_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("settings.json");

        let store = SettingsStore::open(&path).unwrap();
        assert_eq!(store.get().catalog_url, DEFAULT_CATALOG_URL);
        assert!(path.exists());
    }

    #[test]
    fn test_update_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::open(&path).unwrap();
        let updated = AppSettings {
            catalog_url: "http://localhost:3000/tools".to_string(),
            ..AppSettings::default()
        };
        store.update(updated.clone()).unwrap();

        assert_eq!(SettingsStore::open(&path).unwrap().get(), &updated);
    }

    #[test]
    fn test_unparsable_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "catalogUrl = nope").unwrap();

        let store = SettingsStore::open(&path).unwrap();
        assert_eq!(store.get(), &AppSettings::default());
    }
}
