// src/settings.rs

use crate::models::{AppSettings, SettingsPatch};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Persisted app settings, same lazy-load-once / persist-on-write shape as
/// the progress store but holding a single flat record. The file is parsed
/// as a partial and merged over defaults, so missing or unknown fields
/// degrade gracefully instead of failing the load.
pub struct SettingsStore {
    path: PathBuf,
    state: Mutex<SettingsState>,
}

#[derive(Debug)]
struct SettingsState {
    loaded: bool,
    settings: AppSettings,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Mutex::new(SettingsState {
                loaded: false,
                settings: AppSettings::default(),
            }),
        }
    }

    /// `~/.intruct/settings.json`; `None` without a home directory.
    pub fn default_path() -> Option<PathBuf> {
        Some(
            dirs::home_dir()?
                .join(crate::constants::CONFIG_DIR_NAME)
                .join(crate::constants::SETTINGS_FILE_NAME),
        )
    }

    pub fn settings(&self) -> AppSettings {
        self.lock_loaded().settings.clone()
    }

    /// Shallow merge: fields absent from the patch keep their stored value.
    pub fn update(&self, patch: SettingsPatch) -> AppSettings {
        let mut state = self.lock_loaded();
        state.settings.apply(patch);
        persist(&self.path, &state.settings);
        state.settings.clone()
    }

    fn lock_loaded(&self) -> MutexGuard<'_, SettingsState> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !state.loaded {
            load(&self.path, &mut state);
        }
        state
    }
}

fn load(path: &Path, state: &mut SettingsState) {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            state.loaded = true;
            return;
        }
        Err(err) => {
            log::warn!("failed to read settings from {}: {err}", path.display());
            return;
        }
    };

    state.loaded = true;
    match serde_json::from_str::<SettingsPatch>(&raw) {
        Ok(stored) => state.settings.apply(stored),
        Err(err) => log::warn!("discarding malformed settings file: {err}"),
    }
}

fn persist(path: &Path, settings: &AppSettings) {
    let result = (|| -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(settings)?;
        std::fs::write(path, json)
    })();
    if let Err(err) = result {
        log::warn!("failed to persist settings to {}: {err}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Theme;
    use tempfile::tempdir;

    #[test]
    fn defaults_when_nothing_is_stored() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.settings(), AppSettings::default());
    }

    #[test]
    fn partial_update_preserves_other_fields() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        store.update(SettingsPatch {
            theme: Some(Theme::Dark),
            ..SettingsPatch::default()
        });

        let after = store.update(SettingsPatch {
            language: Some("ru".to_string()),
            ..SettingsPatch::default()
        });
        assert_eq!(after.theme, Theme::Dark);
        assert_eq!(after.language, "ru");
        assert!(after.notifications);
    }

    #[test]
    fn updates_persist_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        SettingsStore::new(path.clone()).update(SettingsPatch {
            default_course_language: Some("de".to_string()),
            ..SettingsPatch::default()
        });

        let reopened = SettingsStore::new(path);
        assert_eq!(reopened.settings().default_course_language, "de");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "][").unwrap();
        let store = SettingsStore::new(path);
        assert_eq!(store.settings(), AppSettings::default());
    }
}
