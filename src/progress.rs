// src/progress.rs

use crate::models::CourseKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const PROGRESS_FILE_VERSION: u32 = 1;

/// Persisted shape: `{"version": 1, "completedByCourse": {"<key>": [ids]}}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressFile {
    version: u32,
    completed_by_course: HashMap<String, Vec<String>>,
}

#[derive(Debug, Default)]
struct ProgressState {
    loaded: bool,
    completed_by_course: HashMap<String, BTreeSet<String>>,
}

/// Local record of finished lessons, keyed per course.
///
/// Completion is recorded here the moment the user finishes a lesson, which
/// can be before the server has processed the matching `finish` call; the
/// courses client merges this in as a one-directional floor on top of
/// server-reported progress. Ids only ever get added; the single removal
/// path is [`reset`](Self::reset) on sign-out.
///
/// The one-time storage load is guarded by the state mutex, so concurrent
/// first reads share exactly one disk read. A failed load leaves the store
/// unloaded and the next call retries instead of silently serving empty
/// state forever.
pub struct LessonProgressStore {
    path: PathBuf,
    state: Mutex<ProgressState>,
}

impl LessonProgressStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Mutex::new(ProgressState::default()),
        }
    }

    /// `~/.intruct/lesson_completion.json`; `None` without a home directory.
    pub fn default_path() -> Option<PathBuf> {
        Some(
            dirs::home_dir()?
                .join(crate::constants::CONFIG_DIR_NAME)
                .join(crate::constants::PROGRESS_FILE_NAME),
        )
    }

    /// Idempotent: re-marking an already completed lesson changes nothing
    /// and does not rewrite storage. Empty lesson ids are ignored.
    pub fn mark_lesson_completed(&self, key: &CourseKey, lesson_id: &str) {
        if lesson_id.is_empty() {
            return;
        }
        let mut state = self.lock_loaded();
        let set = state
            .completed_by_course
            .entry(key.to_string())
            .or_default();
        if !set.insert(lesson_id.to_string()) {
            return;
        }
        persist(&self.path, &state);
    }

    pub fn completed_count(&self, key: &CourseKey) -> usize {
        self.lock_loaded()
            .completed_by_course
            .get(&key.to_string())
            .map(BTreeSet::len)
            .unwrap_or(0)
    }

    pub fn completed_lesson_ids(&self, key: &CourseKey) -> BTreeSet<String> {
        self.lock_loaded()
            .completed_by_course
            .get(&key.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Progress floor: local completion can push displayed progress up but
    /// never down, and the server is never corrected downward by a stale
    /// cache.
    pub fn effective_progress(&self, key: &CourseKey, server_progress: u32) -> u32 {
        server_progress.max(self.completed_count(key) as u32)
    }

    /// Drops the in-memory map and the loaded flag. The next read triggers a
    /// fresh storage load. Called on sign-out only.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.loaded = false;
        state.completed_by_course.clear();
    }

    fn lock(&self) -> MutexGuard<'_, ProgressState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_loaded(&self) -> MutexGuard<'_, ProgressState> {
        let mut state = self.lock();
        if !state.loaded {
            load(&self.path, &mut state);
        }
        state
    }
}

fn load(path: &Path, state: &mut ProgressState) {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            state.loaded = true;
            return;
        }
        Err(err) => {
            // Leave `loaded` false so a later call retries the read.
            log::warn!("failed to read lesson completion from {}: {err}", path.display());
            return;
        }
    };

    state.loaded = true;
    match serde_json::from_str::<ProgressFile>(&raw) {
        Ok(file) if file.version == PROGRESS_FILE_VERSION => {
            state.completed_by_course = file
                .completed_by_course
                .into_iter()
                .map(|(key, ids)| {
                    (key, ids.into_iter().filter(|id| !id.is_empty()).collect())
                })
                .collect();
        }
        Ok(file) => {
            log::warn!("discarding lesson completion with unknown version {}", file.version);
        }
        Err(err) => {
            log::warn!("discarding malformed lesson completion file: {err}");
        }
    }
}

fn persist(path: &Path, state: &ProgressState) {
    let file = ProgressFile {
        version: PROGRESS_FILE_VERSION,
        completed_by_course: state
            .completed_by_course
            .iter()
            .map(|(key, ids)| (key.clone(), ids.iter().cloned().collect()))
            .collect(),
    };
    let result = (|| -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(&file)?;
        std::fs::write(path, json)
    })();
    if let Err(err) = result {
        // Persistence is best effort; the in-memory state stays correct.
        log::warn!("failed to persist lesson completion to {}: {err}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> LessonProgressStore {
        LessonProgressStore::new(dir.path().join("lesson_completion.json"))
    }

    #[test]
    fn marking_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let key = CourseKey::Backend(7);

        store.mark_lesson_completed(&key, "L1");
        store.mark_lesson_completed(&key, "L1");
        assert_eq!(store.completed_count(&key), 1);

        store.mark_lesson_completed(&key, "L2");
        assert_eq!(store.completed_count(&key), 2);
    }

    #[test]
    fn empty_lesson_ids_are_ignored() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.mark_lesson_completed(&CourseKey::Backend(1), "");
        assert_eq!(store.completed_count(&CourseKey::Backend(1)), 0);
    }

    #[test]
    fn progress_floor_never_undercuts_either_side() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let key = CourseKey::Backend(3);
        for id in ["a", "b", "c"] {
            store.mark_lesson_completed(&key, id);
        }
        assert_eq!(store.effective_progress(&key, 2), 3);
        assert_eq!(store.effective_progress(&key, 5), 5);
    }

    #[test]
    fn completion_survives_a_new_instance() {
        let dir = tempdir().unwrap();
        let key = CourseKey::Local("gen_1".to_string());
        store_in(&dir).mark_lesson_completed(&key, "L9");

        let reopened = store_in(&dir);
        assert_eq!(
            reopened.completed_lesson_ids(&key),
            BTreeSet::from(["L9".to_string()])
        );
    }

    #[test]
    fn reset_clears_memory_until_next_load_reads_storage_back() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let key = CourseKey::Backend(42);
        store.mark_lesson_completed(&key, "L1");

        store.reset();
        // Next read loads the persisted data back on demand.
        assert_eq!(store.completed_count(&key), 1);

        store.reset();
        std::fs::remove_file(dir.path().join("lesson_completion.json")).unwrap();
        assert_eq!(store.completed_count(&key), 0);
    }

    #[test]
    fn malformed_and_foreign_files_are_discarded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lesson_completion.json");

        std::fs::write(&path, "not json at all").unwrap();
        let store = LessonProgressStore::new(path.clone());
        assert_eq!(store.completed_count(&CourseKey::Backend(1)), 0);

        std::fs::write(&path, r#"{"version": 9, "completedByCourse": {"backend:1": ["x"]}}"#)
            .unwrap();
        let store = LessonProgressStore::new(path);
        assert_eq!(store.completed_count(&CourseKey::Backend(1)), 0);
    }

    #[test]
    fn keys_are_namespaced_per_course() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.mark_lesson_completed(&CourseKey::Backend(1), "L1");
        store.mark_lesson_completed(&CourseKey::Local("1".to_string()), "L1");
        assert_eq!(store.completed_count(&CourseKey::Backend(1)), 1);
        assert_eq!(store.completed_count(&CourseKey::Local("1".to_string())), 1);
        assert_eq!(store.completed_count(&CourseKey::Backend(2)), 0);
    }
}
