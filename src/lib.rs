// src/lib.rs

//! Client library for the Intruct learning platform REST API.
//!
//! The crate covers the data layer of the mobile app: typed domain clients
//! over the REST backend, a persisted lesson-completion cache merged into
//! server-reported progress, a persisted settings record, and a two-slot
//! side channel that lets deeply nested request code trigger top-level
//! session transitions (onboarding redirect, offline screen) without
//! threading callbacks through every call site.
//!
//! Rendering, navigation, and token acquisition are external collaborators:
//! screens call these clients with a bearer token supplied per call and
//! branch on the [`error::ErrorCode`] of any failure.

pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod course_list;
pub mod error;
pub mod models;
pub mod progress;
pub mod settings;
pub mod signals;

use crate::{
    api::{AuthApi, CatalogApi, CoursesApi, LessonsApi, ProfileApi},
    client::ApiClient,
    config::ClientConfig,
    error::{ApiError, ApiResult},
    progress::LessonProgressStore,
    settings::SettingsStore,
    signals::SignalHub,
};
use std::sync::Arc;

/// Bundle of everything a session needs: the HTTP client, the signal hub,
/// and the two local stores. Cheap to clone; all parts are shared.
#[derive(Clone)]
pub struct IntructClient {
    client: Arc<ApiClient>,
    progress: Arc<LessonProgressStore>,
    settings: Arc<SettingsStore>,
}

impl IntructClient {
    /// Builds a client with the default store locations under `~/.intruct/`.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let progress = LessonProgressStore::default_path()
            .map(LessonProgressStore::new)
            .ok_or_else(no_home_dir)?;
        let settings = SettingsStore::default_path()
            .map(SettingsStore::new)
            .ok_or_else(no_home_dir)?;
        Self::with_stores(config, progress, settings)
    }

    /// Builds a client with explicit store instances (tests point these at
    /// temporary files).
    pub fn with_stores(
        config: ClientConfig,
        progress: LessonProgressStore,
        settings: SettingsStore,
    ) -> ApiResult<Self> {
        let signals = Arc::new(SignalHub::new());
        let client = Arc::new(ApiClient::new(Arc::new(config), signals)?);
        Ok(Self {
            client,
            progress: Arc::new(progress),
            settings: Arc::new(settings),
        })
    }

    pub fn courses(&self) -> CoursesApi {
        CoursesApi::new(self.client.clone(), self.progress.clone())
    }

    pub fn lessons(&self) -> LessonsApi {
        LessonsApi::new(self.client.clone())
    }

    pub fn profile(&self) -> ProfileApi {
        ProfileApi::new(self.client.clone())
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.client.clone())
    }

    pub fn catalog(&self) -> CatalogApi {
        CatalogApi::new(self.courses(), self.profile())
    }

    pub fn signals(&self) -> &Arc<SignalHub> {
        self.client.signals()
    }

    pub fn progress(&self) -> &Arc<LessonProgressStore> {
        &self.progress
    }

    pub fn settings_store(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    /// Forgets local per-user state. In-flight requests are not cancelled;
    /// they run to completion against the old session.
    pub fn sign_out(&self) {
        self.progress.reset();
    }
}

// Status 0 is reserved for network-layer failures; a missing home directory
// is a local environment problem, reported as a 500-class unknown error.
fn no_home_dir() -> ApiError {
    ApiError::unknown(500, "Cannot resolve home directory")
}
