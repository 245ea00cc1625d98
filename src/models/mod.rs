// src/models/mod.rs

pub mod api;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw lifecycle state as persisted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseState {
    Creation,
    Failed,
    Created,
    Published,
}

/// Presentation-facing status derived from `CourseState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Generating,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Client-assigned id, stable for the whole session. For server-backed
    /// courses this is the stringified backend id; generation placeholders
    /// carry a `gen_*` id instead.
    pub id: String,
    /// Numeric backend id, present once the course exists server-side.
    pub backend_id: Option<i64>,
    pub author_id: Option<i64>,
    pub title: String,
    pub description: String,
    /// Total lesson count.
    pub lessons: u32,
    /// Completed lesson count, not a percentage. `progress <= lessons` is a
    /// display expectation; callers clamp when rendering.
    pub progress: u32,
    pub created_at: String,
    pub updated_at: String,
    pub category: Option<String>,
    pub author: Option<String>,
    pub author_avatar_url: Option<String>,
    pub rating: Option<f64>,
    pub ratings_count: Option<u64>,
    pub students: Option<u64>,
    pub is_public: Option<bool>,
    pub is_in_mine: Option<bool>,
    pub is_mine: Option<bool>,
    pub state: Option<CourseState>,
    pub status: CourseStatus,
    pub modules: Vec<CourseModule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseModule {
    pub id: String,
    pub title: String,
    pub lessons: Vec<LessonSummary>,
}

/// Lesson as listed inside a course's module tree; the full content lives in
/// [`Lesson`] and is fetched separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    pub serial_number: Option<u32>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Full lesson payload. Immutable once fetched; completion is tracked in the
/// local progress store, never by mutating this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub materials: Vec<LessonMaterial>,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonMaterial {
    pub id: String,
    pub title: String,
    /// Markdown/plain-text block.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
    pub explanation: Option<String>,
}

/// Server-of-record identity and learning stats. Fetched fresh per session,
/// not cached by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub external_uuid: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub registration_date: String,
    pub birthdate: String,
    pub avatar: String,
    pub completed_courses: u32,
    pub in_progress_courses: u32,
    pub streak: u32,
    pub is_streak_active_today: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRegistrationRequest {
    pub name: String,
    pub surname: String,
    /// Either a bare `YYYY-MM-DD` date or a full RFC 3339 timestamp.
    pub birthdate: String,
    /// An `http(s)` URL, a `data:image/...` URI, or empty.
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

/// Singleton persisted app configuration. Updated read-modify-write via
/// [`SettingsPatch`]; partial updates never drop unrelated fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,
    pub language: String,
    pub default_course_language: String,
    pub notifications: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            language: "en".to_string(),
            default_course_language: "en".to_string(),
            notifications: true,
        }
    }
}

/// All-optional mirror of [`AppSettings`] for shallow merges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub language: Option<String>,
    pub default_course_language: Option<String>,
    pub notifications: Option<bool>,
}

impl AppSettings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(language) = patch.default_course_language {
            self.default_course_language = language;
        }
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    Popular,
    Newest,
    Rating,
    Students,
}

/// Namespacing key for the local lesson-completion cache: server-backed
/// courses key by backend id, unpersisted placeholders by their local id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CourseKey {
    Backend(i64),
    Local(String),
}

impl CourseKey {
    pub fn for_course(course: &Course) -> Self {
        match course.backend_id {
            Some(id) => Self::Backend(id),
            None => Self::Local(course.id.clone()),
        }
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(id) => write!(f, "backend:{id}"),
            Self::Local(id) => write!(f, "id:{id}"),
        }
    }
}

/// Input for course creation (multipart upload).
#[derive(Debug, Clone)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub file: CourseFile,
    /// Short language code (`en`, `ru`, ...) translated to the backend's
    /// language-name string before submission.
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct CourseFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

/// Result of polling `GET /courses/{id}/state` during generation.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseStateInfo {
    pub state: Option<CourseState>,
    pub updated_at: Option<String>,
}

// --- course content upload (PATCH /courses/{id}/upload) ---

#[derive(Debug, Clone, Serialize)]
pub struct CourseUpload {
    pub course_title: String,
    pub language: String,
    pub last_updated: String,
    pub total_modules: u32,
    pub total_lessons: u32,
    pub modules: Vec<UploadModule>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadModule {
    pub module_id: i64,
    pub module_title: String,
    pub lessons: Vec<UploadLesson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadLesson {
    pub lesson_id: i64,
    pub lesson_title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Vec<UploadQuiz>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadQuiz {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: u32,
}
