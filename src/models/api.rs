// src/models/api.rs

use super::{
    Course, CourseModule, CourseState, CourseStateInfo, CourseStatus, Lesson, LessonMaterial,
    LessonSummary, QuizQuestion, UserProfile,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Wire shapes as the backend actually sends them: snake_case keys, numeric
/// ids, most fields nullable. Each response gets an explicit struct and a
/// mapping into the domain type; a payload that does not deserialize is a
/// hard "invalid response" error at the call site, never a silent default.

pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// --- courses ---

#[derive(Deserialize, Debug, Clone)]
pub struct CourseListResponse {
    pub courses: Vec<CourseItemResponse>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CourseItemResponse {
    pub id: Option<i64>,
    pub author_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub lessons_number: Option<i64>,
    pub finished_lessons: Option<i64>,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<u64>,
    pub students_count: Option<u64>,
    pub is_public: Option<bool>,
    pub is_in_mine: Option<bool>,
    pub is_mine: Option<bool>,
    /// String on current backends, small integer on legacy ones.
    pub state: Option<Value>,
    pub modules: Option<Vec<ModuleResponse>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ModuleResponse {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub lessons: Option<Vec<ModuleLessonResponse>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ModuleLessonResponse {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub serial_number: Option<u32>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Accepts both the current string encoding (including the legacy spelling
/// `"in creation"`) and the numeric encoding used by older payloads.
pub fn normalize_course_state(value: Option<&Value>) -> Option<CourseState> {
    match value? {
        Value::String(s) => match s.as_str() {
            "in creation" | "creation" => Some(CourseState::Creation),
            "failed" => Some(CourseState::Failed),
            "created" => Some(CourseState::Created),
            "published" => Some(CourseState::Published),
            _ => None,
        },
        Value::Number(n) => match n.as_i64()? {
            1 => Some(CourseState::Creation),
            2 => Some(CourseState::Failed),
            3 => Some(CourseState::Created),
            4 => Some(CourseState::Published),
            _ => None,
        },
        _ => None,
    }
}

pub fn status_from_state(state: Option<CourseState>, lessons: u32) -> CourseStatus {
    match state {
        Some(CourseState::Creation) => CourseStatus::Generating,
        Some(CourseState::Failed) => CourseStatus::Failed,
        Some(CourseState::Created) | Some(CourseState::Published) => CourseStatus::Ready,
        // Older backends omit the state; a course without lessons is still
        // being generated.
        None => {
            if lessons == 0 {
                CourseStatus::Generating
            } else {
                CourseStatus::Ready
            }
        }
    }
}

fn non_negative(value: Option<i64>) -> u32 {
    value.filter(|n| *n >= 0).unwrap_or(0) as u32
}

impl CourseItemResponse {
    pub fn into_course(self) -> Course {
        let now = now_timestamp();
        let lessons = non_negative(self.lessons_number);
        let state = normalize_course_state(self.state.as_ref());
        let created_at = self.created_at.unwrap_or_else(|| now.clone());

        Course {
            id: self
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| format!("course_{}", Utc::now().timestamp_millis())),
            backend_id: self.id,
            author_id: self.author_id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            lessons,
            progress: non_negative(self.finished_lessons),
            updated_at: self.updated_at.unwrap_or_else(|| created_at.clone()),
            created_at,
            category: None,
            author: None,
            author_avatar_url: None,
            rating: self.average_rating.filter(|r| r.is_finite()),
            ratings_count: self.ratings_count,
            students: self.students_count,
            is_public: self.is_public,
            is_in_mine: self.is_in_mine,
            is_mine: self.is_mine,
            state,
            status: status_from_state(state, lessons),
            modules: self
                .modules
                .unwrap_or_default()
                .into_iter()
                .map(ModuleResponse::into_module)
                .collect(),
        }
    }
}

impl ModuleResponse {
    fn into_module(self) -> CourseModule {
        CourseModule {
            id: self
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| format!("module_{}", Utc::now().timestamp_millis())),
            title: self.title.unwrap_or_default(),
            lessons: self
                .lessons
                .unwrap_or_default()
                .into_iter()
                .map(|lesson| LessonSummary {
                    id: lesson
                        .id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| format!("lesson_{}", Utc::now().timestamp_millis())),
                    title: lesson.title.unwrap_or_default(),
                    serial_number: lesson.serial_number,
                    updated_at: lesson.updated_at.or_else(|| lesson.created_at.clone()),
                    created_at: lesson.created_at,
                })
                .collect(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateCourseResponse {
    pub course_id: i64,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CourseStateResponse {
    pub state: Option<Value>,
    pub updated_at: Option<String>,
}

impl CourseStateResponse {
    pub fn into_state_info(self) -> CourseStateInfo {
        CourseStateInfo {
            state: normalize_course_state(self.state.as_ref()),
            updated_at: self.updated_at,
        }
    }
}

// --- lessons ---

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LessonResponse {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub quizzes: Option<Vec<LessonQuizResponse>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LessonQuizResponse {
    pub id: Option<i64>,
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_index: Option<u32>,
}

impl LessonResponse {
    /// `None` when the payload has no lesson id, which callers report as an
    /// invalid response.
    pub fn into_lesson(self) -> Option<Lesson> {
        let id = self.id?;
        let content = self.content.unwrap_or_default();
        let materials = if content.trim().is_empty() {
            Vec::new()
        } else {
            vec![LessonMaterial {
                id: format!("lesson_{id}_content"),
                title: "Lesson".to_string(),
                content,
            }]
        };

        let questions = self
            .quizzes
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, quiz)| {
                let question = quiz.question.unwrap_or_default();
                if question.trim().is_empty() {
                    return None;
                }
                Some(QuizQuestion {
                    id: quiz
                        .id
                        .map(|quiz_id| quiz_id.to_string())
                        .unwrap_or_else(|| format!("quiz_{id}_{index}")),
                    question,
                    options: quiz.options.unwrap_or_default(),
                    correct_answer: quiz.correct_index.unwrap_or(0) as usize,
                    explanation: None,
                })
            })
            .collect();

        Some(Lesson {
            id: id.to_string(),
            title: self.title.unwrap_or_default(),
            materials,
            questions,
        })
    }
}

// --- user profile ---

#[derive(Deserialize, Debug, Clone)]
pub struct UserProfileResponse {
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
    #[serde(default)]
    pub is_streak_active_today: bool,
}

impl UserProfileResponse {
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: self.id,
            external_uuid: self.external_uuid,
            email: self.email,
            name: self.name,
            surname: self.surname,
            registration_date: self.registration_date,
            birthdate: self.birthdate,
            avatar: self.avatar,
            completed_courses: self.completed_courses,
            in_progress_courses: self.in_progress_courses,
            streak: self.streak,
            is_streak_active_today: self.is_streak_active_today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_normalization_accepts_both_encodings() {
        assert_eq!(
            normalize_course_state(Some(&json!("in creation"))),
            Some(CourseState::Creation)
        );
        assert_eq!(
            normalize_course_state(Some(&json!("published"))),
            Some(CourseState::Published)
        );
        assert_eq!(
            normalize_course_state(Some(&json!(2))),
            Some(CourseState::Failed)
        );
        assert_eq!(normalize_course_state(Some(&json!("archived"))), None);
        assert_eq!(normalize_course_state(Some(&json!(9))), None);
        assert_eq!(normalize_course_state(None), None);
    }

    #[test]
    fn missing_state_falls_back_on_lesson_count() {
        assert_eq!(status_from_state(None, 0), CourseStatus::Generating);
        assert_eq!(status_from_state(None, 7), CourseStatus::Ready);
    }

    #[test]
    fn course_item_maps_defensively() {
        let item: CourseItemResponse = serde_json::from_value(json!({
            "id": 42,
            "title": "Rust for Birds",
            "lessons_number": 10,
            "finished_lessons": 3,
            "average_rating": 4.5,
            "state": "created",
            "created_at": "2026-01-02T10:00:00Z"
        }))
        .unwrap();
        let course = item.into_course();
        assert_eq!(course.backend_id, Some(42));
        assert_eq!(course.id, "42");
        assert_eq!(course.lessons, 10);
        assert_eq!(course.progress, 3);
        assert_eq!(course.status, CourseStatus::Ready);
        assert_eq!(course.updated_at, "2026-01-02T10:00:00Z");
        assert!(course.description.is_empty());
    }

    #[test]
    fn lesson_maps_content_and_filters_empty_questions() {
        let wire: LessonResponse = serde_json::from_value(json!({
            "id": 7,
            "title": "Ownership",
            "content": "# Moves\nValues move.",
            "quizzes": [
                {"id": 1, "question": "What moves?", "options": ["values", "banks"], "correct_index": 0},
                {"question": "   ", "options": []}
            ]
        }))
        .unwrap();
        let lesson = wire.into_lesson().unwrap();
        assert_eq!(lesson.id, "7");
        assert_eq!(lesson.materials.len(), 1);
        assert_eq!(lesson.materials[0].id, "lesson_7_content");
        assert_eq!(lesson.questions.len(), 1);
        assert_eq!(lesson.questions[0].correct_answer, 0);
    }

    #[test]
    fn lesson_without_id_is_rejected() {
        let wire: LessonResponse = serde_json::from_value(json!({"title": "x"})).unwrap();
        assert!(wire.into_lesson().is_none());
    }
}
