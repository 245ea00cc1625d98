// src/api/courses.rs

use crate::{
    client::{ApiClient, parse_response, require_token},
    constants::backend_language_name,
    error::{ApiError, ApiResult},
    models::api::{
        CourseItemResponse, CourseListResponse, CourseStateResponse, CreateCourseResponse,
    },
    models::{Course, CourseDraft, CourseKey, CourseStateInfo, CourseUpload},
    progress::LessonProgressStore,
};
use reqwest::multipart;
use std::sync::Arc;

/// Client for the course endpoints. Every course-shaped response passes
/// through the progress floor before it reaches the caller.
pub struct CoursesApi {
    client: Arc<ApiClient>,
    progress: Arc<LessonProgressStore>,
}

impl CoursesApi {
    pub fn new(client: Arc<ApiClient>, progress: Arc<LessonProgressStore>) -> Self {
        Self { client, progress }
    }

    /// `GET /courses?in_mine=true`
    pub async fn my_courses(&self, token: &str) -> ApiResult<Vec<Course>> {
        self.list_courses(token, true).await
    }

    /// `GET /courses?in_mine=false`
    pub async fn featured_courses(&self, token: &str) -> ApiResult<Vec<Course>> {
        self.list_courses(token, false).await
    }

    async fn list_courses(&self, token: &str, in_mine: bool) -> ApiResult<Vec<Course>> {
        require_token(token)?;
        let base_url = self.client.base_url()?;
        let url = format!("{base_url}/courses?in_mine={in_mine}");

        let res = self
            .client
            .send(self.client.http().get(&url).bearer_auth(token))
            .await?;
        if !res.status().is_success() {
            return Err(self
                .client
                .error_from_response(res, "Failed to load courses")
                .await);
        }

        let body = self.client.read_json(res).await?;
        let list: CourseListResponse = parse_response(body, "Invalid courses response")?;
        Ok(list
            .courses
            .into_iter()
            .map(|item| self.with_progress_floor(item.into_course()))
            .collect())
    }

    /// `GET /courses/{id}`, including the nested module/lesson tree.
    pub async fn course_by_id(&self, id: &str, token: &str) -> ApiResult<Course> {
        require_token(token)?;
        let base_url = self.client.base_url()?;
        let numeric_id: i64 = id
            .parse()
            .map_err(|_| ApiError::validation(400, "Invalid course id"))?;

        let url = format!("{base_url}/courses/{numeric_id}");
        let res = self
            .client
            .send(self.client.http().get(&url).bearer_auth(token))
            .await?;
        if !res.status().is_success() {
            return Err(self
                .client
                .error_from_response(res, "Failed to load course")
                .await);
        }

        let body = self.client.read_json(res).await?;
        let item: CourseItemResponse = parse_response(body, "Invalid course response")?;
        if item.id.is_none() {
            return Err(ApiError::unknown(500, "Invalid course response"));
        }
        Ok(self.with_progress_floor(item.into_course()))
    }

    /// `POST /course` (multipart). Returns the backend id of the course now
    /// being generated; the caller pairs it with its local placeholder.
    pub async fn create_course(&self, token: &str, draft: &CourseDraft) -> ApiResult<i64> {
        require_token(token)?;
        if draft.title.is_empty() || draft.file.bytes.is_empty() || draft.language.is_empty() {
            return Err(ApiError::validation(400, "Missing required fields"));
        }
        let base_url = self.client.base_url()?;

        let language = backend_language_name(&draft.language)
            .map(str::to_string)
            .unwrap_or_else(|| draft.language.clone());

        let mut part = multipart::Part::bytes(draft.file.bytes.clone())
            .file_name(draft.file.file_name.clone());
        if let Some(mime) = draft
            .file
            .mime_type
            .clone()
            .or_else(|| infer_mime_type(&draft.file.file_name))
        {
            part = part
                .mime_str(&mime)
                .map_err(|_| ApiError::validation(400, "Invalid file type"))?;
        }
        let form = multipart::Form::new()
            .text("title", draft.title.clone())
            .text("description", draft.description.clone())
            .part("file", part)
            .text("language", language);

        let url = format!("{base_url}/course");
        let res = self
            .client
            .send(
                self.client
                    .http()
                    .post(&url)
                    .bearer_auth(token)
                    .multipart(form),
            )
            .await?;

        match res.status().as_u16() {
            401 => Err(ApiError::unauthorized("Unauthorized")),
            status if !res.status().is_success() => {
                let payload = self.client.read_error_payload(res).await?;
                if status == 400 {
                    Err(ApiError::validation(400, payload.message_or("Validation error")))
                } else {
                    Err(ApiError::unknown(
                        status,
                        payload.message_or("Failed to create course"),
                    ))
                }
            }
            _ => {
                let body = self.client.read_json(res).await?;
                let created: CreateCourseResponse =
                    parse_response(body, "Invalid create course response")?;
                Ok(created.course_id)
            }
        }
    }

    /// `PATCH /courses/{id}/upload`: pushes the generated module/lesson tree
    /// onto a course record.
    pub async fn upload_course_content(
        &self,
        course_id: i64,
        upload: &CourseUpload,
    ) -> ApiResult<()> {
        require_course_id(course_id)?;
        if upload.course_title.is_empty() || upload.modules.is_empty() {
            return Err(ApiError::validation(400, "Missing required fields"));
        }
        let base_url = self.client.base_url()?;

        let url = format!("{base_url}/courses/{course_id}/upload");
        let res = self
            .client
            .send(self.client.http().patch(&url).json(upload))
            .await?;

        match res.status().as_u16() {
            404 => Err(ApiError::unknown(404, "Course not found")),
            status if !res.status().is_success() => {
                let payload = self.client.read_error_payload(res).await?;
                if status == 400 {
                    Err(ApiError::validation(400, payload.message_or("Validation error")))
                } else {
                    Err(ApiError::unknown(
                        status,
                        payload.message_or("Failed to upload course content"),
                    ))
                }
            }
            _ => Ok(()),
        }
    }

    /// `PUT /courses/{id}/publish`
    pub async fn publish_course(&self, token: &str, course_id: i64) -> ApiResult<()> {
        require_token(token)?;
        require_course_id(course_id)?;
        let base_url = self.client.base_url()?;

        let url = format!("{base_url}/courses/{course_id}/publish");
        let res = self
            .client
            .send(self.client.http().put(&url).bearer_auth(token))
            .await?;

        match res.status().as_u16() {
            401 => Err(ApiError::unauthorized("Unauthorized")),
            403 => Err(ApiError::unknown(403, "Not the owner of this course")),
            404 => Err(ApiError::unknown(404, "Course not found")),
            409 => Err(ApiError::unknown(409, "Course already published")),
            status if !res.status().is_success() => {
                let payload = self.client.read_error_payload(res).await?;
                Err(ApiError::unknown(
                    status,
                    payload.message_or("Failed to publish course"),
                ))
            }
            _ => Ok(()),
        }
    }

    /// `GET /courses/{id}/state`: polled while a course is generating.
    pub async fn course_state(&self, token: &str, course_id: i64) -> ApiResult<CourseStateInfo> {
        require_token(token)?;
        require_course_id(course_id)?;
        let base_url = self.client.base_url()?;

        let url = format!("{base_url}/courses/{course_id}/state");
        log::debug!("polling course state: {url}");
        let res = self
            .client
            .send(self.client.http().get(&url).bearer_auth(token))
            .await?;
        if !res.status().is_success() {
            return Err(self
                .client
                .error_from_response(res, "Failed to load course state")
                .await);
        }

        let body = self.client.read_json(res).await?;
        let state: CourseStateResponse = parse_response(body, "Invalid course state response")?;
        let info = state.into_state_info();
        log::debug!("course {course_id} state: {:?} (updated {:?})", info.state, info.updated_at);
        Ok(info)
    }

    /// `POST /courses/{id}/rate`
    pub async fn rate_course(&self, token: &str, course_id: i64, rating: u8) -> ApiResult<()> {
        require_token(token)?;
        require_course_id(course_id)?;
        if !(1..=5).contains(&rating) {
            return Err(ApiError::validation(400, "Rating must be between 1 and 5"));
        }
        let base_url = self.client.base_url()?;

        let url = format!("{base_url}/courses/{course_id}/rate");
        let res = self
            .client
            .send(
                self.client
                    .http()
                    .post(&url)
                    .bearer_auth(token)
                    .json(&serde_json::json!({ "rating": rating })),
            )
            .await?;
        if !res.status().is_success() {
            return Err(self
                .client
                .error_from_response(res, "Failed to rate course")
                .await);
        }
        Ok(())
    }

    fn with_progress_floor(&self, mut course: Course) -> Course {
        let key = CourseKey::for_course(&course);
        course.progress = self.progress.effective_progress(&key, course.progress);
        course
    }
}

/// Backend course ids are positive; zero and negatives fail fast before any
/// network traffic.
fn require_course_id(course_id: i64) -> ApiResult<()> {
    if course_id <= 0 {
        return Err(ApiError::validation(400, "Course ID is required"));
    }
    Ok(())
}

fn infer_mime_type(file_name: &str) -> Option<String> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        Some("application/pdf".to_string())
    } else if lower.ends_with(".txt") {
        Some("text/plain".to_string())
    } else {
        None
    }
}
