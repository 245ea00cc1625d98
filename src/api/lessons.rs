// src/api/lessons.rs

use crate::{
    client::{ApiClient, parse_response, require_token},
    error::{ApiError, ApiResult},
    models::Lesson,
    models::api::LessonResponse,
};
use std::sync::Arc;

/// Client for lesson content and completion endpoints. Lessons are
/// immutable once fetched; completion is recorded against the local
/// progress store by the caller, then confirmed server-side via
/// [`finish_lesson`](Self::finish_lesson).
pub struct LessonsApi {
    client: Arc<ApiClient>,
}

impl LessonsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `GET /lessons/{id}`
    pub async fn lesson_by_id(&self, lesson_id: i64, token: &str) -> ApiResult<Lesson> {
        require_token(token)?;
        let base_url = self.client.base_url()?;

        let url = format!("{base_url}/lessons/{lesson_id}");
        let res = self
            .client
            .send(self.client.http().get(&url).bearer_auth(token))
            .await?;
        if !res.status().is_success() {
            return Err(self
                .client
                .error_from_response(res, "Failed to load lesson")
                .await);
        }

        let body = self.client.read_json(res).await?;
        let wire: LessonResponse = parse_response(body, "Invalid lesson response")?;
        wire.into_lesson()
            .ok_or_else(|| ApiError::unknown(500, "Invalid lesson response"))
    }

    /// `PUT /lessons/{id}/finish`
    pub async fn finish_lesson(&self, lesson_id: i64, token: &str) -> ApiResult<()> {
        require_token(token)?;
        let base_url = self.client.base_url()?;

        let url = format!("{base_url}/lessons/{lesson_id}/finish");
        let res = self
            .client
            .send(self.client.http().put(&url).bearer_auth(token))
            .await?;
        if !res.status().is_success() {
            return Err(self
                .client
                .error_from_response(res, "Failed to finish lesson")
                .await);
        }
        Ok(())
    }
}
