// src/api/profile.rs

use crate::{
    client::{ApiClient, parse_response, require_token},
    constants::REGISTRATION_NOT_COMPLETED_ERROR,
    error::{ApiError, ApiResult},
    models::UserProfile,
    models::api::UserProfileResponse,
};
use std::sync::Arc;

/// Client for the user profile endpoints. Profiles are fetched fresh per
/// call and never cached here.
pub struct ProfileApi {
    client: Arc<ApiClient>,
}

impl ProfileApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `GET /user/profile`
    ///
    /// A 401 can mean two different things: an expired session, or a valid
    /// session whose registration was never finished. The backend
    /// distinguishes them only through the sentinel body, so the 401 branch
    /// inspects it before giving up on the session.
    pub async fn profile(&self, token: &str) -> ApiResult<UserProfile> {
        require_token(token)?;
        let base_url = self.client.base_url()?;

        let url = format!("{base_url}/user/profile");
        let res = self
            .client
            .send(self.client.http().get(&url).bearer_auth(token))
            .await?;

        let status = res.status();
        if status.as_u16() == 401 {
            // An exact sentinel body is converted (and signaled) inside
            // read_error_payload; the substring check below catches
            // non-JSON renderings of the same condition.
            let payload = self.client.read_error_payload(res).await?;
            if payload
                .text
                .as_deref()
                .is_some_and(|text| text.contains(REGISTRATION_NOT_COMPLETED_ERROR))
            {
                self.client.signals().emit_needs_complete_registration();
                return Err(ApiError::needs_complete_registration(
                    401,
                    "Registration not completed",
                ));
            }
            return Err(ApiError::unauthorized(
                payload.text.unwrap_or_else(|| "Unauthorized".to_string()),
            ));
        }
        if !status.is_success() {
            return Err(self
                .client
                .error_from_response(res, "Failed to load profile")
                .await);
        }

        let body = self.client.read_json(res).await?;
        let wire: UserProfileResponse = parse_response(body, "Invalid profile response")?;
        Ok(wire.into_profile())
    }

    /// `GET /users/{id}/profile` — public, no bearer token.
    pub async fn user_by_id(&self, user_id: i64) -> ApiResult<UserProfile> {
        let base_url = self.client.base_url()?;

        let url = format!("{base_url}/users/{user_id}/profile");
        let res = self.client.send(self.client.http().get(&url)).await?;

        match res.status().as_u16() {
            404 => Err(ApiError::unknown(404, "User not found")),
            status if !res.status().is_success() => {
                let payload = self.client.read_error_payload(res).await?;
                Err(ApiError::unknown(
                    status,
                    payload.message_or("Failed to load user profile"),
                ))
            }
            _ => {
                let body = self.client.read_json(res).await?;
                let wire: UserProfileResponse =
                    parse_response(body, "Invalid user profile response")?;
                Ok(wire.into_profile())
            }
        }
    }
}
