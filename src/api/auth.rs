// src/api/auth.rs

use crate::{
    client::{ApiClient, parse_response, require_token},
    error::{ApiError, ApiResult},
    models::{CompleteRegistrationRequest, UserProfile},
    models::api::UserProfileResponse,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct CompleteRegistrationBody {
    name: String,
    surname: String,
    birthdate: String,
    avatar: String,
}

/// Client for the registration-completion endpoint. Token acquisition and
/// refresh belong to the external auth collaborator; this only finishes a
/// profile for an already-issued session.
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `POST /auth/complete-registration`
    pub async fn complete_registration(
        &self,
        token: &str,
        request: &CompleteRegistrationRequest,
    ) -> ApiResult<UserProfile> {
        require_token(token)?;
        if request.name.is_empty() || request.surname.is_empty() || request.birthdate.is_empty() {
            return Err(ApiError::validation(422, "Missing required fields"));
        }
        let base_url = self.client.base_url()?;

        let body = CompleteRegistrationBody {
            name: request.name.clone(),
            surname: request.surname.clone(),
            birthdate: normalize_birthdate(&request.birthdate),
            avatar: self.encode_avatar(request.avatar.as_deref()).await,
        };

        let url = format!("{base_url}/auth/complete-registration");
        let res = self
            .client
            .send(self.client.http().post(&url).bearer_auth(token).json(&body))
            .await?;

        match res.status().as_u16() {
            401 => Err(ApiError::unauthorized("Unauthorized")),
            422 => {
                let payload = self.client.read_error_payload(res).await?;
                Err(ApiError::validation(422, payload.message_or("Validation error")))
            }
            status if !res.status().is_success() => {
                let payload = self.client.read_error_payload(res).await?;
                Err(ApiError::unknown(
                    status,
                    payload.message_or("Failed to complete registration"),
                ))
            }
            _ => {
                let body = self.client.read_json(res).await?;
                let wire: UserProfileResponse =
                    parse_response(body, "Invalid complete-registration response")?;
                Ok(wire.into_profile())
            }
        }
    }

    /// Avatar handling is cosmetic: any failure degrades to an empty string
    /// rather than blocking registration.
    async fn encode_avatar(&self, avatar: Option<&str>) -> String {
        match avatar {
            Some(value) if value.starts_with("http") => {
                self.image_url_to_base64(value).await.unwrap_or_default()
            }
            Some(value) if value.starts_with("data:image") => value
                .split_once(',')
                .map(|(_, data)| data.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    async fn image_url_to_base64(&self, image_url: &str) -> Option<String> {
        let res = self.client.http().get(image_url).send().await.ok()?;
        let bytes = res.bytes().await.ok()?;
        Some(BASE64.encode(bytes))
    }
}

/// A bare `YYYY-MM-DD` date gets a midnight UTC time appended; anything
/// already carrying a time component is passed through.
fn normalize_birthdate(birthdate: &str) -> String {
    if birthdate.contains('T') {
        birthdate.to_string()
    } else {
        format!("{birthdate}T00:00:00Z")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_dates_get_a_time_component() {
        assert_eq!(normalize_birthdate("1999-04-21"), "1999-04-21T00:00:00Z");
        assert_eq!(
            normalize_birthdate("1999-04-21T12:30:00Z"),
            "1999-04-21T12:30:00Z"
        );
    }
}
