use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::config::BOOKING_API_BASE_URL;
use crate::session::UserProfile;

use super::errors::ApiError;
use super::types::{
    ApiEnvelope, AssociationData, ErrorBody, InquiryRequest, LoginData, ProfileUpdate,
    RegisterRequest,
};

/// The backend REST surface consumed by the session manager.
///
/// A trait seam so the coordination layer can be exercised against a scripted
/// implementation; production code uses [`HttpBookingApi`].
#[async_trait]
pub trait BookingApi: Send + Sync + 'static {
    async fn login(&self, email: &str, password: &str) -> Result<LoginData, ApiError>;

    async fn admin_login(&self, email: &str, password: &str) -> Result<LoginData, ApiError>;

    /// Identity probe: the authority on whether a token is still valid.
    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, ApiError>;

    async fn logout(&self, token: &str) -> Result<(), ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;

    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError>;

    async fn replace_profile(
        &self,
        token: &str,
        profile: &UserProfile,
    ) -> Result<UserProfile, ApiError>;

    /// Claim anonymous inquiries for the authenticated account; returns the
    /// number the backend actually associated.
    async fn associate_inquiries(
        &self,
        token: &str,
        anonymous_tokens: &[String],
    ) -> Result<u64, ApiError>;

    async fn submit_inquiry(&self, request: &InquiryRequest) -> Result<(), ApiError>;
}

pub struct HttpBookingApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBookingApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = Url::parse(BOOKING_API_BASE_URL.as_str()).map_err(|e| {
            ApiError::Config(format!(
                "Invalid BOOKING_API_BASE_URL '{}': {e}",
                BOOKING_API_BASE_URL.as_str()
            ))
        })?;
        tracing::info!("Booking API client targeting {}", base_url);
        Ok(Self::new(base_url))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::error_from_body(status, &response_body, fallback));
        }

        tracing::debug!("Response Body: {:#?}", response_body);
        serde_json::from_str(&response_body)
            .map_err(|e| ApiError::Serde(format!("Failed to deserialize response body: {e}")))
    }

    async fn read_status(response: reqwest::Response, fallback: &str) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let response_body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Err(Self::error_from_body(status, &response_body, fallback))
    }

    fn error_from_body(status: reqwest::StatusCode, body: &str, fallback: &str) -> ApiError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| fallback.to_string());

        if status == reqwest::StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized(message)
        } else {
            ApiError::Backend {
                status: status.as_u16(),
                message,
            }
        }
    }

    async fn login_at(&self, path: &str, email: &str, password: &str) -> Result<LoginData, ApiError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let envelope: ApiEnvelope<LoginData> =
            Self::read_json(response, "Login failed").await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginData, ApiError> {
        self.login_at("/login", email, password).await
    }

    async fn admin_login(&self, email: &str, password: &str) -> Result<LoginData, ApiError> {
        self.login_at("/admin-login", email, password).await
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .get(self.endpoint("/me"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let envelope: ApiEnvelope<UserProfile> =
            Self::read_json(response, "Session is no longer valid").await?;
        Ok(envelope.data)
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("/logout"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Self::read_status(response, "Logout failed").await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("/register"))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Self::read_status(response, "Registration failed").await
    }

    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .patch(self.endpoint("/profile"))
            .bearer_auth(token)
            .json(update)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let envelope: ApiEnvelope<UserProfile> =
            Self::read_json(response, "Profile update failed").await?;
        Ok(envelope.data)
    }

    async fn replace_profile(
        &self,
        token: &str,
        profile: &UserProfile,
    ) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .put(self.endpoint("/profile"))
            .bearer_auth(token)
            .json(profile)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let envelope: ApiEnvelope<UserProfile> =
            Self::read_json(response, "Profile update failed").await?;
        Ok(envelope.data)
    }

    async fn associate_inquiries(
        &self,
        token: &str,
        anonymous_tokens: &[String],
    ) -> Result<u64, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/inquiries/associate-anonymous"))
            .bearer_auth(token)
            .json(&json!({"anonymous_tokens": anonymous_tokens}))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let envelope: ApiEnvelope<AssociationData> =
            Self::read_json(response, "Inquiry association failed").await?;
        Ok(envelope.data.associated_count)
    }

    async fn submit_inquiry(&self, request: &InquiryRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("/inquiries"))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Self::read_status(response, "Inquiry submission failed").await
    }
}
