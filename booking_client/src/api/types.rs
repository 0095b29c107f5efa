use serde::{Deserialize, Serialize};

use crate::session::{Role, UserProfile};

/// The backend wraps every successful payload in `{"data": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub(crate) data: T,
}

/// Payload of a successful login or admin-login call.
///
/// `access_token` is nominally required but checked by the caller so that a
/// malformed success response surfaces as an authentication failure, not a
/// decode failure. `user` is an optional embedded snapshot used as a fallback
/// when the identity endpoint is unreachable right after login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Error payloads vary between `message` and `error` keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

/// Registration form as the backend expects it.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub password: String,
    pub password_confirm: String,
    pub role: Role,
}

/// Partial profile update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// An inquiry submission. `anonymous_token` is filled in by the session
/// manager for unauthenticated submissions; callers leave it `None`.
#[derive(Debug, Clone, Serialize)]
pub struct InquiryRequest {
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub inquiry_date: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AssociationData {
    pub(crate) associated_count: u64,
}
