//! Shared test plumbing: a scripted backend API and common fixtures.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::env;
use std::sync::Mutex;

use crate::api::{
    ApiError, BookingApi, InquiryRequest, LoginData, ProfileUpdate, RegisterRequest,
};
use crate::session::{Role, Session, UserProfile};

/// Set an environment variable for the duration of the test and restore the
/// original value afterward. Callers must run under `#[serial]`.
pub(crate) fn with_env_var<F, R>(key: &str, value: Option<&str>, test: F) -> R
where
    F: FnOnce() -> R,
{
    let original = env::var(key).ok();

    match value {
        Some(val) => unsafe { env::set_var(key, val) },
        None => unsafe { env::remove_var(key) },
    }

    let result = test();

    match original {
        Some(val) => unsafe { env::set_var(key, val) },
        None => unsafe { env::remove_var(key) },
    }

    result
}

pub(crate) fn sample_profile(role: Role) -> UserProfile {
    UserProfile {
        id: "u1".to_string(),
        email: "alice@example.com".to_string(),
        username: "alice".to_string(),
        role,
        first_name: Some("Alice".to_string()),
        last_name: Some("Archer".to_string()),
        phone: None,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn authenticated_session(role: Role) -> Session {
    Session {
        user: Some(sample_profile(role)),
        token: Some("tok".to_string()),
        role: Some(role),
        is_authenticated: true,
        loading: false,
    }
}

pub(crate) fn sample_register_request() -> RegisterRequest {
    RegisterRequest {
        first_name: "Alice".to_string(),
        last_name: "Archer".to_string(),
        email: "alice@example.com".to_string(),
        username: "alice".to_string(),
        phone: "555-0100".to_string(),
        password: "correct horse".to_string(),
        password_confirm: "correct horse".to_string(),
        role: Role::User,
    }
}

pub(crate) fn sample_inquiry_request() -> InquiryRequest {
    InquiryRequest {
        name: "Alice Archer".to_string(),
        email: "alice@example.com".to_string(),
        contact_number: "555-0100".to_string(),
        inquiry_date: "2099-05-01".to_string(),
        message: "Is the glacier hike family-friendly?".to_string(),
        anonymous_token: None,
    }
}

/// Scripted stand-in for the backend: each endpoint pops from its own
/// response queue, and every call is recorded. An empty queue fails with a
/// transport error, except logout, which defaults to success so teardown
/// paths do not need scripting.
pub(crate) struct MockBookingApi {
    login_responses: Mutex<VecDeque<Result<LoginData, ApiError>>>,
    admin_login_responses: Mutex<VecDeque<Result<LoginData, ApiError>>>,
    profile_responses: Mutex<VecDeque<Result<UserProfile, ApiError>>>,
    logout_responses: Mutex<VecDeque<Result<(), ApiError>>>,
    register_responses: Mutex<VecDeque<Result<(), ApiError>>>,
    update_responses: Mutex<VecDeque<Result<UserProfile, ApiError>>>,
    associate_responses: Mutex<VecDeque<Result<u64, ApiError>>>,
    inquiry_responses: Mutex<VecDeque<Result<(), ApiError>>>,
    calls: Mutex<Vec<String>>,
    associated_tokens: Mutex<Option<Vec<String>>>,
    last_inquiry: Mutex<Option<InquiryRequest>>,
}

impl MockBookingApi {
    pub(crate) fn new() -> Self {
        Self {
            login_responses: Mutex::new(VecDeque::new()),
            admin_login_responses: Mutex::new(VecDeque::new()),
            profile_responses: Mutex::new(VecDeque::new()),
            logout_responses: Mutex::new(VecDeque::new()),
            register_responses: Mutex::new(VecDeque::new()),
            update_responses: Mutex::new(VecDeque::new()),
            associate_responses: Mutex::new(VecDeque::new()),
            inquiry_responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            associated_tokens: Mutex::new(None),
            last_inquiry: Mutex::new(None),
        }
    }

    pub(crate) fn script_login(&self, response: Result<LoginData, ApiError>) {
        self.login_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn script_admin_login(&self, response: Result<LoginData, ApiError>) {
        self.admin_login_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn script_profile(&self, response: Result<UserProfile, ApiError>) {
        self.profile_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn script_logout(&self, response: Result<(), ApiError>) {
        self.logout_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn script_register(&self, response: Result<(), ApiError>) {
        self.register_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn script_update(&self, response: Result<UserProfile, ApiError>) {
        self.update_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn script_associate(&self, response: Result<u64, ApiError>) {
        self.associate_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn script_inquiry(&self, response: Result<(), ApiError>) {
        self.inquiry_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn call_count(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == name)
            .count()
    }

    pub(crate) fn last_associated_tokens(&self) -> Option<Vec<String>> {
        self.associated_tokens.lock().unwrap().clone()
    }

    pub(crate) fn last_inquiry(&self) -> Option<InquiryRequest> {
        self.last_inquiry.lock().unwrap().clone()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    fn next<T>(
        queue: &Mutex<VecDeque<Result<T, ApiError>>>,
        name: &str,
    ) -> Result<T, ApiError> {
        queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ApiError::Transport(format!(
                "no scripted response for {name}"
            )))
        })
    }
}

#[async_trait]
impl BookingApi for MockBookingApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginData, ApiError> {
        self.record("login");
        Self::next(&self.login_responses, "login")
    }

    async fn admin_login(&self, _email: &str, _password: &str) -> Result<LoginData, ApiError> {
        self.record("admin_login");
        Self::next(&self.admin_login_responses, "admin_login")
    }

    async fn fetch_profile(&self, _token: &str) -> Result<UserProfile, ApiError> {
        self.record("fetch_profile");
        Self::next(&self.profile_responses, "fetch_profile")
    }

    async fn logout(&self, _token: &str) -> Result<(), ApiError> {
        self.record("logout");
        self.logout_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<(), ApiError> {
        self.record("register");
        Self::next(&self.register_responses, "register")
    }

    async fn update_profile(
        &self,
        _token: &str,
        _update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.record("update_profile");
        Self::next(&self.update_responses, "update_profile")
    }

    async fn replace_profile(
        &self,
        _token: &str,
        _profile: &UserProfile,
    ) -> Result<UserProfile, ApiError> {
        self.record("replace_profile");
        Self::next(&self.update_responses, "replace_profile")
    }

    async fn associate_inquiries(
        &self,
        _token: &str,
        anonymous_tokens: &[String],
    ) -> Result<u64, ApiError> {
        self.record("associate_inquiries");
        *self.associated_tokens.lock().unwrap() = Some(anonymous_tokens.to_vec());
        Self::next(&self.associate_responses, "associate_inquiries")
    }

    async fn submit_inquiry(&self, request: &InquiryRequest) -> Result<(), ApiError> {
        self.record("submit_inquiry");
        *self.last_inquiry.lock().unwrap() = Some(request.clone());
        Self::next(&self.inquiry_responses, "submit_inquiry")
    }
}
