use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::{BookingApi, HttpBookingApi, InquiryRequest, ProfileUpdate, RegisterRequest};
use crate::credentials::{CredentialRecord, CredentialStore};
use crate::inquiry::{INQUIRY_BRIDGE_DELAY_SECS, InquiryTokenStore, associate_anonymous_inquiries};
use crate::session::{Role, Session, UserProfile};

use super::errors::CoordinationError;

/// Outcome of [`SessionManager::register`]: registration always succeeded,
/// the chained auto-login may not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    SignedIn,
    RegisteredOnly,
}

/// Owner of the client session.
///
/// Holds the single in-memory [`Session`] and serializes every mutation:
/// hydration at startup, the auth actions, write-through credential
/// persistence, and the deferred anonymous-inquiry association. UI layers
/// observe state through [`SessionManager::subscribe`] rather than reaching
/// into globals.
pub struct SessionManager {
    api: Arc<dyn BookingApi>,
    credentials: CredentialStore,
    inquiries: InquiryTokenStore,
    state: watch::Sender<Session>,
    bridge_task: Mutex<Option<JoinHandle<()>>>,
    bridge_delay: Duration,
}

impl SessionManager {
    pub fn new(
        api: Arc<dyn BookingApi>,
        credentials: CredentialStore,
        inquiries: InquiryTokenStore,
    ) -> Self {
        let (state, _) = watch::channel(Session::initial());
        Self {
            api,
            credentials,
            inquiries,
            state,
            bridge_task: Mutex::new(None),
            bridge_delay: Duration::from_secs(*INQUIRY_BRIDGE_DELAY_SECS),
        }
    }

    /// Production wiring: HTTP API client, cookie-jar plus JSON-file
    /// credential stores, inquiry tokens in the JSON file.
    pub fn from_env() -> Result<Self, CoordinationError> {
        let api = HttpBookingApi::from_env()?;
        let credentials = CredentialStore::from_env();
        let inquiries = InquiryTokenStore::from_env();
        Ok(Self::new(Arc::new(api), credentials, inquiries))
    }

    /// Override the inquiry-bridge deferral.
    pub fn with_bridge_delay(mut self, delay: Duration) -> Self {
        self.bridge_delay = delay;
        self
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Watch the session; the receiver yields a fresh snapshot on every
    /// mutation.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Hydrate the session from the credential store and revalidate it
    /// against the identity endpoint.
    ///
    /// Absent record: settle unauthenticated. Present record: populate
    /// optimistically, then probe `/me` once; a failed probe (transport,
    /// 401, or unreadable stored data) clears the session and erases the
    /// record from both stores. No partial state survives, and `loading`
    /// always ends `false`.
    pub async fn initialize(&self) {
        let _loading = LoadingGuard::begin(&self.state);

        let record = match self.credentials.load().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!("No stored credentials, starting unauthenticated");
                self.reset_session();
                return;
            }
            Err(e) => {
                tracing::warn!("Stored credentials unreadable, clearing: {}", e);
                self.reset_session();
                self.clear_credentials_logged().await;
                return;
            }
        };

        // Optimistic hydration: render as authenticated while the probe runs
        self.set_authenticated(
            record.token.clone(),
            record.user.clone(),
            record.effective_role(),
        );

        match self.api.fetch_profile(&record.token).await {
            Ok(profile) => {
                tracing::info!("Stored session validated for '{}'", profile.username);
                let role = profile.role;
                self.set_authenticated(record.token.clone(), Some(profile.clone()), Some(role));
                self.save_credentials_logged(&CredentialRecord {
                    token: record.token,
                    user: Some(profile),
                    role: Some(role),
                })
                .await;
            }
            Err(e) => {
                tracing::info!("Stored session failed validation, clearing: {}", e);
                self.reset_session();
                self.clear_credentials_logged().await;
            }
        }
    }

    /// Authenticate a customer account.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), CoordinationError> {
        let _loading = LoadingGuard::begin(&self.state);
        self.login_inner(email, password, false).await
    }

    /// Authenticate against the admin login endpoint. Defense-in-depth on
    /// top of the backend's own gating: a non-admin account that somehow
    /// obtains a token is logged straight back out.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<(), CoordinationError> {
        let _loading = LoadingGuard::begin(&self.state);
        self.login_inner(email, password, true).await
    }

    async fn login_inner(
        &self,
        email: &str,
        password: &str,
        require_admin: bool,
    ) -> Result<(), CoordinationError> {
        let login = if require_admin {
            self.api.admin_login(email, password).await?
        } else {
            self.api.login(email, password).await?
        };

        let token = match login.access_token {
            Some(token) if !token.is_empty() => token,
            _ => {
                return Err(CoordinationError::Authentication(
                    "Login response did not include an access token".to_string(),
                )
                .log());
            }
        };

        // Token is durable before the profile fetch
        self.save_credentials_logged(&CredentialRecord {
            token: token.clone(),
            user: None,
            role: None,
        })
        .await;
        self.set_authenticated(token.clone(), None, None);

        let profile = match self.api.fetch_profile(&token).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::debug!("Profile fetch after login failed: {}", e);
                login.user
            }
        };

        if require_admin && profile.as_ref().map(|p| p.role) != Some(Role::Admin) {
            self.logout_inner().await;
            return Err(CoordinationError::Authentication(
                "Access denied: this account does not have administrator privileges".to_string(),
            )
            .log());
        }

        match profile {
            Some(profile) => {
                let role = profile.role;
                tracing::info!("Signed in as '{}' ({})", profile.username, role);
                self.set_authenticated(token.clone(), Some(profile.clone()), Some(role));
                self.save_credentials_logged(&CredentialRecord {
                    token: token.clone(),
                    user: Some(profile),
                    role: Some(role),
                })
                .await;
                self.schedule_inquiry_bridge(token).await;
            }
            None => {
                // Accepted degraded state: token without a profile snapshot.
                // The next initializer run repairs or clears it.
                tracing::warn!("Authenticated without a user profile");
            }
        }

        Ok(())
    }

    /// End the session. The server-side call is best-effort; locally the
    /// session is always cleared, the credential record erased from both
    /// stores, and any pending inquiry-bridge run canceled.
    pub async fn logout(&self) {
        let _loading = LoadingGuard::begin(&self.state);
        self.logout_inner().await;
    }

    async fn logout_inner(&self) {
        self.cancel_inquiry_bridge().await;

        let token = self.state.borrow().token.clone();
        if let Some(token) = token {
            if let Err(e) = self.api.logout(&token).await {
                tracing::debug!("Server-side logout failed (ignored): {}", e);
            }
        }

        self.reset_session();
        self.clear_credentials_logged().await;
        tracing::info!("Signed out");
    }

    /// Create an account, then chain straight into a login with the same
    /// credentials.
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<RegisterOutcome, CoordinationError> {
        {
            let _loading = LoadingGuard::begin(&self.state);
            self.api.register(&request).await?;
            tracing::info!("Registered account '{}'", request.username);
        }

        match self.login(&request.email, &request.password).await {
            Ok(()) => Ok(RegisterOutcome::SignedIn),
            Err(e) => {
                tracing::info!("Registered but auto-login failed: {}", e);
                Ok(RegisterOutcome::RegisteredOnly)
            }
        }
    }

    /// Partially update the profile and write the fresh snapshot through.
    /// The session role is not altered by this call.
    pub async fn update_profile(
        &self,
        update: ProfileUpdate,
    ) -> Result<UserProfile, CoordinationError> {
        let _loading = LoadingGuard::begin(&self.state);
        let token = self.require_token()?;

        let profile = self.api.update_profile(&token, &update).await?;
        self.store_refreshed_profile(token, profile.clone()).await;
        Ok(profile)
    }

    /// Replace the whole profile; otherwise identical to
    /// [`SessionManager::update_profile`].
    pub async fn replace_profile(
        &self,
        profile: UserProfile,
    ) -> Result<UserProfile, CoordinationError> {
        let _loading = LoadingGuard::begin(&self.state);
        let token = self.require_token()?;

        let profile = self.api.replace_profile(&token, &profile).await?;
        self.store_refreshed_profile(token, profile.clone()).await;
        Ok(profile)
    }

    /// Submit a tour inquiry. Unauthenticated submissions are tagged with a
    /// fresh anonymous token, which is remembered for association after a
    /// later login.
    pub async fn submit_inquiry(
        &self,
        mut request: InquiryRequest,
    ) -> Result<(), CoordinationError> {
        let _loading = LoadingGuard::begin(&self.state);

        if !self.state.borrow().is_authenticated {
            request.anonymous_token = Some(Uuid::new_v4().to_string());
        }

        self.api.submit_inquiry(&request).await?;

        if let Some(token) = request.anonymous_token {
            if let Err(e) = self.inquiries.append(&token).await {
                tracing::warn!("Inquiry sent but anonymous token not stored: {}", e);
            }
        }
        Ok(())
    }

    /// Run the anonymous-inquiry association now instead of waiting for the
    /// deferred run. Best-effort like the deferred path; returns the
    /// associated count when the backend answered.
    pub async fn associate_anonymous_inquiries(&self) -> Option<u64> {
        let token = self.state.borrow().token.clone()?;
        associate_anonymous_inquiries(self.api.as_ref(), &self.inquiries, &token).await
    }

    /// Schedule the bridge to run once after the configured delay,
    /// detached from the caller. A new login replaces any pending run;
    /// logout aborts it.
    async fn schedule_inquiry_bridge(&self, token: String) {
        let api = Arc::clone(&self.api);
        let store = self.inquiries.clone();
        let delay = self.bridge_delay;

        let mut slot = self.bridge_task.lock().await;
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            associate_anonymous_inquiries(api.as_ref(), &store, &token).await;
        }));
    }

    async fn cancel_inquiry_bridge(&self) {
        if let Some(task) = self.bridge_task.lock().await.take() {
            task.abort();
        }
    }

    fn require_token(&self) -> Result<String, CoordinationError> {
        self.state
            .borrow()
            .token
            .clone()
            .ok_or_else(|| CoordinationError::Unauthorized.log())
    }

    async fn store_refreshed_profile(&self, token: String, profile: UserProfile) {
        self.state.send_modify(|session| {
            session.user = Some(profile.clone());
        });
        let role = self.state.borrow().role;
        self.save_credentials_logged(&CredentialRecord {
            token,
            user: Some(profile),
            role,
        })
        .await;
    }

    // user/token/role always move together
    fn set_authenticated(&self, token: String, user: Option<UserProfile>, role: Option<Role>) {
        self.state.send_modify(|session| {
            session.token = Some(token);
            session.user = user;
            session.role = role;
            session.is_authenticated = true;
        });
    }

    fn reset_session(&self) {
        self.state.send_modify(|session| {
            session.token = None;
            session.user = None;
            session.role = None;
            session.is_authenticated = false;
        });
    }

    // Persistence failures must not abort the auth action that triggered
    // them; the in-memory session stays authoritative.
    async fn save_credentials_logged(&self, record: &CredentialRecord) {
        if let Err(e) = self.credentials.save(record).await {
            tracing::error!("Failed to write credential stores: {}", e);
        }
    }

    async fn clear_credentials_logged(&self) {
        if let Err(e) = self.credentials.clear().await {
            tracing::error!("Failed to clear credential stores: {}", e);
        }
    }
}

/// Raises `Session.loading` for the duration of an action; release is
/// guaranteed on every exit path, success or failure.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<Session>,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a watch::Sender<Session>) -> Self {
        state.send_modify(|session| session.loading = true);
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|session| session.loading = false);
    }
}
