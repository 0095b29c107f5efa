use crate::session::{Role, UserProfile};

// Keys of the persisted credential triple, identical in both physical stores.
pub(crate) const KEY_TOKEN: &str = "authToken";
pub(crate) const KEY_USER: &str = "user";
pub(crate) const KEY_ROLE: &str = "userRole";

/// The durable copy of session essentials: what survives a process restart.
///
/// `user` and `role` may be absent when only the token has been acquired so
/// far (the profile fetch after login has not completed or failed).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CredentialRecord {
    pub(crate) token: String,
    pub(crate) user: Option<UserProfile>,
    pub(crate) role: Option<Role>,
}

impl CredentialRecord {
    /// Best known role: the explicit role key wins, else the stored profile's.
    pub(crate) fn effective_role(&self) -> Option<Role> {
        self.role.or_else(|| self.user.as_ref().map(|u| u.role))
    }
}
