mod store;
mod types;

pub use store::CredentialStore;
pub(crate) use types::CredentialRecord;
pub(crate) use types::{KEY_ROLE, KEY_TOKEN, KEY_USER};
