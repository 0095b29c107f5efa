mod errors;
mod types;

pub use errors::SessionError;
pub use types::{Role, Session, UserProfile};
