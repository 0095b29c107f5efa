//! booking_client - Session and booking coordination for tour-booking clients
//!
//! This crate owns the client side of the authentication lifecycle against a
//! tour-booking backend: durable credential storage, session hydration and
//! revalidation, the login/logout/register flows, anonymous inquiry
//! association, route authorization decisions, and the booking availability
//! calculation.

mod api;
mod authz;
mod availability;
mod config;
mod coordination;
mod credentials;
mod inquiry;
mod session;
mod storage;
mod utils;

#[cfg(test)]
mod test_utils;

// Re-export the main coordination components
pub use coordination::{CoordinationError, RegisterOutcome, SessionManager};

pub use api::{
    ApiError, BookingApi, HttpBookingApi, InquiryRequest, LoginData, ProfileUpdate,
    RegisterRequest,
};

pub use authz::{
    GuardState, RouteDecision, authorize_admin_route, authorize_customer_route, guard_state,
    has_role,
};

pub use availability::{
    Availability, PricingDetail, SeasonalPricing, TourSchedule, evaluate_availability,
    evaluate_availability_on,
};

pub use credentials::CredentialStore;
pub use inquiry::InquiryTokenStore;
pub use session::{Role, Session, SessionError, UserProfile};

// Re-export the configuration knobs callers may want to inspect
pub use config::BOOKING_API_BASE_URL;
pub use storage::{AUTH_COOKIE_FILE, AUTH_COOKIE_MAX_AGE, AUTH_STATE_FILE};
