mod client;
mod errors;
mod types;

pub use client::{BookingApi, HttpBookingApi};
pub use errors::ApiError;
pub use types::{InquiryRequest, LoginData, ProfileUpdate, RegisterRequest};
pub(crate) use types::{ApiEnvelope, AssociationData, ErrorBody};
