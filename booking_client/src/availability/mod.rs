mod config;
mod evaluate;
mod types;

pub use evaluate::{evaluate_availability, evaluate_availability_on};
pub use types::{Availability, PricingDetail, SeasonalPricing, TourSchedule};
