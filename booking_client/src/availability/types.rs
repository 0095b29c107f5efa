use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The date-bearing parts of a tour record, exactly as the backend ships
/// them. Three generations of schema coexist: a flat date list, seasonal
/// pricing blocks, and the legacy pricing-detail entries. Date strings are
/// untrusted input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TourSchedule {
    #[serde(default)]
    pub available_dates: Vec<String>,
    #[serde(default)]
    pub seasonal_pricing: Vec<SeasonalPricing>,
    #[serde(default)]
    pub pricing_details: Vec<PricingDetail>,
}

/// A seasonal pricing block. `dates` entries are either full calendar dates
/// or bare day-of-month numbers that only make sense inside the season's
/// start/end range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonalPricing {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub dates: Vec<String>,
}

/// Legacy pricing-detail entry with the same day-number ambiguity as
/// [`SeasonalPricing`], carrying its own season context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingDetail {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub season_start: Option<String>,
    #[serde(default)]
    pub season_end: Option<String>,
}

/// Outcome of the availability calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub available: bool,
    pub message: String,
    pub next_available_date: Option<NaiveDate>,
}
