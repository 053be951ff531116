use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Knobs for quote calculation. Values come from business-rules config; the
/// defaults match the legacy client ($15.00/day insurance, 10% tax).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub insurance_cents_per_day: i64,
    pub tax_rate: f64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            insurance_cents_per_day: 1500,
            tax_rate: 0.10,
        }
    }
}

/// Cost breakdown for a rental interval. Derived data: recomputed whenever
/// the interval changes, never edited directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RentalQuote {
    pub days: i64,
    pub base_cents: i64,
    pub insurance_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

/// Billable days for an interval: any started 24-hour block counts as a full
/// day, and every rental is billed at least one day.
pub fn rental_days(pickup: DateTime<Utc>, return_at: DateTime<Utc>) -> i64 {
    const DAY_SECONDS: i64 = 24 * 60 * 60;
    let seconds = (return_at - pickup).num_seconds();
    if seconds <= 0 {
        return 1;
    }
    let days = (seconds + DAY_SECONDS - 1) / DAY_SECONDS;
    days.max(1)
}

impl QuoteConfig {
    /// Quote an interval at a vehicle's daily rate.
    pub fn quote(
        &self,
        price_per_day_cents: i64,
        pickup: DateTime<Utc>,
        return_at: DateTime<Utc>,
    ) -> RentalQuote {
        let days = rental_days(pickup, return_at);
        let base_cents = price_per_day_cents * days;
        let insurance_cents = self.insurance_cents_per_day * days;
        let tax_cents = ((base_cents + insurance_cents) as f64 * self.tax_rate).round() as i64;
        RentalQuote {
            days,
            base_cents,
            insurance_cents,
            tax_cents,
            total_cents: base_cents + insurance_cents + tax_cents,
        }
    }
}
