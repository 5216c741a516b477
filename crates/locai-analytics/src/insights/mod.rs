//! Insights over a business's operational records.
//!
//! Stored sales, customer interactions and foot-traffic records are turned
//! into the series and profiles the analytics components consume, and the
//! component results are summarized as human-readable [`Insight`]s.

mod extract;
mod generator;
mod records;

pub use extract::{
    CustomerProfile, HourlyTraffic, WeekdaySales, customer_profiles, hour_label, hourly_traffic,
    parse_hour_range, parse_peak_hours, peak_hours, sales_by_weekday, sales_series,
};
pub use generator::{Insight, InsightGenerator, InsightKind};
pub use records::{BusinessData, Channel, CustomerInteraction, FootTrafficRecord, SalesRecord};
