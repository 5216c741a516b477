//! Turn stored records into the series and profiles the components consume.

use super::records::{Channel, CustomerInteraction, FootTrafficRecord, SalesRecord};
use crate::features::FeatureSource;
use chrono::{DateTime, Datelike, Utc, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

static HOUR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)-(\d+)(AM|PM)").expect("Invalid regex: hour range"));

const SECONDS_PER_DAY: f64 = 86_400.0;

// =============================================================================
// Sales
// =============================================================================

/// Sale amounts in chronological order.
pub fn sales_series(records: &[SalesRecord]) -> Vec<f64> {
    let mut sorted: Vec<&SalesRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.date);
    sorted.into_iter().map(|r| r.amount).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdaySales {
    pub weekday: Weekday,
    /// Mean sale amount on this weekday; 0 when there were none.
    pub average: f64,
}

/// Average sale amount per weekday, Monday first.
pub fn sales_by_weekday(records: &[SalesRecord]) -> Vec<WeekdaySales> {
    let mut totals = [0.0; 7];
    let mut counts = [0usize; 7];
    for record in records {
        let day = record.date.weekday().num_days_from_monday() as usize;
        totals[day] += record.amount;
        counts[day] += 1;
    }

    std::iter::successors(Some(Weekday::Mon), |d| Some(d.succ()))
        .take(7)
        .map(|weekday| {
            let day = weekday.num_days_from_monday() as usize;
            WeekdaySales {
                weekday,
                average: if counts[day] == 0 {
                    0.0
                } else {
                    totals[day] / counts[day] as f64
                },
            }
        })
        .collect()
}

// =============================================================================
// Customers
// =============================================================================

/// RFM-style view of one customer interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub date: DateTime<Utc>,
    pub channel: Channel,
    pub count: f64,
    /// Whole days between the interaction and the reference date.
    pub recency: f64,
    /// Interactions recorded on the same channel.
    pub frequency: f64,
    /// Spend attributed to the customer. Interactions carry no amounts, so 0.
    pub monetary: f64,
    pub feedback: Option<String>,
}

impl FeatureSource for CustomerProfile {
    fn feature(&self, name: &str) -> Option<f64> {
        match name {
            "recency" => Some(self.recency),
            "frequency" => Some(self.frequency),
            "monetary" => Some(self.monetary),
            "count" => Some(self.count),
            _ => None,
        }
    }
}

/// One profile per interaction, with recency measured up to `as_of`.
pub fn customer_profiles(
    interactions: &[CustomerInteraction],
    as_of: DateTime<Utc>,
) -> Vec<CustomerProfile> {
    let mut per_channel: HashMap<Channel, usize> = HashMap::new();
    for interaction in interactions {
        *per_channel.entry(interaction.channel).or_default() += 1;
    }

    interactions
        .iter()
        .map(|interaction| {
            let elapsed = (as_of - interaction.date).num_seconds() as f64;
            CustomerProfile {
                date: interaction.date,
                channel: interaction.channel,
                count: interaction.count,
                recency: (elapsed / SECONDS_PER_DAY).round(),
                frequency: per_channel
                    .get(&interaction.channel)
                    .copied()
                    .unwrap_or_default() as f64,
                monetary: 0.0,
                feedback: interaction.feedback.clone(),
            }
        })
        .collect()
}

// =============================================================================
// Foot Traffic
// =============================================================================

/// Parse a range like `"9-11AM"` into 24-hour form (`9..11`).
///
/// The AM/PM suffix applies to both ends; 12PM stays 12.
pub fn parse_hour_range(range: &str) -> Option<Range<u32>> {
    let caps = HOUR_RANGE.captures(range)?;
    let start: u32 = caps[1].parse().ok()?;
    let end: u32 = caps[2].parse().ok()?;
    let pm = caps[3].eq_ignore_ascii_case("PM");

    let to_24 = |hour: u32| if pm && hour != 12 { hour + 12 } else { hour };
    Some(to_24(start)..to_24(end))
}

/// Visitors per hour for one record, spreading `count` evenly (rounded)
/// over each parsed peak range. Unparseable or empty ranges are skipped.
pub fn parse_peak_hours(record: &FootTrafficRecord) -> BTreeMap<u32, f64> {
    let mut hours = BTreeMap::new();
    for range in record.peak_hours.iter().filter_map(|r| parse_hour_range(r)) {
        if range.is_empty() {
            continue;
        }
        let per_hour = (record.count / range.len() as f64).round();
        for hour in range {
            hours.insert(hour, per_hour);
        }
    }
    hours
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyTraffic {
    pub hour: u32,
    /// Mean visitors in this hour across records that cover it.
    pub visitors: f64,
}

/// Average traffic per hour of day, hours ascending.
pub fn hourly_traffic(records: &[FootTrafficRecord]) -> Vec<HourlyTraffic> {
    let mut totals: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for record in records {
        for (hour, visitors) in parse_peak_hours(record) {
            let entry = totals.entry(hour).or_default();
            entry.0 += visitors;
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(hour, (total, count))| HourlyTraffic {
            hour,
            visitors: total / count as f64,
        })
        .collect()
}

/// Label an hour of day as `9AM`, `12PM` or `3PM`.
pub fn hour_label(hour: u32) -> String {
    match hour {
        0..12 => format!("{hour}AM"),
        12 => "12PM".to_string(),
        _ => format!("{}PM", hour - 12),
    }
}

/// The `n` busiest hours by total traffic, as labels. Ties keep the earlier hour.
pub fn peak_hours(records: &[FootTrafficRecord], n: usize) -> Vec<String> {
    let mut totals: BTreeMap<u32, f64> = BTreeMap::new();
    for record in records {
        for (hour, visitors) in parse_peak_hours(record) {
            *totals.entry(hour).or_default() += visitors;
        }
    }

    let mut ranked: Vec<(u32, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(n)
        .map(|(hour, _)| hour_label(hour))
        .collect()
}
