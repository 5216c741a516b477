//! Operational business records as stored by the calling layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One day's (or one transaction's) sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub date: DateTime<Utc>,
    pub amount: f64,
    #[serde(default)]
    pub items_sold: u32,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// How a customer reached the business.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    #[default]
    WalkIn,
    Online,
    Phone,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInteraction {
    pub date: DateTime<Utc>,
    pub count: f64,
    #[serde(default, alias = "type")]
    pub channel: Channel,
    /// Free-text feedback left with the interaction, if any.
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootTrafficRecord {
    pub date: DateTime<Utc>,
    /// Visitors over the record's period.
    pub count: f64,
    /// Busy ranges such as `"9-11AM"` or `"2-4PM"`.
    #[serde(default)]
    pub peak_hours: Vec<String>,
}

/// Everything one business has recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessData {
    pub sales_data: Vec<SalesRecord>,
    pub customer_interactions: Vec<CustomerInteraction>,
    pub foot_traffic: Vec<FootTrafficRecord>,
}
