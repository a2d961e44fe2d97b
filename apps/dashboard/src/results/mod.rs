//! Results of a dashboard query: the two API breakdowns merged into one
//! [`ResultSet`], and the fetcher that produces it.

mod aggregate;
mod fetch;

pub use aggregate::aggregate;
pub use fetch::{PendingFetch, ResultsFetcher};

use crate::time_periods::{TimePeriod, TradeRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of the statistics API response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub results: Vec<TradeRecord>,
    #[serde(default)]
    pub sources_used: Vec<SourceUsed>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceUsed {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub source_last_updated: Option<String>,
    #[serde(default)]
    pub last_imported: Option<String>,
}

/// Merged outcome of a successful results fetch. Both entry lists are
/// non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub product_group_entry: Vec<TradeRecord>,
    pub partner_country_entry: Vec<TradeRecord>,
    pub reporter_country: Option<String>,
    pub source_last_updated: Option<String>,
    pub time_periods: Vec<TimePeriod>,
}

const PRODUCT_GROUP_LABEL_KEYS: &[&str] = &["product_group", "product_groups", "group"];
const PARTNER_COUNTRY_LABEL_KEYS: &[&str] = &["partner_country", "partner_countries", "partner"];

impl ResultSet {
    pub fn product_group_rows(&self, period: &str) -> Vec<(String, Option<f64>)> {
        breakdown_rows(&self.product_group_entry, PRODUCT_GROUP_LABEL_KEYS, period)
    }

    pub fn partner_country_rows(&self, period: &str) -> Vec<(String, Option<f64>)> {
        breakdown_rows(&self.partner_country_entry, PARTNER_COUNTRY_LABEL_KEYS, period)
    }

    pub fn latest_period(&self) -> Option<&TimePeriod> {
        self.time_periods.last()
    }
}

fn breakdown_rows(
    records: &[TradeRecord],
    label_keys: &[&str],
    period: &str,
) -> Vec<(String, Option<f64>)> {
    records
        .iter()
        .map(|record| (record_label(record, label_keys), record_value(record, period)))
        .collect()
}

/// Display name of a record: the first preferred key holding a string, else
/// the first string field at all.
pub fn record_label(record: &TradeRecord, preferred: &[&str]) -> String {
    preferred
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .or_else(|| record.values().find_map(Value::as_str))
        .unwrap_or("(unnamed)")
        .to_string()
}

/// Numeric value of `key`; numeric strings are accepted too.
pub fn record_value(record: &TradeRecord, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
