// src/model/records.rs

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The (sku, channel) pair every table is keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub sku: String,
    pub channel: String,
}

impl GroupKey {
    pub fn new(sku: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            channel: channel.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sku, self.channel)
    }
}

/// One row of the forecast table: observed vs. predicted demand for a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub sku: String,
    pub channel: String,
    pub units_sold: f64,
    /// Actual demand one day ahead, the quantity being forecast.
    pub target_units_next_day: f64,
    pub prediction: f64,
    pub abs_error: f64,
}

impl ForecastRecord {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.sku.as_str(), self.channel.as_str())
    }
}

/// Rolling reliability and volatility metrics for one group.
///
/// Every metric is `None` when it cannot be computed (empty window, zero
/// denominator, too few days). `None` means "no evidence", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDiagnostics {
    pub sku: String,
    pub channel: String,
    pub wape_28d: Option<f64>,
    pub mae_28d: Option<f64>,
    pub demand_mean_28d: Option<f64>,
    pub demand_cv_28d: Option<f64>,
    pub regime_z: Option<f64>,
    /// Distinct dates present for the group inside the window.
    pub history_days: u32,
}

impl GroupDiagnostics {
    pub fn empty(key: &GroupKey) -> Self {
        Self {
            sku: key.sku.clone(),
            channel: key.channel.clone(),
            wape_28d: None,
            mae_28d: None,
            demand_mean_28d: None,
            demand_cv_28d: None,
            regime_z: None,
            history_days: 0,
        }
    }

    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.sku.as_str(), self.channel.as_str())
    }
}

/// Reorder recommendation for one group, before any confidence buffer.
///
/// Field order is the column order of `reorder_plan.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentPlan {
    pub sku: String,
    pub channel: String,
    pub inventory_on_hand: u32,
    pub lead_time_demand: f64,
    pub safety_stock: f64,
    pub reorder_qty: u32,
}

impl ReplenishmentPlan {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.sku.as_str(), self.channel.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    OrderBaseline,
    OrderConservative,
}

/// Separator used when reasons are flattened into a single CSV cell.
pub const REASON_SEPARATOR: &str = "; ";

/// Ordered list of human-readable reasons. Duplicates are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reasons(Vec<String>);

impl Reasons {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends `text` unless it is empty or already present.
    pub fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() && !self.0.contains(&text) {
            self.0.push(text);
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.0.iter().any(|r| r == text)
    }
}

impl fmt::Display for Reasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(REASON_SEPARATOR))
    }
}

impl Serialize for Reasons {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Reasons {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let mut reasons = Reasons::new();
        for part in raw.split(REASON_SEPARATOR) {
            reasons.push(part.trim());
        }
        Ok(reasons)
    }
}

/// One row of the decision report.
///
/// Field order is the column order of `decision_report.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub sku: String,
    pub channel: String,
    pub prediction: f64,
    pub units_sold: f64,
    pub confidence: Confidence,
    pub recommended_action: RecommendedAction,
    pub buffer_pct: f64,
    #[serde(rename = "reason")]
    pub reasons: Reasons,

    // Diagnostics (left join)
    pub wape_28d: Option<f64>,
    pub mae_28d: Option<f64>,
    pub demand_mean_28d: Option<f64>,
    pub demand_cv_28d: Option<f64>,
    pub regime_z: Option<f64>,
    pub history_days: Option<u32>,

    // Replenishment (left join)
    pub inventory_on_hand: Option<u32>,
    pub lead_time_demand: Option<f64>,
    pub safety_stock: Option<f64>,
    pub reorder_qty: Option<u32>,
    pub reorder_qty_adjusted: Option<u32>,
}

impl Decision {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.sku.as_str(), self.channel.as_str())
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part as written by
/// dataframe exports (`2025-03-01 00:00:00`, `2025-03-01T00:00:00`).
fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let day = raw
        .trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| de::Error::custom(format!("invalid date '{raw}': {e}")))
}
