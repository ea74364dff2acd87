// src/model/history.rs

use crate::model::records::{ForecastRecord, GroupKey};
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use tracing::warn;

/// The full forecast table for one run, anchored at its latest date ("today").
#[derive(Debug, Clone)]
pub struct ForecastHistory {
    records: Vec<ForecastRecord>,
    today: NaiveDate,
}

impl ForecastHistory {
    /// Returns `None` for an empty table, since "today" is undefined then.
    pub fn new(records: Vec<ForecastRecord>) -> Option<Self> {
        let today = records.iter().map(|r| r.date).max()?;
        Some(Self { records, today })
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First date inside a trailing window of `lookback_days` ending today.
    pub fn window_start(&self, lookback_days: u32) -> NaiveDate {
        let back = u64::from(lookback_days.saturating_sub(1));
        self.today
            .checked_sub_days(Days::new(back))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Splits the table by group. Rows inside each group are sorted by date.
    pub fn partition(&self) -> BTreeMap<GroupKey, Vec<&ForecastRecord>> {
        let mut groups: BTreeMap<GroupKey, Vec<&ForecastRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.key()).or_default().push(record);
        }
        for rows in groups.values_mut() {
            rows.sort_by_key(|r| r.date);
        }
        groups
    }

    /// Today's row for every group that has one, in key order.
    ///
    /// If a group carries several rows for today, the last one read wins.
    pub fn snapshot(&self) -> Vec<&ForecastRecord> {
        let mut latest: BTreeMap<GroupKey, &ForecastRecord> = BTreeMap::new();
        for record in self.records.iter().filter(|r| r.date == self.today) {
            if let Some(previous) = latest.insert(record.key(), record) {
                warn!(group = %previous.key(), date = %self.today, "duplicate forecast row for today, keeping the last one");
            }
        }
        latest.into_values().collect()
    }
}
