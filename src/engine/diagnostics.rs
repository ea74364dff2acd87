// src/engine/diagnostics.rs

use crate::model::history::ForecastHistory;
use crate::model::records::{ForecastRecord, GroupDiagnostics, GroupKey};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Days per half of the regime-change comparison (latest 7 vs. prior 7).
pub const REGIME_HALF_DAYS: usize = 7;

/// Weighted absolute percentage error: `sum|actual - predicted| / sum|actual|`.
///
/// Returns `None` when total actual demand is zero.
pub fn wape(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    let denom: f64 = actual.iter().map(|a| a.abs()).sum();
    if denom == 0.0 {
        return None;
    }
    let err: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    Some(err / denom)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Computes diagnostics for one group from its rows inside the window.
pub fn diagnose_group(key: &GroupKey, window: &[&ForecastRecord]) -> GroupDiagnostics {
    if window.is_empty() {
        return GroupDiagnostics::empty(key);
    }

    let actual: Vec<f64> = window.iter().map(|r| r.target_units_next_day).collect();
    let predicted: Vec<f64> = window.iter().map(|r| r.prediction).collect();
    let demand: Vec<f64> = window.iter().map(|r| r.units_sold).collect();

    let abs_errors: Vec<f64> = actual
        .iter()
        .zip(&predicted)
        .map(|(a, p)| (a - p).abs())
        .collect();

    let demand_mean = mean(&demand);
    let demand_std = std_dev(&demand);
    let demand_cv = match (demand_mean, demand_std) {
        (Some(m), Some(s)) if m != 0.0 => Some(s / m),
        _ => None,
    };

    // Per-day demand, ordered by date
    let mut daily: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for r in window {
        let slot = daily.entry(r.date).or_insert((0.0, 0));
        slot.0 += r.units_sold;
        slot.1 += 1;
    }
    let daily_demand: Vec<f64> = daily.values().map(|(sum, n)| sum / f64::from(*n)).collect();

    GroupDiagnostics {
        sku: key.sku.clone(),
        channel: key.channel.clone(),
        wape_28d: wape(&actual, &predicted),
        mae_28d: mean(&abs_errors),
        demand_mean_28d: demand_mean,
        demand_cv_28d: demand_cv,
        regime_z: regime_z(&daily_demand, demand_std),
        history_days: daily.len() as u32,
    }
}

/// Compares the mean of the latest 7 days with the 7 days before, scaled by
/// the window's demand standard deviation.
///
/// Needs 14 distinct days and a positive std. Dates are not checked for gaps.
fn regime_z(daily_demand: &[f64], demand_std: Option<f64>) -> Option<f64> {
    let std = demand_std.filter(|s| *s > 0.0)?;
    if daily_demand.len() < 2 * REGIME_HALF_DAYS {
        return None;
    }
    let recent = &daily_demand[daily_demand.len() - 2 * REGIME_HALF_DAYS..];
    let (prior, latest) = recent.split_at(REGIME_HALF_DAYS);
    Some((mean(latest)? - mean(prior)?) / std)
}

/// Diagnostics for every group in the history, in key order.
///
/// Groups with no rows inside the window still get a row, with null metrics.
pub fn compute_diagnostics(history: &ForecastHistory, lookback_days: u32) -> Vec<GroupDiagnostics> {
    let start = history.window_start(lookback_days);
    let groups = history.partition();

    let mut out: Vec<GroupDiagnostics> = groups
        .par_iter()
        .map(|(key, rows)| {
            let window: Vec<&ForecastRecord> =
                rows.iter().copied().filter(|r| r.date >= start).collect();
            let diag = diagnose_group(key, &window);
            debug!(group = %key, history_days = diag.history_days, wape = ?diag.wape_28d, "diagnosed group");
            diag
        })
        .collect();
    out.sort_by(|a, b| (&a.sku, &a.channel).cmp(&(&b.sku, &b.channel)));

    info!(
        groups = out.len(),
        window_start = %start,
        today = %history.today(),
        "computed group diagnostics"
    );
    out
}
