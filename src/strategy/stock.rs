// src/strategy/stock.rs

//! Order-up-to inventory math.
//!
//! Target Stock = expected demand over the lead time + safety stock, where
//! safety stock scales with the square root of the lead time (i.i.d. daily
//! demand assumption).

use tracing::warn;

/// Floor applied to the per-day volatility proxy, in units.
pub const MIN_DEMAND_STD: f64 = 1.0;

/// Expected demand over the lead time: `daily_forecast * lead_time_days`.
pub fn lead_time_demand(daily_forecast: f64, lead_time_days: u32) -> f64 {
    daily_forecast * f64::from(lead_time_days)
}

/// Safety stock: `z * max(daily_std, 1) * sqrt(lead_time_days)`.
///
/// The floor keeps safety stock positive when a single day's error
/// happened to be zero.
pub fn safety_stock(service_level_z: f64, daily_std: f64, lead_time_days: u32) -> f64 {
    let sigma = daily_std.max(MIN_DEMAND_STD);
    service_level_z * sigma * f64::from(lead_time_days).sqrt()
}

/// Units to order to lift `inventory_on_hand` up to `target_stock`.
///
/// Returns 0 when there is no unmet need or when the need is below
/// `min_order_qty`; otherwise the need rounded half away from zero.
pub fn order_quantity(target_stock: f64, inventory_on_hand: u32, min_order_qty: u32) -> u32 {
    let need = (target_stock - f64::from(inventory_on_hand)).max(0.0);
    if need < f64::from(min_order_qty) {
        0
    } else {
        to_quantity(need)
    }
}

/// Applies a confidence buffer to a reorder quantity: `round(qty * (1 + buffer))`.
pub fn buffered_quantity(reorder_qty: u32, buffer_pct: f64) -> u32 {
    let adjusted = f64::from(reorder_qty) * (1.0 + buffer_pct);
    if adjusted <= 0.0 {
        0
    } else {
        to_quantity(adjusted)
    }
}

/// Rounds a non-negative unit count, saturating at `u32::MAX`.
fn to_quantity(units: f64) -> u32 {
    let rounded = units.round();
    if rounded > f64::from(u32::MAX) {
        warn!(units, cap = u32::MAX, "order quantity exceeds u32 range, capping");
        u32::MAX
    } else {
        rounded as u32
    }
}
