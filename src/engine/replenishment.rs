// src/engine/replenishment.rs

use crate::engine::config::ReplenishmentConfig;
use crate::io::inventory::InventoryFeed;
use crate::model::history::ForecastHistory;
use crate::model::records::{ForecastRecord, ReplenishmentPlan};
use crate::strategy::stock::{lead_time_demand, order_quantity, safety_stock};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Plans one group from today's forecast row and its on-hand inventory.
///
/// Today's absolute error stands in for daily demand volatility.
pub fn plan_group(
    today: &ForecastRecord,
    inventory_on_hand: u32,
    config: &ReplenishmentConfig,
) -> ReplenishmentPlan {
    let ltd = lead_time_demand(today.prediction, config.lead_time_days);
    let ss = safety_stock(config.service_level_z, today.abs_error, config.lead_time_days);
    let target_stock = ltd + ss;
    let reorder_qty = order_quantity(target_stock, inventory_on_hand, config.min_order_qty);

    ReplenishmentPlan {
        sku: today.sku.clone(),
        channel: today.channel.clone(),
        inventory_on_hand,
        lead_time_demand: ltd,
        safety_stock: ss,
        reorder_qty,
    }
}

/// Plans every group in today's snapshot that has an inventory figure.
///
/// Output is sorted by `reorder_qty` descending, then by group key.
pub fn compute_replenishment(
    history: &ForecastHistory,
    inventory: &InventoryFeed,
    config: &ReplenishmentConfig,
) -> Vec<ReplenishmentPlan> {
    let snapshot = history.snapshot();

    let mut plans: Vec<ReplenishmentPlan> = snapshot
        .par_iter()
        .filter_map(|row| {
            let key = row.key();
            let Some(on_hand) = inventory.on_hand(&key) else {
                warn!(group = %key, "no inventory figure, skipping replenishment");
                return None;
            };
            let plan = plan_group(row, on_hand, config);
            debug!(group = %key, on_hand, reorder_qty = plan.reorder_qty, "planned group");
            Some(plan)
        })
        .collect();
    sort_plans(&mut plans);

    let needing = plans.iter().filter(|p| p.reorder_qty > 0).count();
    info!(
        groups = plans.len(),
        needing_reorder = needing,
        lead_time_days = config.lead_time_days,
        "computed replenishment plan"
    );
    plans
}

/// Highest reorder first; ties by (sku, channel).
pub fn sort_plans(plans: &mut [ReplenishmentPlan]) {
    plans.sort_by(|a, b| {
        b.reorder_qty
            .cmp(&a.reorder_qty)
            .then_with(|| (&a.sku, &a.channel).cmp(&(&b.sku, &b.channel)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::history::tests::record;
    use crate::model::records::GroupKey;

    fn today_row(prediction: f64, abs_error: f64) -> ForecastRecord {
        let mut row = record(0, "FB_LATTE_VAN", "retail", 10.0);
        row.prediction = prediction;
        row.abs_error = abs_error;
        row
    }

    #[test]
    fn textbook_plan() {
        let config = ReplenishmentConfig {
            lead_time_days: 7,
            service_level_z: 1.65,
            min_order_qty: 0,
        };
        let plan = plan_group(&today_row(10.0, 2.0), 50, &config);
        assert!((plan.lead_time_demand - 70.0).abs() < 1e-9);
        assert!((plan.safety_stock - 8.73).abs() < 0.01);
        assert_eq!(plan.reorder_qty, 29);
        assert_eq!(plan.inventory_on_hand, 50);
    }

    #[test]
    fn small_need_is_dropped_by_min_order() {
        let plan = plan_group(&today_row(10.0, 2.0), 50, &ReplenishmentConfig::default());
        assert_eq!(plan.reorder_qty, 0);
    }

    #[test]
    fn overstock_orders_nothing() {
        let config = ReplenishmentConfig {
            min_order_qty: 0,
            ..ReplenishmentConfig::default()
        };
        let plan = plan_group(&today_row(10.0, 0.0), 500, &config);
        assert_eq!(plan.reorder_qty, 0);
        // volatility floor still applies
        assert!((plan.safety_stock - 1.65 * 7f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn plans_only_groups_with_inventory() {
        let mut big = record(3, "A", "retail", 30.0);
        big.prediction = 30.0;
        let mut small = record(3, "B", "retail", 12.0);
        small.prediction = 12.0;
        let mut stale = record(1, "C", "retail", 99.0);
        stale.prediction = 99.0;
        let unknown = record(3, "D", "retail", 5.0);
        let history = ForecastHistory::new(vec![small, big, stale, unknown]).unwrap();

        let inventory = InventoryFeed::from_pairs([
            (GroupKey::new("A", "retail"), 10),
            (GroupKey::new("B", "retail"), 10),
            (GroupKey::new("C", "retail"), 0),
        ]);
        let config = ReplenishmentConfig {
            min_order_qty: 0,
            ..ReplenishmentConfig::default()
        };

        let plans = compute_replenishment(&history, &inventory, &config);
        let skus: Vec<&str> = plans.iter().map(|p| p.sku.as_str()).collect();
        // C has no row today, D has no inventory
        assert_eq!(skus, vec!["A", "B"]);
        assert!(plans[0].reorder_qty > plans[1].reorder_qty);
    }
}
