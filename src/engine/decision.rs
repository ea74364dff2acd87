// src/engine/decision.rs

use crate::model::history::ForecastHistory;
use crate::model::records::{
    Confidence, Decision, ForecastRecord, GroupDiagnostics, GroupKey, ReplenishmentPlan,
};
use crate::strategy::classifier::ConfidenceClassifier;
use crate::strategy::stock::buffered_quantity;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::info;

/// The decision table for one run's "today".
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionReport {
    pub today: NaiveDate,
    pub rows: Vec<Decision>,
}

impl DecisionReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn low_confidence_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|d| d.confidence == Confidence::Low)
            .count()
    }

    pub fn needing_reorder_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|d| d.reorder_qty.is_some_and(|q| q > 0))
            .count()
    }
}

/// Merges one snapshot row with its (optional) diagnostics and plan.
pub fn decide_group(
    today: &ForecastRecord,
    diagnostics: Option<&GroupDiagnostics>,
    plan: Option<&ReplenishmentPlan>,
    classifier: &ConfidenceClassifier,
) -> Decision {
    let classification = match diagnostics {
        Some(d) => classifier.classify(d),
        None => classifier.classify(&GroupDiagnostics::empty(&today.key())),
    };

    let reorder_qty = plan.map(|p| p.reorder_qty);
    let reorder_qty_adjusted = reorder_qty.map(|q| buffered_quantity(q, classification.buffer_pct));

    Decision {
        date: today.date,
        sku: today.sku.clone(),
        channel: today.channel.clone(),
        prediction: today.prediction,
        units_sold: today.units_sold,
        confidence: classification.confidence,
        recommended_action: classification.recommended_action,
        buffer_pct: classification.buffer_pct,
        reasons: classification.reasons,

        wape_28d: diagnostics.and_then(|d| d.wape_28d),
        mae_28d: diagnostics.and_then(|d| d.mae_28d),
        demand_mean_28d: diagnostics.and_then(|d| d.demand_mean_28d),
        demand_cv_28d: diagnostics.and_then(|d| d.demand_cv_28d),
        regime_z: diagnostics.and_then(|d| d.regime_z),
        history_days: diagnostics.map(|d| d.history_days),

        inventory_on_hand: plan.map(|p| p.inventory_on_hand),
        lead_time_demand: plan.map(|p| p.lead_time_demand),
        safety_stock: plan.map(|p| p.safety_stock),
        reorder_qty,
        reorder_qty_adjusted,
    }
}

/// Builds the decision table: today's snapshot left-joined with diagnostics
/// and, when available, the replenishment plan.
pub fn build_report(
    history: &ForecastHistory,
    diagnostics: &[GroupDiagnostics],
    plans: Option<&[ReplenishmentPlan]>,
    classifier: &ConfidenceClassifier,
) -> DecisionReport {
    let diag_by_key: HashMap<GroupKey, &GroupDiagnostics> =
        diagnostics.iter().map(|d| (d.key(), d)).collect();
    let plan_by_key: HashMap<GroupKey, &ReplenishmentPlan> = plans
        .unwrap_or_default()
        .iter()
        .map(|p| (p.key(), p))
        .collect();

    let mut rows: Vec<Decision> = history
        .snapshot()
        .par_iter()
        .map(|row| {
            let key = row.key();
            decide_group(
                row,
                diag_by_key.get(&key).copied(),
                plan_by_key.get(&key).copied(),
                classifier,
            )
        })
        .collect();
    sort_decisions(&mut rows);

    let report = DecisionReport {
        today: history.today(),
        rows,
    };
    info!(
        rows = report.len(),
        low_confidence = report.low_confidence_count(),
        with_plan = plans.is_some(),
        "built decision report"
    );
    report
}

/// Highest adjusted reorder first, rows without one last; ties by (sku, channel).
pub fn sort_decisions(rows: &mut [Decision]) {
    rows.sort_by(|a, b| {
        let by_qty = match (a.reorder_qty_adjusted, b.reorder_qty_adjusted) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_qty.then_with(|| (&a.sku, &a.channel).cmp(&(&b.sku, &b.channel)))
    });
}
