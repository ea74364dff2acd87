//! File-level tests: forecast CSV in, reorder plan and decision report out.

use replenishment_decision::io::forecast::read_forecast;
use replenishment_decision::io::inventory::InventoryFeed;
use replenishment_decision::io::reporting::{
    read_decision_report, read_reorder_plan, write_decision_report, write_reorder_plan,
};
use replenishment_decision::model::records::{Confidence, GroupKey};
use replenishment_decision::{DecisionEngine, EngineConfig, EngineError};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const REPORT_COLUMNS: [&str; 20] = [
    "date",
    "sku",
    "channel",
    "prediction",
    "units_sold",
    "confidence",
    "recommended_action",
    "buffer_pct",
    "reason",
    "wape_28d",
    "mae_28d",
    "demand_mean_28d",
    "demand_cv_28d",
    "regime_z",
    "history_days",
    "inventory_on_hand",
    "lead_time_demand",
    "safety_stock",
    "reorder_qty",
    "reorder_qty_adjusted",
];

/// Two stable groups with 40 days of history and one new group with 5.
fn write_forecast(path: &Path) {
    let mut csv = String::from(
        "date,sku,channel,units_sold,target_units_next_day,prediction,abs_error\n",
    );
    let start = chrono::NaiveDate::from_ymd_opt(2025, 11, 22).unwrap();
    for day in 0..40u64 {
        let date = start + chrono::Days::new(day);
        let wobble = (day % 3) as f64;
        writeln!(csv, "{date},FB_LATTE_VAN,retail,{},{},40.0,{wobble}", 40.0 + wobble, 40.0 + wobble)
            .unwrap();
        writeln!(csv, "{date},HM_MATCHA_CLASSIC,online,{},{},12.0,{wobble}", 12.0 + wobble, 12.0 + wobble)
            .unwrap();
        if day >= 35 {
            writeln!(csv, "{date},FB_FRAPPE_CHOC,retail,20,20,18.0,2.0").unwrap();
        }
    }
    fs::write(path, csv).unwrap();
}

fn header(path: &Path) -> Vec<String> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.headers().unwrap().iter().map(str::to_string).collect()
}

#[test]
fn decision_report_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let forecast_path = dir.path().join("forecast.csv");
    let plan_path = dir.path().join("reorder_plan.csv");
    let report_path = dir.path().join("out").join("decision_report.csv");
    write_forecast(&forecast_path);

    let mut config = EngineConfig::default();
    config.replenishment.min_order_qty = 0;
    let engine = DecisionEngine::new(config).unwrap();
    let history = read_forecast(&forecast_path).unwrap();

    let feed = InventoryFeed::from_pairs([
        (GroupKey::new("FB_LATTE_VAN", "retail"), 100),
        (GroupKey::new("HM_MATCHA_CLASSIC", "online"), 500),
        (GroupKey::new("FB_FRAPPE_CHOC", "retail"), 20),
    ]);
    let plans = engine.replenishment(&history, &feed);
    write_reorder_plan(&plan_path, &plans).unwrap();
    let reloaded_plans = read_reorder_plan(&plan_path).unwrap().unwrap();
    assert_eq!(reloaded_plans, plans);

    let report = engine.decide(&history, Some(reloaded_plans.as_slice()));
    write_decision_report(&report_path, &report.rows).unwrap();

    assert_eq!(header(&report_path), REPORT_COLUMNS);
    let reloaded = read_decision_report(&report_path).unwrap();
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded, report.rows);

    // latte: big reorder, stable; matcha: overstocked; frappe: new product
    assert_eq!(reloaded[0].sku, "FB_LATTE_VAN");
    assert_eq!(reloaded[0].confidence, Confidence::High);
    let frappe = reloaded.iter().find(|d| d.sku == "FB_FRAPPE_CHOC").unwrap();
    assert_eq!(frappe.confidence, Confidence::Low);
    assert!(frappe.reasons.contains("Not enough history (< 21 days)"));
    let matcha = reloaded.iter().find(|d| d.sku == "HM_MATCHA_CLASSIC").unwrap();
    assert_eq!(matcha.reorder_qty, Some(0));
    assert_eq!(matcha.reorder_qty_adjusted, Some(0));
}

#[test]
fn report_without_plan_keeps_columns_and_nulls() {
    let dir = tempfile::tempdir().unwrap();
    let forecast_path = dir.path().join("forecast.csv");
    let report_path = dir.path().join("decision_report.csv");
    write_forecast(&forecast_path);

    let engine = DecisionEngine::new(EngineConfig::default()).unwrap();
    let history = read_forecast(&forecast_path).unwrap();
    let plans = read_reorder_plan(&dir.path().join("reorder_plan.csv")).unwrap();
    assert!(plans.is_none());

    let report = engine.decide(&history, plans.as_deref());
    write_decision_report(&report_path, &report.rows).unwrap();

    assert_eq!(header(&report_path), REPORT_COLUMNS);
    let reloaded = read_decision_report(&report_path).unwrap();
    assert_eq!(reloaded.len(), 3);
    for row in &reloaded {
        assert_eq!(row.inventory_on_hand, None);
        assert_eq!(row.reorder_qty, None);
        assert_eq!(row.reorder_qty_adjusted, None);
    }
}

#[test]
fn missing_forecast_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_forecast(&dir.path().join("forecast.csv")).unwrap_err();
    assert!(matches!(err, EngineError::MissingForecast { .. }));
}
