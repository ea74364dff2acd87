use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use replenishment_decision::cli::{Cli, InventorySource, PathArgs};
use replenishment_decision::engine::accuracy::AccuracySummary;
use replenishment_decision::io::forecast::read_forecast;
use replenishment_decision::io::inventory::InventoryFeed;
use replenishment_decision::io::reporting;
use replenishment_decision::logging;
use replenishment_decision::model::history::ForecastHistory;
use replenishment_decision::model::records::ReplenishmentPlan;
use replenishment_decision::{DecisionEngine, EngineConfig, EngineResult};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse();
    let inventory = match cli.inventory_source() {
        Ok(source) => source,
        Err(e) => Cli::command()
            .error(ErrorKind::MissingRequiredArgument, e)
            .exit(),
    };

    match run(&cli, inventory.as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, inventory: Option<&InventorySource>) -> EngineResult<()> {
    let paths = &cli.paths;

    // 1. CONFIGURATION
    let config = match &paths.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let engine = DecisionEngine::new(config)?;

    // 2. FORECAST TABLE (required)
    let history = read_forecast(&paths.forecast)?;

    // 3. REPLENISHMENT
    let plans = match inventory {
        Some(source) => Some(plan_and_save(&engine, &history, source, paths)?),
        // No inventory source: fall back to a plan saved by an earlier run
        None => reporting::read_reorder_plan(&paths.reorder_plan)?,
    };

    if !cli.writes_report() {
        return Ok(());
    }

    // 4. DECISIONS
    let report = engine.decide(&history, plans.as_deref());
    reporting::write_decision_report(&paths.report, &report.rows)?;

    // 5. SUMMARY
    println!("\n=== Decision Report ({}) ===", report.today);
    println!("Saved to: {}", paths.report.display());
    println!("Rows: {}", report.len());
    println!("LOW confidence rows: {}", report.low_confidence_count());
    println!("Groups needing reorder: {}", report.needing_reorder_count());

    print_accuracy(&AccuracySummary::from_history(&history, paths.top));
    Ok(())
}

fn plan_and_save(
    engine: &DecisionEngine,
    history: &ForecastHistory,
    source: &InventorySource,
    paths: &PathArgs,
) -> EngineResult<Vec<ReplenishmentPlan>> {
    let feed = match source {
        InventorySource::Feed(path) => InventoryFeed::from_csv(path)?,
        InventorySource::Placeholder => {
            let keys: Vec<_> = history.snapshot().iter().map(|r| r.key()).collect();
            InventoryFeed::placeholder(&keys)
        }
    };

    let plans = engine.replenishment(history, &feed);
    reporting::write_reorder_plan(&paths.reorder_plan, &plans)?;

    println!("\n=== Reorder Plan ===");
    println!("Saved to: {}", paths.reorder_plan.display());
    println!(
        "SKUs needing reorder: {}",
        plans.iter().filter(|p| p.reorder_qty > 0).count()
    );
    Ok(plans)
}

fn print_accuracy(summary: &AccuracySummary) {
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"));

    println!("\n=== Forecast Accuracy ===");
    println!("Rows: {}", summary.rows);
    println!("MAE (avg abs error): {}", fmt(summary.mae));
    println!("WAPE: {}", fmt(summary.wape));
    if !summary.worst_skus.is_empty() {
        println!("Top SKUs by total absolute error:");
        for (sku, err) in &summary.worst_skus {
            println!("  {sku}: {err:.2}");
        }
    }
}
