// src/cli.rs

use crate::error::{EngineError, EngineResult};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "replenishment-decision", version)]
#[command(about = "Turns a demand forecast into a ranked, explainable reorder decision report")]
pub struct Cli {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Defaults to `run` without an inventory source
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Table locations and engine settings shared by every command.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PathArgs {
    /// Forecast table produced by the forecasting step
    #[arg(long, global = true, default_value = "data/processed/forecast.csv")]
    pub forecast: PathBuf,

    /// Reorder plan table (written by run/reorder, read by decide)
    #[arg(long, global = true, default_value = "data/processed/reorder_plan.csv")]
    pub reorder_plan: PathBuf,

    /// Decision report table
    #[arg(long, global = true, default_value = "data/processed/decision_report.csv")]
    pub report: PathBuf,

    /// JSON engine config (thresholds, buffers, lead time)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SKUs to list in the accuracy overview
    #[arg(long, global = true, default_value_t = 10)]
    pub top: usize,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compute the reorder plan (if an inventory source is given) and the decision report
    Run(InventoryArgs),
    /// Compute and save the reorder plan only
    Reorder(InventoryArgs),
    /// Build the decision report, merging a saved reorder plan if one exists
    Decide,
}

/// Where on-hand inventory comes from. At most one source per run.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
#[group(id = "inventory_source", multiple = false)]
pub struct InventoryArgs {
    /// On-hand inventory feed (sku,channel,inventory_on_hand)
    #[arg(long)]
    pub inventory: Option<PathBuf>,

    /// Use seeded placeholder inventory instead of a feed
    #[arg(long, action = ArgAction::SetTrue)]
    pub placeholder_inventory: bool,
}

impl InventoryArgs {
    pub fn source(&self) -> Option<InventorySource> {
        match (&self.inventory, self.placeholder_inventory) {
            (Some(path), _) => Some(InventorySource::Feed(path.clone())),
            (None, true) => Some(InventorySource::Placeholder),
            (None, false) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventorySource {
    Feed(PathBuf),
    Placeholder,
}

impl Cli {
    /// Inventory source for the reorder step, if this invocation plans one.
    ///
    /// `reorder` without a source is a usage error.
    pub fn inventory_source(&self) -> EngineResult<Option<InventorySource>> {
        match &self.command {
            None | Some(Command::Decide) => Ok(None),
            Some(Command::Run(inventory)) => Ok(inventory.source()),
            Some(Command::Reorder(inventory)) => inventory.source().map(Some).ok_or_else(|| {
                EngineError::usage("reorder needs --inventory PATH or --placeholder-inventory")
            }),
        }
    }

    /// Everything but `reorder` ends with a decision report.
    pub fn writes_report(&self) -> bool {
        !matches!(self.command, Some(Command::Reorder(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("replenishment-decision").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_run_without_inventory() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.paths.forecast, PathBuf::from("data/processed/forecast.csv"));
        assert_eq!(cli.paths.top, 10);
        assert_eq!(cli.inventory_source().unwrap(), None);
        assert!(cli.writes_report());
    }

    #[test]
    fn parses_command_and_flags() {
        let cli = parse(&[
            "reorder",
            "--forecast",
            "in/f.csv",
            "--inventory",
            "in/stock.csv",
            "--reorder-plan",
            "out/plan.csv",
            "--top",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.paths.forecast, PathBuf::from("in/f.csv"));
        assert_eq!(cli.paths.reorder_plan, PathBuf::from("out/plan.csv"));
        assert_eq!(cli.paths.top, 3);
        assert_eq!(
            cli.inventory_source().unwrap(),
            Some(InventorySource::Feed(PathBuf::from("in/stock.csv")))
        );
        assert!(!cli.writes_report());
    }

    #[test]
    fn reorder_requires_inventory_source() {
        let cli = parse(&["reorder"]).unwrap();
        assert!(matches!(cli.inventory_source(), Err(EngineError::Usage(_))));

        let cli = parse(&["reorder", "--placeholder-inventory"]).unwrap();
        assert_eq!(cli.inventory_source().unwrap(), Some(InventorySource::Placeholder));
    }

    #[test]
    fn decide_rejects_inventory_flags() {
        let err = parse(&["decide", "--inventory", "stock.csv"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        let err = parse(&["decide", "--placeholder-inventory"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn inventory_sources_are_exclusive() {
        let err = parse(&["run", "--placeholder-inventory", "--inventory", "x.csv"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["--forecast"]).is_err());
        assert_eq!(
            parse(&["--top", "many"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
    }
}
