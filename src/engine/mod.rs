// src/engine/mod.rs

pub mod accuracy;
pub mod config;
pub mod decision;
pub mod diagnostics;
pub mod replenishment;

use crate::engine::config::EngineConfig;
use crate::engine::decision::{build_report, DecisionReport};
use crate::engine::diagnostics::compute_diagnostics;
use crate::engine::replenishment::compute_replenishment;
use crate::error::EngineResult;
use crate::io::inventory::InventoryFeed;
use crate::model::history::ForecastHistory;
use crate::model::records::{GroupDiagnostics, ReplenishmentPlan};
use crate::strategy::classifier::ConfidenceClassifier;

/// Batch decision engine: one immutable config, one snapshot per run.
#[derive(Debug)]
pub struct DecisionEngine {
    config: EngineConfig,
    classifier: ConfidenceClassifier,
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let classifier = ConfidenceClassifier::new(config.policy.clone());
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn diagnostics(&self, history: &ForecastHistory) -> Vec<GroupDiagnostics> {
        compute_diagnostics(history, self.config.lookback_days)
    }

    pub fn replenishment(
        &self,
        history: &ForecastHistory,
        inventory: &InventoryFeed,
    ) -> Vec<ReplenishmentPlan> {
        compute_replenishment(history, inventory, &self.config.replenishment)
    }

    /// Diagnoses every group, classifies it and merges the optional plan.
    pub fn decide(
        &self,
        history: &ForecastHistory,
        plans: Option<&[ReplenishmentPlan]>,
    ) -> DecisionReport {
        let diagnostics = self.diagnostics(history);
        build_report(history, &diagnostics, plans, &self.classifier)
    }
}
