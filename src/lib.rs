//! Replenishment decision engine.
//!
//! Turns a per-SKU/channel demand forecast into a ranked, explainable
//! reorder decision: rolling reliability diagnostics, a lead-time/safety-stock
//! reorder quantity, a rule-based confidence tier with reasons, and a merged
//! decision report.

pub mod cli;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod strategy;

pub use engine::config::{ConfidencePolicy, EngineConfig, ReplenishmentConfig};
pub use engine::decision::DecisionReport;
pub use engine::DecisionEngine;
pub use error::{EngineError, EngineResult};
