// src/strategy/rules.rs

use crate::engine::config::ConfidencePolicy;
use crate::model::records::GroupDiagnostics;
use crate::strategy::traits::ConfidenceRule;

/// The standard rule set, in evaluation order. Reason order follows this list.
pub fn default_rules() -> Vec<Box<dyn ConfidenceRule>> {
    vec![
        Box::new(InsufficientHistory),
        Box::new(HighRecentError),
        Box::new(HighVolatility),
        Box::new(RegimeChange),
    ]
}

/// Threshold as it appears in reason texts: always with a decimal part,
/// so `1.0` reads "1.0" rather than "1".
fn threshold(t: f64) -> String {
    if t.is_finite() && t.fract() == 0.0 {
        format!("{t:.1}")
    } else {
        t.to_string()
    }
}

// =========================================================================
// 1. Insufficient History
// =========================================================================

/// Too few distinct days in the window to judge the model.
#[derive(Debug, Clone, Copy)]
pub struct InsufficientHistory;

impl ConfidenceRule for InsufficientHistory {
    fn name(&self) -> &'static str {
        "insufficient_history"
    }

    fn evaluate(&self, d: &GroupDiagnostics, policy: &ConfidencePolicy) -> Option<String> {
        (d.history_days < policy.min_history_days)
            .then(|| format!("Not enough history (< {} days)", policy.min_history_days))
    }
}

// =========================================================================
// 2. High Recent Error
// =========================================================================

#[derive(Debug, Clone, Copy)]
pub struct HighRecentError;

impl ConfidenceRule for HighRecentError {
    fn name(&self) -> &'static str {
        "high_recent_error"
    }

    fn evaluate(&self, d: &GroupDiagnostics, policy: &ConfidencePolicy) -> Option<String> {
        let t = threshold(policy.high_wape_threshold);
        d.wape_28d
            .filter(|v| *v >= policy.high_wape_threshold)
            .map(|v| format!("High recent error (WAPE {v:.2} ≥ {t})"))
    }
}

// =========================================================================
// 3. High Volatility
// =========================================================================

/// Demand is too noisy relative to its level.
#[derive(Debug, Clone, Copy)]
pub struct HighVolatility;

impl ConfidenceRule for HighVolatility {
    fn name(&self) -> &'static str {
        "high_volatility"
    }

    fn evaluate(&self, d: &GroupDiagnostics, policy: &ConfidencePolicy) -> Option<String> {
        let t = threshold(policy.volatility_cv_threshold);
        d.demand_cv_28d
            .filter(|v| *v >= policy.volatility_cv_threshold)
            .map(|v| format!("High demand volatility (CV {v:.2} ≥ {t})"))
    }
}

// =========================================================================
// 4. Regime Change
// =========================================================================

/// Recent demand level jumped or dropped relative to the week before.
/// Fires on either direction.
#[derive(Debug, Clone, Copy)]
pub struct RegimeChange;

impl ConfidenceRule for RegimeChange {
    fn name(&self) -> &'static str {
        "regime_change"
    }

    fn evaluate(&self, d: &GroupDiagnostics, policy: &ConfidencePolicy) -> Option<String> {
        let t = threshold(policy.regime_change_z);
        d.regime_z
            .filter(|z| z.abs() >= policy.regime_change_z)
            .map(|z| format!("Possible regime change (z {z:.2} ≥ {t})"))
    }
}
