// src/strategy/classifier.rs

use crate::engine::config::ConfidencePolicy;
use crate::model::records::{Confidence, GroupDiagnostics, Reasons, RecommendedAction};
use crate::strategy::rules::default_rules;
use crate::strategy::traits::ConfidenceRule;
use tracing::trace;

pub const LOW_CONFIDENCE_REASON: &str = "Use conservative buffer due to low confidence";
pub const HIGH_CONFIDENCE_REASON: &str = "Model appears stable on recent window";

/// Outcome of classifying one group.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub confidence: Confidence,
    pub recommended_action: RecommendedAction,
    pub buffer_pct: f64,
    pub reasons: Reasons,
}

/// Ordered rule engine mapping diagnostics to a confidence tier.
///
/// Pure: the same diagnostics always produce the same classification, with
/// reasons in rule order.
#[derive(Debug)]
pub struct ConfidenceClassifier {
    policy: ConfidencePolicy,
    rules: Vec<Box<dyn ConfidenceRule>>,
}

impl ConfidenceClassifier {
    pub fn new(policy: ConfidencePolicy) -> Self {
        Self::with_rules(policy, default_rules())
    }

    pub fn with_rules(policy: ConfidencePolicy, rules: Vec<Box<dyn ConfidenceRule>>) -> Self {
        Self { policy, rules }
    }

    pub fn policy(&self) -> &ConfidencePolicy {
        &self.policy
    }

    pub fn classify(&self, diagnostics: &GroupDiagnostics) -> Classification {
        let mut reasons = Reasons::new();
        let mut at_risk = false;

        for rule in &self.rules {
            if let Some(reason) = rule.evaluate(diagnostics, &self.policy) {
                trace!(rule = rule.name(), sku = %diagnostics.sku, channel = %diagnostics.channel, "rule fired");
                at_risk = true;
                reasons.push(reason);
            }
        }

        if at_risk {
            reasons.push(LOW_CONFIDENCE_REASON);
            Classification {
                confidence: Confidence::Low,
                recommended_action: RecommendedAction::OrderConservative,
                buffer_pct: self.policy.buffer_low_conf,
                reasons,
            }
        } else {
            reasons.push(HIGH_CONFIDENCE_REASON);
            Classification {
                confidence: Confidence::High,
                recommended_action: RecommendedAction::OrderBaseline,
                buffer_pct: self.policy.buffer_high_conf,
                reasons,
            }
        }
    }
}

impl Default for ConfidenceClassifier {
    fn default() -> Self {
        Self::new(ConfidencePolicy::default())
    }
}
