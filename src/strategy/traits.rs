// src/strategy/traits.rs

use crate::engine::config::ConfidencePolicy;
use crate::model::records::GroupDiagnostics;
use std::fmt::Debug;

/// One predicate of the confidence rule set.
///
/// A rule looks at a single group's diagnostics and, if it fires, returns the
/// reason to show the planner. A rule whose metric is `None` must not fire:
/// a missing metric is "no evidence", not a violation.
///
/// `Send + Sync` so a classifier can be shared across rayon workers.
pub trait ConfidenceRule: Debug + Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns `Some(reason)` if the group should be treated as at risk.
    fn evaluate(&self, diagnostics: &GroupDiagnostics, policy: &ConfidencePolicy)
        -> Option<String>;
}
