// src/engine/accuracy.rs

use crate::engine::diagnostics::wape;
use crate::model::history::ForecastHistory;
use std::collections::HashMap;

/// Headline forecast-quality figures across the whole forecast table.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracySummary {
    pub rows: usize,
    pub mae: Option<f64>,
    pub wape: Option<f64>,
    /// SKUs with the largest total absolute error, worst first.
    pub worst_skus: Vec<(String, f64)>,
}

impl AccuracySummary {
    pub fn from_history(history: &ForecastHistory, top_n: usize) -> Self {
        let records = history.records();
        let actual: Vec<f64> = records.iter().map(|r| r.target_units_next_day).collect();
        let predicted: Vec<f64> = records.iter().map(|r| r.prediction).collect();

        let mut total_error = 0.0;
        let mut by_sku: HashMap<&str, f64> = HashMap::new();
        for r in records {
            let err = (r.target_units_next_day - r.prediction).abs();
            total_error += err;
            *by_sku.entry(r.sku.as_str()).or_default() += err;
        }

        let mut worst_skus: Vec<(String, f64)> = by_sku
            .into_iter()
            .map(|(sku, err)| (sku.to_string(), err))
            .collect();
        worst_skus.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        worst_skus.truncate(top_n);

        Self {
            rows: records.len(),
            mae: (!records.is_empty()).then(|| total_error / records.len() as f64),
            wape: wape(&actual, &predicted),
            worst_skus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::history::tests::record;

    #[test]
    fn summarizes_errors_per_sku() {
        let mut rows = vec![
            record(0, "A", "retail", 10.0),
            record(0, "A", "online", 10.0),
            record(0, "B", "retail", 10.0),
            record(0, "C", "retail", 10.0),
        ];
        rows[0].prediction = 12.0;
        rows[1].prediction = 7.0;
        rows[2].prediction = 6.0;
        let history = ForecastHistory::new(rows).unwrap();

        let summary = AccuracySummary::from_history(&history, 2);
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.mae, Some(9.0 / 4.0));
        assert_eq!(summary.wape, Some(9.0 / 40.0));
        assert_eq!(
            summary.worst_skus,
            vec![("A".to_string(), 5.0), ("B".to_string(), 4.0)]
        );
    }
}
