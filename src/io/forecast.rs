// src/io/forecast.rs

use crate::error::{EngineError, EngineResult};
use crate::model::history::ForecastHistory;
use crate::model::records::ForecastRecord;
use std::path::Path;
use tracing::info;

/// Loads the forecast table produced by the forecasting step.
///
/// A missing file is fatal: nothing downstream can run without it.
pub fn read_forecast(path: &Path) -> EngineResult<ForecastHistory> {
    if !path.exists() {
        return Err(EngineError::MissingForecast {
            path: path.to_path_buf(),
        });
    }

    let mut rdr = csv::Reader::from_path(path)?;
    let records: Vec<ForecastRecord> = rdr.deserialize().collect::<Result<_, _>>()?;

    let history = ForecastHistory::new(records).ok_or_else(|| EngineError::EmptyForecast {
        path: path.to_path_buf(),
    })?;

    info!(
        rows = history.len(),
        today = %history.today(),
        path = %path.display(),
        "loaded forecast table"
    );
    Ok(history)
}
