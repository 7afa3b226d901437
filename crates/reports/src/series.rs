use serde::{Deserialize, Serialize};

use kardex_ledger::{QuantityField, StockSnapshot};

/// One period's values for a chart, one entry per requested field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: String,
    pub values: Vec<f64>,
}

/// Chart-ready series over the given snapshots.
///
/// Periods come out in sequence order; nothing is resampled or
/// interpolated, so a period missing from the input is simply missing from
/// the output.
pub fn series_for(snapshots: &[StockSnapshot], fields: &[QuantityField]) -> Vec<SeriesPoint> {
    snapshots
        .iter()
        .map(|s| SeriesPoint {
            period: s.period.clone(),
            values: fields.iter().map(|f| f.of(s)).collect(),
        })
        .collect()
}
