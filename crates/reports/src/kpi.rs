use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use kardex_ledger::StockSnapshot;
use kardex_movements::{Movement, MovementKind, MovementStatus};

/// Direction of a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeClass {
    Positive,
    Negative,
    Neutral,
}

/// Period-over-period KPI change.
///
/// `percent` is `None` when the change is undefined (no previous period, or
/// a zero baseline); the class is Neutral in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiDelta {
    pub percent: Option<f64>,
    pub class: ChangeClass,
}

impl KpiDelta {
    pub fn neutral() -> Self {
        Self {
            percent: None,
            class: ChangeClass::Neutral,
        }
    }
}

/// Percent change from `previous` to `current`, rounded to one decimal.
///
/// A zero or absent baseline degrades to the neutral sentinel instead of
/// dividing by zero. Positive when current exceeds previous, Negative
/// otherwise.
pub fn kpi_delta(current: f64, previous: Option<f64>) -> KpiDelta {
    let Some(previous) = previous else {
        return KpiDelta::neutral();
    };
    if previous == 0.0 {
        return KpiDelta::neutral();
    }

    let percent = ((current - previous) / previous * 100.0 * 10.0).round() / 10.0;
    let class = if current > previous {
        ChangeClass::Positive
    } else {
        ChangeClass::Negative
    };

    KpiDelta {
        percent: Some(percent),
        class,
    }
}

/// Whether a snapshot's closing balance sits below the threshold (both in
/// kilograms).
pub fn low_stock(snapshot: &StockSnapshot, threshold_kg: f64) -> bool {
    snapshot.closing_balance < threshold_kg
}

/// Count of movements of `kind` per status.
///
/// Every status the variant owns appears in the map, zero included.
pub fn status_counts(
    movements: &[Movement],
    kind: MovementKind,
) -> BTreeMap<MovementStatus, usize> {
    let mut counts: BTreeMap<MovementStatus, usize> =
        kind.statuses().into_iter().map(|s| (s, 0)).collect();

    for m in movements.iter().filter(|m| m.kind() == kind) {
        *counts.entry(m.status).or_insert(0) += 1;
    }

    counts
}

/// Three-way movement breakdown for the distribution chart.
///
/// Values only; turning them into percentages is a presentation concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub purchases: f64,
    pub sales: f64,
    pub closing: f64,
}

pub fn distribution(total_purchases: f64, total_sales: f64, final_closing: f64) -> Distribution {
    Distribution {
        purchases: total_purchases,
        sales: total_sales,
        closing: final_closing,
    }
}
