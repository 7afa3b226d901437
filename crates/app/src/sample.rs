//! Sample dataset: one fiscal stretch of the aluminium scrap ledger plus a
//! handful of in-flight movements. Used by the demo binary and by tests.

use chrono::NaiveDate;

use kardex_core::DomainResult;
use kardex_ledger::{PeriodFlows, StockSnapshot};
use kardex_movements::{MovementDraft, MovementStatus};

use crate::app::InventoryApp;

/// Monthly flow figures (purchases in, sales out), kilograms.
const MONTHS: [(&str, f64, f64); 8] = [
    ("Abril", 1206500.324, 906827.55),
    ("Maio", 1456230.50, 1124567.89),
    ("Junho", 987654.32, 1345678.90),
    ("Julho", 1678901.23, 1456234.56),
    ("Agosto", 1234567.89, 1123456.78),
    ("Setembro", 1567890.12, 1678901.23),
    ("Outubro", 1890123.45, 1789012.34),
    ("Novembro", 1345678.90, 1456234.56),
];

const OPENING_BALANCE: f64 = 256622.01;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid sample date")
}

/// Seed `app` with the sample ledger and movement logs.
pub fn seed(app: &mut InventoryApp) -> DomainResult<()> {
    // First month is appended in full; the rest close against the running
    // balance so the chain invariant derives every opening.
    let (first_period, purchases, sales) = MONTHS[0];
    let first = StockSnapshot {
        period: first_period.to_string(),
        opening_balance: OPENING_BALANCE,
        purchases_in: purchases,
        purchase_returns: 0.0,
        sales_out: sales,
        sale_returns: 0.0,
        closing_balance: OPENING_BALANCE + purchases - sales,
    };
    app.append_snapshot(first)?;

    for (period, purchases, sales) in MONTHS.into_iter().skip(1) {
        app.close_period(
            period,
            &PeriodFlows {
                purchases_in: purchases,
                sales_out: sales,
                ..PeriodFlows::default()
            },
        )?;
    }

    app.create_movement(MovementDraft::PurchaseOrder {
        item_name: "Alumínio Lingote".to_string(),
        quantity: 5000.0,
        supplier: "Metalúrgica ABC".to_string(),
        expected_date: date(2024, 12, 15),
    })?;
    app.create_movement(MovementDraft::PurchaseOrder {
        item_name: "Alumínio Liga 6063".to_string(),
        quantity: 3000.0,
        supplier: "Industrias XYZ".to_string(),
        expected_date: date(2024, 12, 20),
    })?;
    let po_received = app.create_movement(MovementDraft::PurchaseOrder {
        item_name: "Alumínio Reciclado".to_string(),
        quantity: 8000.0,
        supplier: "Reciclagem Verde".to_string(),
        expected_date: date(2024, 12, 10),
    })?;
    app.transition_movement(po_received.id, MovementStatus::Received)?;

    let t1 = app.create_movement(MovementDraft::Transfer {
        item_name: "Alumínio Lingote".to_string(),
        quantity: 2000.0,
        from_location: "Armazém A".to_string(),
        to_location: "Produção Linha 1".to_string(),
        date: date(2024, 12, 1),
    })?;
    app.transition_movement(t1.id, MovementStatus::Completed)?;
    let t2 = app.create_movement(MovementDraft::Transfer {
        item_name: "Alumínio Liga 6063".to_string(),
        quantity: 1500.0,
        from_location: "Armazém B".to_string(),
        to_location: "Produção Linha 2".to_string(),
        date: date(2024, 12, 5),
    })?;
    app.transition_movement(t2.id, MovementStatus::Completed)?;
    app.create_movement(MovementDraft::Transfer {
        item_name: "Alumínio Reciclado".to_string(),
        quantity: 3000.0,
        from_location: "Armazém A".to_string(),
        to_location: "Produção Linha 3".to_string(),
        date: date(2024, 12, 10),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kardex_movements::{MovementFilter, MovementKind};

    #[test]
    fn seeded_ledger_has_eight_chained_months() {
        let mut app = InventoryApp::new();
        seed(&mut app).unwrap();

        let snapshots = app.snapshots();
        assert_eq!(snapshots.len(), 8);
        for s in snapshots {
            assert!(s.balances());
        }
        for pair in snapshots.windows(2) {
            assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        }
    }

    #[test]
    fn seeded_registry_matches_the_fixture_statuses() {
        let mut app = InventoryApp::new();
        seed(&mut app).unwrap();

        let pos = app.list_movements(&MovementFilter::kind(MovementKind::PurchaseOrder));
        assert_eq!(pos.len(), 3);

        let counts = app.status_counts(MovementKind::Transfer);
        assert_eq!(counts[&MovementStatus::Completed], 2);
        assert_eq!(counts[&MovementStatus::Pending], 1);
    }
}
