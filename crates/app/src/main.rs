//! Demo binary: seeds the sample dataset and prints the dashboard figures.

use anyhow::Result;

use kardex_app::{InventoryApp, sample};
use kardex_ledger::QuantityField;
use kardex_movements::MovementKind;

fn main() -> Result<()> {
    kardex_observability::init();

    let mut app = InventoryApp::new();
    sample::seed(&mut app)?;

    let latest = app.latest_snapshot()?;
    println!("== Estoque ==");
    println!("current stock       {:>14.3} KG", latest.closing_balance);
    let delta = app.kpi(QuantityField::ClosingBalance);
    if let Some(percent) = delta.percent {
        println!("vs previous month   {percent:>+13.1}%");
    }
    println!(
        "total purchases     {:>14.3} KG",
        app.total_over(.., QuantityField::PurchasesIn)
    );
    println!(
        "total sales         {:>14.3} KG",
        app.total_over(.., QuantityField::SalesOut)
    );

    println!("\n== Monthly detail ==");
    for point in app.series_for(&[
        QuantityField::OpeningBalance,
        QuantityField::PurchasesIn,
        QuantityField::SalesOut,
        QuantityField::ClosingBalance,
    ]) {
        let low = if app.low_stock_flag(&point.period)? {
            "  LOW"
        } else {
            ""
        };
        println!(
            "{:<10} {:>13.3} {:>13.3} {:>13.3} {:>13.3}{low}",
            point.period, point.values[0], point.values[1], point.values[2], point.values[3]
        );
    }

    for kind in [MovementKind::PurchaseOrder, MovementKind::Transfer] {
        println!("\n== {kind} ==");
        for (status, count) in app.status_counts(kind) {
            println!("{status:<10} {count}");
        }
    }

    let dist = app.distribution()?;
    println!("\n== Distribution (KG) ==");
    println!("purchases  {:>14.3}", dist.purchases);
    println!("sales      {:>14.3}", dist.sales);
    println!("closing    {:>14.3}", dist.closing);

    Ok(())
}
