use serde::{Deserialize, Serialize};

use kardex_core::{DomainError, DomainResult};

/// Tolerance for the balance equation (quantities are f64 kilograms).
pub const BALANCE_TOLERANCE: f64 = 1e-6;

/// One accounting period's stock record.
///
/// All quantities are non-negative kilograms. `closing_balance` is bound to
/// the other fields by the balance equation; `opening_balance` of every
/// snapshot after the first is bound to the previous snapshot's closing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    /// Period label, unique within the sequence (e.g. a month name).
    pub period: String,
    pub opening_balance: f64,
    pub purchases_in: f64,
    pub purchase_returns: f64,
    pub sales_out: f64,
    pub sale_returns: f64,
    pub closing_balance: f64,
}

impl StockSnapshot {
    /// The closing balance implied by the raw fields.
    pub fn expected_closing(&self) -> f64 {
        self.opening_balance + self.purchases_in - self.purchase_returns - self.sales_out
            + self.sale_returns
    }

    /// Whether the stored closing balance satisfies the balance equation.
    pub fn balances(&self) -> bool {
        (self.closing_balance - self.expected_closing()).abs() <= BALANCE_TOLERANCE
    }

    /// Reject negative quantities.
    pub(crate) fn check_fields(&self) -> DomainResult<()> {
        let mut bad: Vec<&str> = Vec::new();
        for field in QuantityField::ALL {
            if field.of(self) < 0.0 {
                bad.push(field.name());
            }
        }
        if bad.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "negative quantity in field(s): {}",
                bad.join(", ")
            )))
        }
    }
}

/// Named quantity field of a snapshot, for sums and chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityField {
    OpeningBalance,
    PurchasesIn,
    PurchaseReturns,
    SalesOut,
    SaleReturns,
    ClosingBalance,
}

impl QuantityField {
    pub const ALL: [QuantityField; 6] = [
        QuantityField::OpeningBalance,
        QuantityField::PurchasesIn,
        QuantityField::PurchaseReturns,
        QuantityField::SalesOut,
        QuantityField::SaleReturns,
        QuantityField::ClosingBalance,
    ];

    /// Read this field from a snapshot.
    pub fn of(&self, s: &StockSnapshot) -> f64 {
        match self {
            QuantityField::OpeningBalance => s.opening_balance,
            QuantityField::PurchasesIn => s.purchases_in,
            QuantityField::PurchaseReturns => s.purchase_returns,
            QuantityField::SalesOut => s.sales_out,
            QuantityField::SaleReturns => s.sale_returns,
            QuantityField::ClosingBalance => s.closing_balance,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QuantityField::OpeningBalance => "opening_balance",
            QuantityField::PurchasesIn => "purchases_in",
            QuantityField::PurchaseReturns => "purchase_returns",
            QuantityField::SalesOut => "sales_out",
            QuantityField::SaleReturns => "sale_returns",
            QuantityField::ClosingBalance => "closing_balance",
        }
    }
}

/// Edit to one snapshot's raw fields.
///
/// `closing_balance` is not editable; it is always rederived. Editing the
/// opening balance of a non-first snapshot breaks chain continuity with its
/// predecessor and is rejected by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEdit {
    pub opening_balance: Option<f64>,
    pub purchases_in: Option<f64>,
    pub purchase_returns: Option<f64>,
    pub sales_out: Option<f64>,
    pub sale_returns: Option<f64>,
}

impl SnapshotEdit {
    /// Merge this edit into `s`, leaving `closing_balance` stale (the store
    /// rederives it).
    pub(crate) fn apply_to(&self, s: &mut StockSnapshot) {
        if let Some(v) = self.opening_balance {
            s.opening_balance = v;
        }
        if let Some(v) = self.purchases_in {
            s.purchases_in = v;
        }
        if let Some(v) = self.purchase_returns {
            s.purchase_returns = v;
        }
        if let Some(v) = self.sales_out {
            s.sales_out = v;
        }
        if let Some(v) = self.sale_returns {
            s.sale_returns = v;
        }
    }
}

/// Flow quantities of one period, used by the period-close operation
/// (opening and closing balances are derived).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodFlows {
    pub purchases_in: f64,
    pub purchase_returns: f64,
    pub sales_out: f64,
    pub sale_returns: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(opening: f64, purchases: f64, sales: f64, closing: f64) -> StockSnapshot {
        StockSnapshot {
            period: "Abril".to_string(),
            opening_balance: opening,
            purchases_in: purchases,
            purchase_returns: 0.0,
            sales_out: sales,
            sale_returns: 0.0,
            closing_balance: closing,
        }
    }

    #[test]
    fn balance_equation_holds_for_derived_closing() {
        let s = snapshot(256622.01, 1206500.324, 906827.55, 256622.01 + 1206500.324 - 906827.55);
        assert!(s.balances());
        assert!((s.expected_closing() - 556294.784).abs() <= BALANCE_TOLERANCE);
    }

    #[test]
    fn balance_equation_detects_mismatch() {
        let s = snapshot(100.0, 50.0, 30.0, 121.0);
        assert!(!s.balances());
    }

    #[test]
    fn edit_leaves_unset_fields_alone() {
        let mut s = snapshot(100.0, 50.0, 30.0, 120.0);
        let edit = SnapshotEdit {
            sales_out: Some(40.0),
            ..SnapshotEdit::default()
        };
        edit.apply_to(&mut s);
        assert_eq!(s.sales_out, 40.0);
        assert_eq!(s.purchases_in, 50.0);
        assert_eq!(s.opening_balance, 100.0);
    }

    #[test]
    fn negative_quantity_names_the_field() {
        let mut s = snapshot(100.0, 50.0, 30.0, 120.0);
        s.purchase_returns = -1.0;
        let err = s.check_fields().unwrap_err();
        match err {
            kardex_core::DomainError::Validation(msg) => {
                assert!(msg.contains("purchase_returns"));
            }
            _ => panic!("expected validation error"),
        }
    }
}
