use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use kardex_core::{DomainError, DomainResult, MovementId};

/// Movement variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    PurchaseOrder,
    Transfer,
}

impl MovementKind {
    /// The statuses this variant can be in.
    pub fn statuses(self) -> [MovementStatus; 3] {
        match self {
            MovementKind::PurchaseOrder => [
                MovementStatus::Pending,
                MovementStatus::Received,
                MovementStatus::Cancelled,
            ],
            MovementKind::Transfer => [
                MovementStatus::Pending,
                MovementStatus::Completed,
                MovementStatus::Cancelled,
            ],
        }
    }

    /// Transition table. Everything not listed here is illegal, including
    /// any move out of a terminal status.
    pub fn allows(self, from: MovementStatus, to: MovementStatus) -> bool {
        use MovementStatus::*;

        match (self, from, to) {
            (MovementKind::PurchaseOrder, Pending, Received) => true,
            (MovementKind::PurchaseOrder, Pending, Cancelled) => true,
            (MovementKind::Transfer, Pending, Completed) => true,
            (MovementKind::Transfer, Pending, Cancelled) => true,
            _ => false,
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MovementKind::PurchaseOrder => write!(f, "purchase_order"),
            MovementKind::Transfer => write!(f, "transfer"),
        }
    }
}

/// Movement status lifecycle.
///
/// `Received` belongs to purchase orders, `Completed` to transfers; the
/// per-variant table in [`MovementKind::allows`] is the single authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    Pending,
    Received,
    Completed,
    Cancelled,
}

impl MovementStatus {
    /// A terminal status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        !matches!(self, MovementStatus::Pending)
    }
}

impl core::fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MovementStatus::Pending => write!(f, "pending"),
            MovementStatus::Received => write!(f, "received"),
            MovementStatus::Completed => write!(f, "completed"),
            MovementStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Variant-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementDetail {
    PurchaseOrder {
        supplier: String,
        expected_date: NaiveDate,
        /// Set once at creation; the registry never touches it again.
        created_at: DateTime<Utc>,
    },
    Transfer {
        from_location: String,
        to_location: String,
        date: NaiveDate,
    },
}

impl MovementDetail {
    pub fn kind(&self) -> MovementKind {
        match self {
            MovementDetail::PurchaseOrder { .. } => MovementKind::PurchaseOrder,
            MovementDetail::Transfer { .. } => MovementKind::Transfer,
        }
    }
}

/// A purchase order or transfer record.
///
/// Plain data; the registry is the exclusive owner of the canonical copies
/// and all mutation goes through its commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub item_name: String,
    /// Kilograms, strictly positive.
    pub quantity: f64,
    pub status: MovementStatus,
    pub detail: MovementDetail,
}

impl Movement {
    pub fn kind(&self) -> MovementKind {
        self.detail.kind()
    }

    /// Validate the record, collecting every violated field.
    pub fn validate(&self) -> DomainResult<()> {
        let mut violations: Vec<String> = Vec::new();

        if self.item_name.trim().is_empty() {
            violations.push("item_name must not be empty".to_string());
        }
        if !(self.quantity > 0.0) {
            violations.push("quantity must be positive".to_string());
        }

        match &self.detail {
            MovementDetail::PurchaseOrder { supplier, .. } => {
                if supplier.trim().is_empty() {
                    violations.push("supplier must not be empty".to_string());
                }
            }
            MovementDetail::Transfer {
                from_location,
                to_location,
                ..
            } => {
                if from_location.trim().is_empty() {
                    violations.push("from_location must not be empty".to_string());
                }
                if to_location.trim().is_empty() {
                    violations.push("to_location must not be empty".to_string());
                }
                if !from_location.trim().is_empty() && from_location == to_location {
                    violations.push("from_location and to_location must differ".to_string());
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(violations.join("; ")))
        }
    }
}

/// Input for creating a movement; id, status and `created_at` are assigned
/// by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementDraft {
    PurchaseOrder {
        item_name: String,
        quantity: f64,
        supplier: String,
        expected_date: NaiveDate,
    },
    Transfer {
        item_name: String,
        quantity: f64,
        from_location: String,
        to_location: String,
        date: NaiveDate,
    },
}

impl MovementDraft {
    pub fn kind(&self) -> MovementKind {
        match self {
            MovementDraft::PurchaseOrder { .. } => MovementKind::PurchaseOrder,
            MovementDraft::Transfer { .. } => MovementKind::Transfer,
        }
    }

    pub(crate) fn into_movement(self, id: MovementId, now: DateTime<Utc>) -> Movement {
        match self {
            MovementDraft::PurchaseOrder {
                item_name,
                quantity,
                supplier,
                expected_date,
            } => Movement {
                id,
                item_name,
                quantity,
                status: MovementStatus::Pending,
                detail: MovementDetail::PurchaseOrder {
                    supplier,
                    expected_date,
                    created_at: now,
                },
            },
            MovementDraft::Transfer {
                item_name,
                quantity,
                from_location,
                to_location,
                date,
            } => Movement {
                id,
                item_name,
                quantity,
                status: MovementStatus::Pending,
                detail: MovementDetail::Transfer {
                    from_location,
                    to_location,
                    date,
                },
            },
        }
    }
}

/// Partial update merged into an existing record.
///
/// `id`, `status` and `created_at` are never touched; fields that do not
/// apply to the record's variant are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementUpdate {
    pub item_name: Option<String>,
    pub quantity: Option<f64>,
    pub supplier: Option<String>,
    pub expected_date: Option<NaiveDate>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub date: Option<NaiveDate>,
}

impl MovementUpdate {
    pub(crate) fn apply_to(&self, m: &mut Movement) {
        if let Some(v) = &self.item_name {
            m.item_name = v.clone();
        }
        if let Some(v) = self.quantity {
            m.quantity = v;
        }

        match &mut m.detail {
            MovementDetail::PurchaseOrder {
                supplier,
                expected_date,
                ..
            } => {
                if let Some(v) = &self.supplier {
                    *supplier = v.clone();
                }
                if let Some(v) = self.expected_date {
                    *expected_date = v;
                }
            }
            MovementDetail::Transfer {
                from_location,
                to_location,
                date,
            } => {
                if let Some(v) = &self.from_location {
                    *from_location = v.clone();
                }
                if let Some(v) = &self.to_location {
                    *to_location = v.clone();
                }
                if let Some(v) = self.date {
                    *date = v;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_matches_the_lifecycle() {
        use MovementStatus::*;

        let po = MovementKind::PurchaseOrder;
        assert!(po.allows(Pending, Received));
        assert!(po.allows(Pending, Cancelled));
        assert!(!po.allows(Pending, Completed));
        assert!(!po.allows(Received, Pending));
        assert!(!po.allows(Received, Cancelled));

        let tr = MovementKind::Transfer;
        assert!(tr.allows(Pending, Completed));
        assert!(tr.allows(Pending, Cancelled));
        assert!(!tr.allows(Pending, Received));
        assert!(!tr.allows(Completed, Cancelled));
        assert!(!tr.allows(Cancelled, Pending));
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!MovementStatus::Pending.is_terminal());
        assert!(MovementStatus::Received.is_terminal());
        assert!(MovementStatus::Completed.is_terminal());
        assert!(MovementStatus::Cancelled.is_terminal());
    }

    #[test]
    fn validation_collects_every_violated_field() {
        let m = Movement {
            id: MovementId::new(),
            item_name: "  ".to_string(),
            quantity: 0.0,
            status: MovementStatus::Pending,
            detail: MovementDetail::Transfer {
                from_location: "Armazém A".to_string(),
                to_location: "Armazém A".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            },
        };

        let err = m.validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => {
                assert!(msg.contains("item_name"));
                assert!(msg.contains("quantity"));
                assert!(msg.contains("must differ"));
            }
            _ => panic!("expected validation error"),
        }
    }

    #[test]
    fn nan_quantity_is_rejected() {
        let m = Movement {
            id: MovementId::new(),
            item_name: "Alumínio Lingote".to_string(),
            quantity: f64::NAN,
            status: MovementStatus::Pending,
            detail: MovementDetail::PurchaseOrder {
                supplier: "Metalúrgica ABC".to_string(),
                expected_date: NaiveDate::from_ymd_opt(2024, 12, 15).unwrap(),
                created_at: Utc::now(),
            },
        };
        assert!(m.validate().is_err());
    }
}
