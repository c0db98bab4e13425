use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::service::InventoryError;

// ---------------------------------------------------------------------------
// DemandStatus
// ---------------------------------------------------------------------------

/// Review state of a demand.
///
/// ```text
/// pending → approved
///         → rejected
/// ```
///
/// Both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandStatus {
    Pending,
    Approved,
    Rejected,
}

impl DemandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether the demand has been reviewed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for DemandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DemandStatus {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(InventoryError::Validation(format!(
                "unknown status '{other}', expected pending, approved or rejected"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Demand
// ---------------------------------------------------------------------------

/// A request for a supply item, raised by an incharge.
///
/// Everything except `status` is fixed at creation. `quantity` is the ceiling
/// for usage recorded against this demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demand {
    pub id: String,
    pub department: String,
    pub item: String,
    pub subcategory: String,
    pub quantity: u32,
    /// Date the item is needed, `YYYY-MM-DD`.
    pub date: String,
    /// Creation instant, epoch milliseconds.
    pub timestamp: i64,
    pub status: DemandStatus,
    #[serde(alias = "inchargeId")]
    pub owner_id: String,
}

impl Demand {
    /// Label copied into usage records, e.g. `"Gauze Bandages"`.
    pub fn item_label(&self) -> String {
        format!("{} {}", self.subcategory, self.item)
    }
}

// ---------------------------------------------------------------------------
// UsageRecord
// ---------------------------------------------------------------------------

/// Consumption of some quantity of a demand for one patient. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub id: String,
    pub demand_id: String,
    pub patient_id: String,
    /// Denormalized `Demand::item_label` at the time of recording.
    pub item_used: String,
    pub quantity: u32,
    pub timestamp: i64,
    #[serde(alias = "inchargeId")]
    pub owner_id: String,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Form fields for a new demand. Quantity is signed so that non-positive
/// input reaches validation instead of failing to parse.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDemand {
    pub department: String,
    pub item: String,
    pub subcategory: String,
    pub quantity: i64,
    pub date: String,
}

/// Form fields for a usage event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUsage {
    pub demand_id: String,
    pub patient_id: String,
    pub quantity: i64,
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Stock position of one demand, derived from both ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub demand_id: String,
    pub requested: u32,
    pub used: u64,
    pub remaining: u64,
}

impl StockLevel {
    pub(crate) fn new(demand: &Demand, used: u64) -> Self {
        Self {
            demand_id: demand.id.clone(),
            requested: demand.quantity,
            used,
            remaining: u64::from(demand.quantity).saturating_sub(used),
        }
    }
}

/// Administrator dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_demands: usize,
    pub pending_demands: usize,
    pub approved_demands: usize,
    pub rejected_demands: usize,
    pub total_usage_records: usize,
    pub total_units_used: u64,
    /// Demand count per department.
    pub by_department: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&DemandStatus::Approved).unwrap(),
            "\"approved\""
        );
        assert_eq!("Rejected".parse::<DemandStatus>().unwrap(), DemandStatus::Rejected);
        assert!(matches!(
            "done".parse::<DemandStatus>(),
            Err(InventoryError::Validation(_))
        ));
        assert!(!DemandStatus::Pending.is_terminal());
        assert!(DemandStatus::Approved.is_terminal());
    }

    #[test]
    fn test_demand_field_names() {
        let demand = Demand {
            id: "d1".into(),
            department: "Emergency".into(),
            item: "Bandages".into(),
            subcategory: "Gauze".into(),
            quantity: 10,
            date: "2024-05-01".into(),
            timestamp: 1_714_521_600_000,
            status: DemandStatus::Pending,
            owner_id: "2".into(),
        };
        let json = serde_json::to_value(&demand).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "date",
                "department",
                "id",
                "item",
                "ownerId",
                "quantity",
                "status",
                "subcategory",
                "timestamp"
            ]
        );
        assert_eq!(demand.item_label(), "Gauze Bandages");
    }

    #[test]
    fn test_legacy_incharge_id_is_accepted() {
        let json = r#"{
            "id": "u1", "demandId": "d1", "patientId": "P-7",
            "itemUsed": "Gauze Bandages", "quantity": 2,
            "timestamp": 1714521600000, "inchargeId": "2"
        }"#;
        let record: UsageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.owner_id, "2");

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["ownerId"], "2");
        assert!(out.get("inchargeId").is_none());
    }

    #[test]
    fn test_stock_level_clamps() {
        let demand: Demand = serde_json::from_value(serde_json::json!({
            "id": "d1", "department": "Surgery", "item": "Scalpels",
            "subcategory": "Disposable", "quantity": 3, "date": "2024-01-01",
            "timestamp": 0, "status": "approved", "ownerId": "2"
        }))
        .unwrap();
        let level = StockLevel::new(&demand, 5);
        assert_eq!(level.used, 5);
        assert_eq!(level.remaining, 0);
    }
}
