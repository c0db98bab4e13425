//! The closed taxonomy demands are raised against.
//!
//! Departments list their items; subcategories are keyed by item, so an item
//! stocked by two departments (e.g. Sutures) shares one subcategory list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::service::InventoryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Department → items it may request.
    #[serde(default)]
    pub departments: BTreeMap<String, Vec<String>>,
    /// Item → subcategories.
    #[serde(default)]
    pub subcategories: BTreeMap<String, Vec<String>>,
}

impl Default for Catalog {
    fn default() -> Self {
        let departments: &[(&str, &[&str])] = &[
            ("Emergency", &["Bandages", "IV Fluids", "Oxygen Cylinders", "First Aid Kit", "Sutures"]),
            ("Surgery", &["Surgical Gloves", "Scalpels", "Sutures", "Anesthetics", "Surgical Masks"]),
            ("Pediatrics", &["Infant Oxygen Masks", "Pediatric IV Sets", "Baby Scales", "Infant Warmers"]),
            ("Cardiology", &["ECG Electrodes", "Defibrillator Pads", "Cardiac Monitors", "Stents"]),
            ("Neurology", &["Lumbar Puncture Kits", "Reflex Hammers", "EEG Electrodes", "Nerve Conduction Gels"]),
        ];
        let subcategories: &[(&str, &[&str])] = &[
            ("Bandages", &["Adhesive", "Gauze", "Compression", "Elastic"]),
            ("IV Fluids", &["Normal Saline", "Dextrose", "Ringer's Lactate"]),
            ("Oxygen Cylinders", &["Portable", "Large", "Medium"]),
            ("First Aid Kit", &["Basic", "Advanced", "Trauma"]),
            ("Sutures", &["Absorbable", "Non-absorbable", "Surgical Silk"]),
            ("Surgical Gloves", &["Latex", "Nitrile", "Powder-free"]),
            ("Scalpels", &["Disposable", "Reusable", "Precision"]),
            ("Anesthetics", &["Local", "General", "Regional"]),
            ("Surgical Masks", &["Standard", "N95", "HEPA"]),
            ("Infant Oxygen Masks", &["Neonatal", "Infant", "Toddler"]),
            ("Pediatric IV Sets", &["Micro-drip", "Macro-drip", "Extension Sets"]),
            ("Baby Scales", &["Digital", "Mechanical", "Portable"]),
            ("Infant Warmers", &["Radiant", "Incubator", "Transport"]),
            ("ECG Electrodes", &["Adult", "Pediatric", "Disposable"]),
            ("Defibrillator Pads", &["Adult", "Pediatric", "Training"]),
            ("Cardiac Monitors", &["Portable", "Bedside", "Telemetry"]),
            ("Stents", &["Coronary", "Peripheral", "Drug-eluting"]),
            ("Lumbar Puncture Kits", &["Adult", "Pediatric", "Diagnostic"]),
            ("Reflex Hammers", &["Taylor", "Buck", "Babinski"]),
            ("EEG Electrodes", &["Cup", "Needle", "Adhesive"]),
            ("Nerve Conduction Gels", &["Conductive", "Hypoallergenic", "Sterile"]),
        ];

        fn owned(table: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
            table
                .iter()
                .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
                .collect()
        }

        Self {
            departments: owned(departments),
            subcategories: owned(subcategories),
        }
    }
}

impl Catalog {
    pub fn departments(&self) -> impl Iterator<Item = &str> {
        self.departments.keys().map(String::as_str)
    }

    /// Items a department may request. Empty for an unknown department.
    pub fn items(&self, department: &str) -> &[String] {
        self.departments.get(department).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Subcategories of an item. Empty for an unknown item.
    pub fn subcategories(&self, item: &str) -> &[String] {
        self.subcategories.get(item).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check that `department / item / subcategory` is a path in the taxonomy.
    pub fn validate(
        &self,
        department: &str,
        item: &str,
        subcategory: &str,
    ) -> Result<(), InventoryError> {
        let items = self.departments.get(department).ok_or_else(|| {
            InventoryError::Validation(format!("unknown department '{department}'"))
        })?;
        if !items.iter().any(|i| i == item) {
            return Err(InventoryError::Validation(format!(
                "department '{department}' does not stock '{item}'"
            )));
        }
        if !self.subcategories(item).iter().any(|s| s == subcategory) {
            return Err(InventoryError::Validation(format!(
                "'{subcategory}' is not a subcategory of '{item}'"
            )));
        }
        Ok(())
    }

    /// Reject a taxonomy in which some listed item has no subcategories,
    /// since no demand could ever be raised for it.
    pub fn check(&self) -> Result<(), InventoryError> {
        if self.departments.is_empty() {
            return Err(InventoryError::Validation("catalog has no departments".into()));
        }
        let mut missing: Vec<&str> = self
            .departments
            .values()
            .flatten()
            .filter(|item| self.subcategories(item).is_empty())
            .map(String::as_str)
            .collect();
        missing.sort_unstable();
        missing.dedup();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(InventoryError::Validation(format!(
                "catalog items without subcategories: {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_consistent() {
        let catalog = Catalog::default();
        catalog.check().unwrap();
        assert_eq!(catalog.departments().count(), 5);
        assert_eq!(catalog.items("Pediatrics").len(), 4);
        assert_eq!(catalog.subcategories("Sutures").len(), 3);
    }

    #[test]
    fn test_validate_paths() {
        let catalog = Catalog::default();
        catalog.validate("Emergency", "Sutures", "Absorbable").unwrap();
        catalog.validate("Surgery", "Sutures", "Absorbable").unwrap();

        let err = catalog.validate("Oncology", "Bandages", "Gauze").unwrap_err();
        assert!(err.to_string().contains("unknown department"));

        let err = catalog.validate("Neurology", "Bandages", "Gauze").unwrap_err();
        assert!(err.to_string().contains("does not stock"));

        let err = catalog.validate("Emergency", "Bandages", "N95").unwrap_err();
        assert!(err.to_string().contains("not a subcategory"));
    }

    #[test]
    fn test_unknown_lookups_are_empty() {
        let catalog = Catalog::default();
        assert!(catalog.items("Oncology").is_empty());
        assert!(catalog.subcategories("Teddy Bears").is_empty());
    }

    #[test]
    fn test_check_reports_items_without_subcategories() {
        let mut catalog = Catalog::default();
        catalog
            .departments
            .get_mut("Emergency")
            .unwrap()
            .push("Splints".into());
        let err = catalog.check().unwrap_err();
        assert!(err.to_string().contains("Splints"));

        let empty = Catalog {
            departments: BTreeMap::new(),
            subcategories: BTreeMap::new(),
        };
        assert!(empty.check().is_err());
    }
}
