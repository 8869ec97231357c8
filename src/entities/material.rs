//! Material entity type - raw materials held in stock

use serde::{Deserialize, Serialize};

use crate::core::entity::{require_non_negative, require_text, Entity, ValidationError};

/// A raw material row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Unique material name (primary key)
    pub name: String,

    /// Material type name (references a [`MaterialType`](super::MaterialType))
    pub material_type: String,

    /// Price of one unit of measure
    pub unit_price: f64,

    /// Quantity currently on hand
    pub stock_qty: f64,

    /// Reorder threshold
    pub min_qty: f64,

    /// Units per package (unit-of-sale batch size)
    pub pack_qty: f64,

    /// Unit of measure (e.g., "m", "kg", "pcs")
    pub unit: String,
}

impl Material {
    /// Create a new material with zeroed quantities
    pub fn new(name: impl Into<String>, material_type: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material_type: material_type.into(),
            unit_price: 0.0,
            stock_qty: 0.0,
            min_qty: 0.0,
            pack_qty: 0.0,
            unit: unit.into(),
        }
    }

    /// True when stock has fallen below the reorder threshold
    pub fn below_minimum(&self) -> bool {
        self.stock_qty < self.min_qty
    }

    /// Number of whole packages needed to cover `qty` units
    pub fn packages_for(&self, qty: f64) -> Option<u64> {
        if self.pack_qty <= 0.0 || qty <= 0.0 {
            return None;
        }
        Some((qty / self.pack_qty).ceil() as u64)
    }
}

impl Entity for Material {
    const KIND: &'static str = "material";

    fn key(&self) -> String {
        self.name.clone()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "name", &self.name)?;
        require_text(Self::KIND, "material_type", &self.material_type)?;
        require_text(Self::KIND, "unit", &self.unit)?;
        require_non_negative("unit_price", self.unit_price)?;
        require_non_negative("stock_qty", self.stock_qty)?;
        require_non_negative("min_qty", self.min_qty)?;
        require_non_negative("pack_qty", self.pack_qty)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Material {
        Material {
            name: "Oak veneer".to_string(),
            material_type: "Wood".to_string(),
            unit_price: 120.0,
            stock_qty: 40.0,
            min_qty: 50.0,
            pack_qty: 25.0,
            unit: "m2".to_string(),
        }
    }

    #[test]
    fn test_material_validates() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_material_rejects_missing_unit() {
        let mut mat = sample();
        mat.unit = String::new();
        assert_eq!(
            mat.validate(),
            Err(ValidationError::MissingField {
                kind: "material",
                field: "unit"
            })
        );
    }

    #[test]
    fn test_material_rejects_negative_stock() {
        let mut mat = sample();
        mat.stock_qty = -0.5;
        assert!(matches!(
            mat.validate(),
            Err(ValidationError::Negative { field: "stock_qty", .. })
        ));
    }

    #[test]
    fn test_below_minimum_and_packages() {
        let mat = sample();
        assert!(mat.below_minimum());
        assert_eq!(mat.packages_for(60.0), Some(3));
        assert_eq!(mat.packages_for(0.0), None);
    }

    #[test]
    fn test_material_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["material_type"], "Wood");
        assert_eq!(json["pack_qty"], 25.0);
    }
}
