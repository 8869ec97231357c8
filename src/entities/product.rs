//! Product entity type - finished goods made from materials

use serde::{Deserialize, Serialize};

use crate::core::entity::{require_non_negative, require_text, Entity, ValidationError};

/// A finished product row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product name (primary key)
    pub name: String,

    /// Product type name (references a [`ProductType`](super::ProductType))
    pub product_type: String,

    /// Article / stock keeping unit
    pub sku: String,

    /// Minimum selling price
    pub min_price: f64,

    /// Roll width for rolled goods
    pub roll_width: f64,

    /// Minimum price offered to partners, when negotiated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_partner_price: Option<f64>,
}

impl Product {
    pub fn new(name: impl Into<String>, product_type: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product_type: product_type.into(),
            sku: sku.into(),
            min_price: 0.0,
            roll_width: 0.0,
            min_partner_price: None,
        }
    }
}

impl Entity for Product {
    const KIND: &'static str = "product";

    fn key(&self) -> String {
        self.name.clone()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "name", &self.name)?;
        require_text(Self::KIND, "product_type", &self.product_type)?;
        require_text(Self::KIND, "sku", &self.sku)?;
        require_non_negative("min_price", self.min_price)?;
        require_non_negative("roll_width", self.roll_width)?;
        if let Some(price) = self.min_partner_price {
            require_non_negative("min_partner_price", price)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_requires_sku() {
        let prod = Product::new("Panel 2400", "Laminate", "");
        assert_eq!(
            prod.validate(),
            Err(ValidationError::MissingField {
                kind: "product",
                field: "sku"
            })
        );
    }

    #[test]
    fn test_product_rejects_negative_partner_price() {
        let mut prod = Product::new("Panel 2400", "Laminate", "PN-2400");
        assert!(prod.validate().is_ok());
        prod.min_partner_price = Some(-10.0);
        assert!(prod.validate().is_err());
    }

    #[test]
    fn test_partner_price_omitted_when_absent() {
        let prod = Product::new("Panel 2400", "Laminate", "PN-2400");
        let json = serde_json::to_string(&prod).unwrap();
        assert!(!json.contains("min_partner_price"));
    }
}
