//! Product/material junction - how much of a material one product unit consumes

use serde::{Deserialize, Serialize};

use crate::core::entity::{require_non_negative, require_text, Entity, ValidationError};

/// A (product, material) pair with the required quantity per product unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMaterial {
    pub product: String,
    pub material: String,
    pub qty_needed: f64,
}

impl ProductMaterial {
    pub fn new(product: impl Into<String>, material: impl Into<String>, qty_needed: f64) -> Self {
        Self {
            product: product.into(),
            material: material.into(),
            qty_needed,
        }
    }
}

impl Entity for ProductMaterial {
    const KIND: &'static str = "product material";

    fn key(&self) -> String {
        format!("{}/{}", self.product, self.material)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "product", &self.product)?;
        require_text(Self::KIND, "material", &self.material)?;
        require_non_negative("qty_needed", self.qty_needed)?;
        Ok(())
    }
}

/// One side of a junction lookup: the counterpart's name and the per-unit quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub name: String,
    pub qty_needed: f64,
}
