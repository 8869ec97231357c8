//! Product type entity - categories of finished goods

use serde::{Deserialize, Serialize};

use crate::core::entity::{require_non_negative, require_text, Entity, ValidationError};

/// A product category carrying the coefficient used in requirement calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductType {
    /// Unique type name (primary key)
    pub name: String,

    /// Multiplier applied to a product's parameters
    pub coefficient: f64,
}

impl ProductType {
    pub fn new(name: impl Into<String>, coefficient: f64) -> Self {
        Self {
            name: name.into(),
            coefficient,
        }
    }
}

impl Entity for ProductType {
    const KIND: &'static str = "product type";

    fn key(&self) -> String {
        self.name.clone()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "name", &self.name)?;
        require_non_negative("coefficient", self.coefficient)?;
        Ok(())
    }
}
