//! Material type entity - categories of raw material with a waste allowance

use serde::{Deserialize, Serialize};

use crate::core::entity::{require_finite, require_text, Entity, ValidationError};

/// A material category carrying its defect (waste) percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialType {
    /// Unique type name (primary key)
    pub name: String,

    /// Extra material, in percent, lost to production waste.
    /// Expected in 0..=100 but not enforced.
    pub defect_percent: f64,
}

impl MaterialType {
    pub fn new(name: impl Into<String>, defect_percent: f64) -> Self {
        Self {
            name: name.into(),
            defect_percent,
        }
    }
}

impl Entity for MaterialType {
    const KIND: &'static str = "material type";

    fn key(&self) -> String {
        self.name.clone()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "name", &self.name)?;
        require_finite("defect_percent", self.defect_percent)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defect_percent_range_is_unchecked() {
        assert!(MaterialType::new("Glue", 150.0).validate().is_ok());
        assert!(MaterialType::new("Glue", f64::NAN).validate().is_err());
        assert!(MaterialType::new("", 1.0).validate().is_err());
    }
}
