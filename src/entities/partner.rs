//! Partner entity type - companies the shop sells to

use serde::{Deserialize, Serialize};

use crate::core::entity::{require_text, Entity, ValidationError};

/// A partner company with contact details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    /// Surrogate key, assigned by the database on insert
    #[serde(default)]
    pub id: i64,

    pub company_name: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub email: String,
}

impl Partner {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            company_name: company_name.into(),
            phone: String::new(),
            email: String::new(),
        }
    }
}

impl Entity for Partner {
    const KIND: &'static str = "partner";

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "company_name", &self.company_name)?;
        Ok(())
    }
}
