//! Raw-material requirement calculation
//!
//! Computes how much of a material must still be procured to make a
//! batch of products:
//!
//! ```text
//! base  = param1 * param2 * coefficient
//! total = base * product_qty * (1 + defect_percent / 100)
//! need  = max(0, total - stock), truncated toward zero
//! ```
//!
//! The coefficient comes from the product type and the defect percent
//! from the material type. Failures are typed ([`CalcError`]); callers
//! that still speak the old integer protocol can collapse any failure to
//! [`FAILURE_SENTINEL`].

use miette::Diagnostic;
use thiserror::Error;

use crate::core::db::{Database, StoreError};

/// Value reported in place of a quantity when the calculation fails
pub const FAILURE_SENTINEL: i64 = -1;

/// Why a requirement could not be computed
#[derive(Debug, Error, Diagnostic)]
pub enum CalcError {
    #[error("no coefficient for product type '{0}'")]
    #[diagnostic(
        code(minv::calc::coefficient_not_found),
        help("add it with `minv prod-type new`")
    )]
    CoefficientNotFound(String),

    #[error("no defect percent for material type '{0}'")]
    #[diagnostic(
        code(minv::calc::defect_percent_not_found),
        help("add it with `minv mat-type new`")
    )]
    DefectPercentNotFound(String),

    #[error("invalid input: {0}")]
    #[diagnostic(code(minv::calc::invalid_input))]
    InvalidInput(String),

    #[error("lookup failed")]
    #[diagnostic(code(minv::calc::lookup))]
    Lookup(#[from] StoreError),
}

/// Source of the two per-type rates the calculation needs
pub trait RateLookup {
    /// Coefficient of a product type, None if the type is unknown
    fn product_type_coefficient(&self, product_type: &str) -> Result<Option<f64>, StoreError>;

    /// Defect percent of a material type, None if the type is unknown
    fn material_defect_percent(&self, material_type: &str) -> Result<Option<f64>, StoreError>;
}

impl RateLookup for Database {
    fn product_type_coefficient(&self, product_type: &str) -> Result<Option<f64>, StoreError> {
        Database::product_type_coefficient(self, product_type)
    }

    fn material_defect_percent(&self, material_type: &str) -> Result<Option<f64>, StoreError> {
        Database::material_defect_percent(self, material_type)
    }
}

/// Inputs describing one production batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSpec {
    /// Number of product units to produce
    pub product_qty: u64,
    /// First physical parameter of the product (e.g., length)
    pub param1: f64,
    /// Second physical parameter of the product (e.g., width)
    pub param2: f64,
    /// Material already on hand
    pub stock_qty: f64,
}

fn check(name: &str, value: f64) -> Result<(), CalcError> {
    if !value.is_finite() {
        return Err(CalcError::InvalidInput(format!("{} is not a finite number", name)));
    }
    if value < 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "{} cannot be negative (got {})",
            name, value
        )));
    }
    Ok(())
}

/// Pure requirement formula
///
/// Every numeric input must be finite and non-negative.
pub fn compute_required_quantity(
    coefficient: f64,
    defect_percent: f64,
    product_qty: u64,
    param1: f64,
    param2: f64,
    stock_qty: f64,
) -> Result<u64, CalcError> {
    check("coefficient", coefficient)?;
    check("defect percent", defect_percent)?;
    check("param1", param1)?;
    check("param2", param2)?;
    check("stock", stock_qty)?;

    let base_qty = param1 * param2 * coefficient;
    let total_qty = base_qty * product_qty as f64 * (1.0 + defect_percent / 100.0);
    let final_qty = (total_qty - stock_qty).max(0.0);

    if !final_qty.is_finite() {
        return Err(CalcError::InvalidInput(
            "result does not fit in a finite quantity".to_string(),
        ));
    }

    // `as` saturates and truncates toward zero
    Ok(final_qty.trunc() as u64)
}

/// Resolve both rates, then apply [`compute_required_quantity`]
pub fn calculate_material_quantity<L: RateLookup + ?Sized>(
    lookup: &L,
    product_type: &str,
    material_type: &str,
    batch: &BatchSpec,
) -> Result<u64, CalcError> {
    let coefficient = lookup
        .product_type_coefficient(product_type)?
        .ok_or_else(|| CalcError::CoefficientNotFound(product_type.to_string()))?;

    let defect_percent = lookup
        .material_defect_percent(material_type)?
        .ok_or_else(|| CalcError::DefectPercentNotFound(material_type.to_string()))?;

    compute_required_quantity(
        coefficient,
        defect_percent,
        batch.product_qty,
        batch.param1,
        batch.param2,
        batch.stock_qty,
    )
}

/// Collapse a calculation result into the integer protocol (-1 on any failure)
pub fn to_sentinel(result: &Result<u64, CalcError>) -> i64 {
    match result {
        Ok(qty) => i64::try_from(*qty).unwrap_or(i64::MAX),
        Err(_) => FAILURE_SENTINEL,
    }
}

/// [`calculate_material_quantity`] with every failure reported as [`FAILURE_SENTINEL`]
pub fn calculate_material_quantity_or_sentinel<L: RateLookup + ?Sized>(
    lookup: &L,
    product_type: &str,
    material_type: &str,
    batch: &BatchSpec,
) -> i64 {
    to_sentinel(&calculate_material_quantity(
        lookup,
        product_type,
        material_type,
        batch,
    ))
}
