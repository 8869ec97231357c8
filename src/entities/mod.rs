//! Entity type definitions
//!
//! Inventory rows persisted by the gateway:
//!
//! **Stock:**
//! - [`Material`] - Raw materials with price, stock and reorder levels
//! - [`MaterialType`] - Material categories with a defect (waste) percentage
//!
//! **Catalog:**
//! - [`Product`] - Finished goods with SKU and pricing
//! - [`ProductType`] - Product categories with a requirement coefficient
//! - [`ProductMaterial`] - Junction rows: material consumed per product unit
//!
//! **Sales:**
//! - [`Partner`] - Partner companies and their contacts

pub mod link;
pub mod material;
pub mod material_type;
pub mod partner;
pub mod product;
pub mod product_type;

pub use link::{ProductMaterial, Usage};
pub use material::Material;
pub use material_type::MaterialType;
pub use partner::Partner;
pub use product::Product;
pub use product_type::ProductType;
