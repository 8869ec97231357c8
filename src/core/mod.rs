//! Core module - storage, configuration and domain logic

pub mod calc;
pub mod config;
pub mod db;
pub mod entity;
pub mod project;

pub use calc::{
    calculate_material_quantity, calculate_material_quantity_or_sentinel,
    compute_required_quantity, BatchSpec, CalcError, RateLookup, FAILURE_SENTINEL,
};
pub use config::{Config, ConfigError};
pub use db::{Database, DbStatistics, StoreError, TableCount};
pub use entity::{Entity, ValidationError};
pub use project::{Project, ProjectError};
