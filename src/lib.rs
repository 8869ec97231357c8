//! minv: materials and products inventory
//!
//! Keeps raw materials, finished products and the materials each product
//! consumes in a per-project SQLite database, and computes how much raw
//! material a production batch still needs.

pub mod cli;
pub mod core;
pub mod entities;
