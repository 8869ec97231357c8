//! CLI command implementations

pub mod calc;
pub mod completions;
pub mod config;
pub mod init;
pub mod link;
pub mod mat;
pub mod mat_type;
pub mod partner;
pub mod prod;
pub mod prod_type;
pub mod status;
