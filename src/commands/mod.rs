//! CLI command implementations

pub mod export;
pub mod import;
pub mod seed;
pub mod serve;
pub mod stats;
