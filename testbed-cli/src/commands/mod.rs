//! CLI command implementations

pub mod config;
pub mod export;
pub mod load;

pub use config::*;
pub use export::*;
pub use load::*;
