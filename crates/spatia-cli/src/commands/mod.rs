//! CLI command implementations.

pub mod backends;
pub mod capabilities;
pub mod common;
pub mod process;
pub mod profiles;
