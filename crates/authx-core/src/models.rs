//! Domain models for AuthX.
//!
//! These are the core types shared across all crates.

pub mod account;
pub mod reset_token;
pub mod tenant;
pub mod tenant_config;
pub mod user;
