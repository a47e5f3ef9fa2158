//! AuthX Core: domain models, repository traits and the shared error
//! taxonomy for the multi-tenant authentication service.
//!
//! Nothing in this crate performs I/O. Storage lives behind the traits in
//! [`repository`]; the `authx-db` crate provides the SurrealDB
//! implementations.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{AuthxError, AuthxResult};
