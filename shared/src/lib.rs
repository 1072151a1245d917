//! Shared types and models for the Authentify business directory
//!
//! This crate contains types shared between the backend, the mobile client
//! (via WASM), and other components of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
