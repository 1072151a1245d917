//! HTTP handlers

mod auth;
mod business;
mod health;
mod reporting;
mod review;
mod verification;

pub use auth::*;
pub use business::*;
pub use health::*;
pub use reporting::*;
pub use review::*;
pub use verification::*;
