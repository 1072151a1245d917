//! Domain models for the Authentify business directory

mod business;
mod report;
mod review;
mod trust;
mod user;
mod verification;

pub use business::*;
pub use report::*;
pub use review::*;
pub use trust::*;
pub use user::*;
pub use verification::*;

/// Unknown value for a string-backed enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
