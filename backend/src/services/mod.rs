//! Business logic services for the Authentify directory

pub mod auth;
pub mod business;
pub mod reporting;
pub mod review;
pub mod verification;

pub use auth::AuthService;
pub use business::BusinessService;
pub use reporting::ReportingService;
pub use review::ReviewService;
pub use verification::VerificationService;
