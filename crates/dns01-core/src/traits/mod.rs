//! Core traits for the DNS-01 solver
//!
//! - [`ZoneApi`]: Talk to the DNS provider's REST API
//! - [`Solver`]: The present / clean-up / initialize contract the host calls

pub mod solver;
pub mod zone_api;

pub use solver::Solver;
pub use zone_api::ZoneApi;
