//! Domain layer for the deskflow automation core.
//!
//! Pure business models, repository ports, and domain errors. No I/O.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
