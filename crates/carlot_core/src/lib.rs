//! Core domain logic for the carlot inventory.
//! This crate is the single source of truth for car record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::car::{validate_car_fields, Car, CarId, CarValidationError, NewCar};
pub use repo::car_repo::{
    CarFilter, CarRepository, CarUpdate, RepoError, RepoResult, SqliteCarRepository,
};
pub use service::car_service::{
    sample_cars, CarService, FailureKind, HandlerFailure, DEFAULT_EXPENSIVE_MIN_PRICE,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
