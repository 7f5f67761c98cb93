//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for car records.
//! - Isolate SQLite query details from service/handler orchestration.
//!
//! # Invariants
//! - Repository writes must validate the full record before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to storage errors.

pub mod car_repo;
