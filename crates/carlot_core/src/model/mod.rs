//! Domain model for car inventory records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every persisted record is identified by a storage-assigned `CarId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod car;
