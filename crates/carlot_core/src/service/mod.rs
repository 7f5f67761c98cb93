//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into handler-level APIs.
//! - Keep handler/presentation layers decoupled from storage details.

pub mod car_service;
