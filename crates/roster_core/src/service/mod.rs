//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into command-level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod person_service;
