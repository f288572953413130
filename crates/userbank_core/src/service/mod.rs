//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into caller-facing APIs.
//! - Keep CLI and other front ends decoupled from storage details.

pub mod user_service;
