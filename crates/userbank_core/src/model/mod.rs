//! User account domain model.
//!
//! # Responsibility
//! - Define the record shared by repository and service layers.
//! - Keep validation next to the data it guards.

pub mod user;
