//! Core business logic for Caja.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types and calculations live here.
//!
//! # Modules
//!
//! - `cash` - Cash-register movement types and reconciliation arithmetic

pub mod cash;
