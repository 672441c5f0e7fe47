//! Shared types, errors, and configuration for Caja.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - JWT verification for the auth cookie
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::{AUTH_COOKIE, Claims};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
