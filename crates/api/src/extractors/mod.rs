//! Request extractors for the API layer.

pub mod auth;

pub use auth::AuthUser;
