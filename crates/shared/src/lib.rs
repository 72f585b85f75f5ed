//! Shared types, errors, and configuration for Financial Helm.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types with HTTP status mapping
//! - Configuration management

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
