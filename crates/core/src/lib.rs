//! Core business logic for Financial Helm.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, calculations, and the weekly budget engine live here.
//!
//! # Modules
//!
//! - `budget` - Weekly budget limits, carryover, spending status, and alerts

pub mod budget;
