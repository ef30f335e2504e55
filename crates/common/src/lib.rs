//! Common types for NFTOpt
//!
//! This crate provides the shared domain types used across the NFTOpt
//! crates.
//!
//! # Modules
//!
//! - [`types`] - Shared domain types (`Address`, `TokenId`, `OptionId`, `Wei`)

pub mod types;

pub use types::*;
