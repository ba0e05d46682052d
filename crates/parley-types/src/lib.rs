//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the Parley relay:
//! session records, gateway turns, configuration, and their associated
//! error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
