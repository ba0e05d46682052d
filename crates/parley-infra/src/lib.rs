//! Infrastructure layer for Parley.
//!
//! Contains implementations of the port traits defined in `parley-core`:
//! SQLite session storage, the OpenAI-compatible completion gateway
//! client, and the configuration loader.

pub mod config;
pub mod gateway;
pub mod sqlite;
