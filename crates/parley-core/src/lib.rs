//! Business logic and port trait definitions for Parley.
//!
//! This crate defines the "ports" (the session store and completion
//! gateway traits) that the infrastructure layer implements, plus the
//! session service that orchestrates them. It depends only on
//! `parley-types` -- never on `parley-infra` or any database/IO crate.

pub mod gateway;
pub mod session;
