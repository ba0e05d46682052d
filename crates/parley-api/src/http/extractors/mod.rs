//! Request extractors.

pub mod origin;
