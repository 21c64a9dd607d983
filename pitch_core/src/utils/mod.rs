//! Shared helpers.

pub mod names;
