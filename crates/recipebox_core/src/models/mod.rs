//! Data models for the recipe service and local persistence.

/// Recipe records, form input, and validation.
pub mod recipe;
