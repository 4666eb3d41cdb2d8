//! Business logic services.

pub mod catalog;

pub use catalog::{CatalogError, CatalogService};
