//! Core types for Greenshelf.
//!
//! This module provides type-safe wrappers and pure domain logic for
//! catalog products.

pub mod category;
pub mod filter;
pub mod id;
pub mod product;

pub use category::{Categories, CategoryField};
pub use filter::ProductFilter;
pub use id::*;
pub use product::{NewProduct, Product, ProductInput, ProductPatch, ValidationError};
