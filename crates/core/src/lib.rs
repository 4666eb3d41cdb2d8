//! Greenshelf Core - Domain types for the sustainable product catalog.
//!
//! This crate provides the types shared by all Greenshelf components:
//! - `catalog` - REST API and browser pages
//! - `cli` - Command-line tools for migrations, seeding and ad-hoc queries
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. Store implementations live in the catalog crate and are
//! expected to agree with the in-memory semantics defined here.
//!
//! # Modules
//!
//! - [`types`] - Product records, write validation, filter predicates and
//!   category aggregation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
