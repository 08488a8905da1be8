//! Catalog model for paperwork.
//!
//! This crate defines the song/writer data model (Composition, Writer,
//! Profile), the SQLite schema that stores it, work-code normalization,
//! completeness checks, CSV catalog import and the audit log.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod audit;
pub mod completeness;
pub mod error;
pub mod ingest;
pub mod model;
pub mod schema;

pub use completeness::MissingItem;
pub use error::{Error, Result};
