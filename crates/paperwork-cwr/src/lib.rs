//! Fixed-width work-registration export for paperwork.
//!
//! Turns a composition and its writer credits into a CWR-style
//! registration file: a header, a group header, one work registration, one
//! writer record per credit and a trailer, each a fixed-width line, joined
//! with CRLF.
//!
//! The pipeline is layered: [`encode`] coerces values into fixed-width
//! fields, [`record`] lays fields out per the [`layout`] table,
//! [`document`] assembles the records of one export, and [`service`] loads
//! the data from a catalog store.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod document;
pub mod encode;
pub mod error;
pub mod layout;
pub mod record;
pub mod service;

pub use config::{Config, SenderIdentity};
pub use document::{assemble_export, assemble_records, Export, LINE_TERMINATOR};
pub use error::{ExportError, ExportResult};
pub use layout::RecordKind;
pub use record::{build_record, ExportRecord, FieldValue};
pub use service::{CatalogSource, ExportService};
