mod db;
mod migrations;

pub use db::{Database, ExportSource};
pub use migrations::{Migration, MIGRATIONS};
