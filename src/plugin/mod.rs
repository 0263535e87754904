//! Host-side adapters around the watermark engine.
//!
//! A build pipeline integrates through three narrow interfaces instead of
//! framework callbacks:
//!
//! - [`schema::SchemaRegistry`] receives the options type definition
//! - [`records::RecordRegistry`] holds one record per discovered image
//! - [`batch::BatchRunner`] queries the registry and writes the outputs
//!
//! [`discovery`] turns file and directory inputs into source files for the
//! record registry.

pub mod batch;
pub mod discovery;
pub mod records;
pub mod schema;

pub use batch::{output_path, BatchReport, BatchRunner, FailedImage, ProcessedImage};
pub use discovery::{discover, DiscoveryOptions};
pub use records::{
    register_sources, InMemoryRegistry, RecordRegistry, SourceFile, WatermarkedImageRecord,
};
pub use schema::{register_schema, resolve_args, SchemaRegistry};

use thiserror::Error;

/// Errors that abort a whole batch.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Source discovery or the registry query failed
    #[error("Failed to discover images: {0}")]
    Discovery(String),
}
