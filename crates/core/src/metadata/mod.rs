//! Metadata document read/write

pub mod service;

pub use service::{MetadataFetch, ProfileMetadataService};
