//! Schema definitions for SCIM resources.
//!
//! Implements the RFC 7643 schema metadata model: attribute definitions with
//! type, cardinality, mutability, and value constraints, grouped into schema
//! resources, plus a registry for loading them.
//!
//! # Key Types
//!
//! - [`SchemaResource`] - SCIM schema definition with attributes and metadata
//! - [`AttributeDefinition`] - Individual attribute specifications and constraints
//! - [`SchemaRegistry`] - Loader and lookup for registered schemas

pub mod embedded;
pub mod registry;
pub mod types;

// Re-export the main types for convenience
pub use registry::SchemaRegistry;
pub use types::{AttributeDefinition, AttributeType, Mutability, Returned, SchemaResource, Uniqueness};
