//! SCIM 2.0 schema conformance library for Rust.
//!
//! Provides the RFC 7643 schema data model, the RFC 7644 path and filter
//! grammar, a JSON path traversal engine for applying PATCH operations, and
//! a schema enforcer that checks create, replace, and modify requests
//! against their schemas and reports every violation it finds.
//!
//! # Core Components
//!
//! - [`SchemaEnforcer`] - Checks documents and patch operations against schemas
//! - [`SchemaRegistry`] - Loads and stores RFC 7643 schema resources
//! - [`Path`] / [`Filter`] - Parsed SCIM attribute paths and value filters
//! - [`traverse`] - Read, add, replace, and remove values at a path
//!
//! # Quick Start
//!
//! ```rust
//! use scim_conformance::{SchemaEnforcer, SchemaRegistry};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new()?;
//! let core = registry
//!     .require_schema("urn:ietf:params:scim:schemas:core:2.0:User")?
//!     .clone();
//! let enforcer = SchemaEnforcer::new(core, Vec::new())?;
//!
//! let results = enforcer.check_create(&json!({
//!     "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
//!     "userName": "bjensen"
//! }))?;
//! assert!(results.is_empty());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! Enforcement never stops at the first problem: all issues from one call
//! come back together in a [`Results`], split into syntax, mutability, and
//! path categories. Conditions that make checking itself impossible, such
//! as an unparseable path, surface as [`ScimError`].

pub mod enforcer;
pub mod error;
pub mod filter;
pub mod optional;
pub mod patch;
pub mod path;
pub mod schema;
pub mod traverse;

// Re-export commonly used types for convenience
pub use enforcer::{Results, SchemaEnforcer};
pub use error::{ScimError, ScimResult};
pub use filter::{CompareOp, Filter};
pub use optional::Tristate;
pub use patch::{PatchOpKind, PatchOperation};
pub use path::{Element, Path};
pub use schema::{
    AttributeDefinition, AttributeType, Mutability, Returned, SchemaRegistry, SchemaResource,
    Uniqueness,
};
