//! Schema registry for loading and accessing SCIM schema resources.
//!
//! The registry parses schema JSON (embedded or supplied by the caller),
//! checks the attribute-definition invariants, and hands out
//! [`SchemaResource`] values to configure a
//! [`crate::enforcer::SchemaEnforcer`].

use super::embedded;
use super::types::SchemaResource;
use crate::error::{ScimError, ScimResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Registry of parsed SCIM schema resources, keyed by schema URI.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, SchemaResource>,
}

impl SchemaRegistry {
    /// Create a registry preloaded with the embedded RFC 7643 schemas:
    /// core User, core Group, and the Enterprise User extension.
    pub fn new() -> ScimResult<Self> {
        let mut registry = Self {
            schemas: HashMap::new(),
        };
        registry.add_schema(Self::parse_schema(embedded::core_user_schema())?);
        registry.add_schema(Self::parse_schema(embedded::core_group_schema())?);
        registry.add_schema(Self::parse_schema(embedded::enterprise_user_schema())?);
        Ok(registry)
    }

    /// Create an empty registry.
    pub fn empty() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// Parse a schema resource from a JSON string, checking invariants.
    pub fn parse_schema(content: &str) -> ScimResult<SchemaResource> {
        let schema: SchemaResource = serde_json::from_str(content)?;
        schema.check_invariants()?;
        Ok(schema)
    }

    /// Parse a schema resource from an already-parsed JSON value.
    pub fn parse_schema_value(value: Value) -> ScimResult<SchemaResource> {
        let schema: SchemaResource = serde_json::from_value(value)?;
        schema.check_invariants()?;
        Ok(schema)
    }

    /// Load a schema resource from a JSON file.
    pub fn load_schema_file<P: AsRef<Path>>(path: P) -> ScimResult<SchemaResource> {
        let content = fs::read_to_string(&path).map_err(|e| {
            ScimError::malformed(format!(
                "cannot read schema file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::parse_schema(&content)
    }

    /// Add a schema to the registry, replacing any schema with the same id.
    pub fn add_schema(&mut self, schema: SchemaResource) {
        self.schemas.insert(schema.id.clone(), schema);
    }

    /// Get a schema by its URI.
    pub fn get_schema(&self, id: &str) -> Option<&SchemaResource> {
        self.schemas.get(id)
    }

    /// Get a schema by its URI, or fail with an unknown-schema error.
    pub fn require_schema(&self, id: &str) -> ScimResult<&SchemaResource> {
        self.schemas
            .get(id)
            .ok_or_else(|| ScimError::UnknownSchema { uri: id.to_string() })
    }

    /// All registered schemas.
    pub fn schemas(&self) -> impl Iterator<Item = &SchemaResource> {
        self.schemas.values()
    }
}
