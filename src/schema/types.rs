//! Core schema type definitions for SCIM resources.
//!
//! This module contains the data structures that define SCIM schemas,
//! attribute definitions, and their characteristics as specified in RFC 7643.

use crate::error::{ScimError, ScimResult};
use serde::{Deserialize, Serialize};

/// A SCIM schema resource.
///
/// A named collection of attribute definitions identified by a unique URI.
/// Each schema defines the structure and conformance rules for a resource
/// type like User or Group, or for a schema extension namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResource {
    /// Unique schema identifier (URI)
    pub id: String,
    /// Human-readable schema name
    pub name: String,
    /// Schema description
    #[serde(default)]
    pub description: String,
    /// List of attribute definitions
    pub attributes: Vec<AttributeDefinition>,
}

impl SchemaResource {
    /// Look up a top-level attribute definition by name (case-insensitive).
    pub fn find_attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// Verify the complex/sub-attribute invariant for every attribute.
    pub fn check_invariants(&self) -> ScimResult<()> {
        for attr in &self.attributes {
            attr.check_invariants()?;
        }
        Ok(())
    }
}

/// Definition of a SCIM attribute.
///
/// Defines all characteristics of an attribute including type, cardinality,
/// mutability, and value constraints. Constructed once at enforcer-setup
/// time and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    /// Attribute name
    pub name: String,
    /// Data type of the attribute
    #[serde(rename = "type")]
    pub data_type: AttributeType,
    /// Whether this attribute can have multiple values
    #[serde(default)]
    pub multi_valued: bool,
    /// Whether this attribute is required
    #[serde(default)]
    pub required: bool,
    /// Whether string comparison is case-sensitive
    #[serde(default)]
    pub case_exact: bool,
    /// Mutability characteristics
    #[serde(default)]
    pub mutability: Mutability,
    /// How the attribute is returned in responses
    #[serde(default)]
    pub returned: Returned,
    /// Uniqueness constraints
    #[serde(default)]
    pub uniqueness: Uniqueness,
    /// Allowed values for string attributes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub canonical_values: Vec<String>,
    /// Sub-attributes; present exactly when `data_type` is `Complex`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_attributes: Option<Vec<AttributeDefinition>>,
}

impl AttributeDefinition {
    /// A single-valued definition with defaults for everything but name and type.
    pub fn simple(name: impl Into<String>, data_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            data_type,
            multi_valued: false,
            required: false,
            case_exact: false,
            mutability: Mutability::ReadWrite,
            returned: Returned::Default,
            uniqueness: Uniqueness::None,
            canonical_values: Vec::new(),
            sub_attributes: None,
        }
    }

    /// A complex definition with the given sub-attributes.
    pub fn complex(
        name: impl Into<String>,
        sub_attributes: Vec<AttributeDefinition>,
    ) -> Self {
        Self {
            sub_attributes: Some(sub_attributes),
            ..Self::simple(name, AttributeType::Complex)
        }
    }

    /// Look up a sub-attribute definition by name (case-insensitive).
    pub fn find_sub_attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.sub_attributes
            .as_ref()?
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// The sub-attribute list, empty for non-complex definitions.
    pub fn sub_attributes(&self) -> &[AttributeDefinition] {
        self.sub_attributes.as_deref().unwrap_or(&[])
    }

    /// Verify that sub-attributes are present exactly for complex types,
    /// recursively.
    pub fn check_invariants(&self) -> ScimResult<()> {
        match (&self.data_type, &self.sub_attributes) {
            (AttributeType::Complex, None) => Err(ScimError::InvalidSchemaDefinition {
                attribute: self.name.clone(),
                details: "complex attribute must declare sub-attributes".to_string(),
            }),
            (AttributeType::Complex, Some(subs)) => {
                for sub in subs {
                    sub.check_invariants()?;
                }
                Ok(())
            }
            (_, Some(_)) => Err(ScimError::InvalidSchemaDefinition {
                attribute: self.name.clone(),
                details: "non-complex attribute cannot declare sub-attributes".to_string(),
            }),
            (_, None) => Ok(()),
        }
    }
}

/// SCIM attribute data types.
///
/// Represents the valid data types for SCIM attributes as defined in RFC 7643.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    /// String value
    String,
    /// Boolean value
    Boolean,
    /// Decimal number
    Decimal,
    /// Integer number
    Integer,
    /// DateTime in RFC3339 format
    DateTime,
    /// Binary data (base64 encoded)
    Binary,
    /// URI reference
    Reference,
    /// Complex attribute with sub-attributes
    Complex,
}

impl AttributeType {
    /// The camelCase name used in schema JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
            Self::DateTime => "dateTime",
            Self::Binary => "binary",
            Self::Reference => "reference",
            Self::Complex => "complex",
        }
    }
}

/// Attribute mutability characteristics.
///
/// Defines whether and how an attribute can be modified.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    /// Read-only attribute (managed by server)
    ReadOnly,
    /// Read-write attribute (can be modified by clients)
    #[default]
    ReadWrite,
    /// Immutable attribute (set once, never modified)
    Immutable,
    /// Write-only attribute (passwords, etc.)
    WriteOnly,
}

/// When an attribute is returned in responses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Returned {
    /// Always returned
    Always,
    /// Never returned
    Never,
    /// Returned by default, omittable via attribute selection
    #[default]
    Default,
    /// Returned only when requested
    Request,
}

/// Attribute uniqueness constraints.
///
/// Carried as schema metadata; the enforcer does not check uniqueness since
/// that requires a data store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    /// No uniqueness constraint
    #[default]
    None,
    /// Unique within the server
    Server,
    /// Globally unique
    Global,
}
