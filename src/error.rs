//! Error types for SCIM conformance checking.
//!
//! Errors here are the *fatal* channel: conditions that prevent a check or a
//! path operation from proceeding at all. Schema violations discovered while
//! a check is running are not errors; they accumulate into
//! [`crate::enforcer::Results`] so a caller can report every problem at once.

/// Fatal error for SCIM path and schema operations.
///
/// Covers the conditions under which a traversal or conformance check cannot
/// produce a meaningful result, providing detailed context for each case.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// A path resolved to no modifiable location in the document.
    ///
    /// Raised when a path addresses a scalar where a container is expected,
    /// or when a value filter matches zero entries of an existing array.
    /// Callers decide whether this is fatal; `check_modify` swallows it
    /// during tentative patch application.
    #[error("No target found for path '{path}'")]
    NoTarget { path: String },

    /// Malformed SCIM path expression
    #[error("Invalid path '{path}': {details}")]
    InvalidPath { path: String, details: String },

    /// Malformed value filter expression
    #[error("Invalid filter '{filter}': {details}")]
    InvalidFilter { filter: String, details: String },

    /// A patch operation or supplied value is structurally unusable
    #[error("Invalid value: {details}")]
    InvalidValue { details: String },

    /// The document is not structured as the operation requires
    #[error("Malformed document: {details}")]
    MalformedDocument { details: String },

    /// Schema URI not known to the enforcer or registry
    #[error("Unknown schema URI: {uri}")]
    UnknownSchema { uri: String },

    /// A schema resource violates the attribute-definition invariants
    #[error("Invalid schema definition for attribute '{attribute}': {details}")]
    InvalidSchemaDefinition { attribute: String, details: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Convenience methods for creating common errors
impl ScimError {
    /// Create a no-target error for a path
    pub fn no_target(path: impl Into<String>) -> Self {
        Self::NoTarget { path: path.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an invalid filter error
    pub fn invalid_filter(filter: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidFilter {
            filter: filter.into(),
            details: details.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(details: impl Into<String>) -> Self {
        Self::InvalidValue {
            details: details.into(),
        }
    }

    /// Create a malformed document error
    pub fn malformed(details: impl Into<String>) -> Self {
        Self::MalformedDocument {
            details: details.into(),
        }
    }

    /// True if this error is the benign no-target condition.
    pub fn is_no_target(&self) -> bool {
        matches!(self, Self::NoTarget { .. })
    }
}

/// Result type alias for fatal SCIM errors.
pub type ScimResult<T> = Result<T, ScimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = ScimError::no_target("emails[type eq \"work\"]");
        assert!(error.to_string().contains("emails"));
        assert!(error.is_no_target());
    }

    #[test]
    fn test_invalid_path_display() {
        let error = ScimError::invalid_path("name..givenName", "empty path element");
        assert!(error.to_string().contains("name..givenName"));
        assert!(error.to_string().contains("empty path element"));
        assert!(!error.is_no_target());
    }
}
