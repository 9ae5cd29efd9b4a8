//! SCIM PATCH operations.
//!
//! Models one entry of an RFC 7644 PATCH request body (`op`, optional
//! `path`, optional `value`) and applies it to a document through the
//! traversal engine. Operations with no path target the resource root:
//! add/replace merge their object value into the document, per RFC 7644
//! Section 3.5.2.

use crate::error::{ScimError, ScimResult};
use crate::path::Path;
use crate::traverse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three PATCH operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOpKind {
    Add,
    Remove,
    Replace,
}

/// One PATCH operation.
///
/// Deserializes directly from an RFC 7644 `Operations` entry:
///
/// ```
/// use scim_conformance::patch::PatchOperation;
/// use serde_json::json;
///
/// let op: PatchOperation = serde_json::from_value(json!({
///     "op": "replace",
///     "path": "emails[type eq \"work\"].value",
///     "value": "new@example.com"
/// })).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// Operation kind
    pub op: PatchOpKind,
    /// Target path; absent means the resource root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
    /// Value to add or replace; never present for remove
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    /// An add operation.
    pub fn add(path: Option<Path>, value: Value) -> Self {
        Self {
            op: PatchOpKind::Add,
            path,
            value: Some(value),
        }
    }

    /// A replace operation.
    pub fn replace(path: Option<Path>, value: Value) -> Self {
        Self {
            op: PatchOpKind::Replace,
            path,
            value: Some(value),
        }
    }

    /// A remove operation.
    pub fn remove(path: Path) -> Self {
        Self {
            op: PatchOpKind::Remove,
            path: Some(path),
            value: None,
        }
    }

    /// The target path, with the root path standing in for an absent one.
    pub fn path_or_root(&self) -> Path {
        self.path.clone().unwrap_or_else(Path::root)
    }

    /// Apply this operation to a document in place.
    ///
    /// Structural problems (remove without a path, add without a value) are
    /// fatal; a path that resolves to nothing raises
    /// [`ScimError::NoTarget`] for the caller to judge.
    pub fn apply(&self, doc: &mut Value) -> ScimResult<()> {
        match self.op {
            PatchOpKind::Add => {
                let value = self.require_value("add")?;
                traverse::add_value(doc, &self.path_or_root(), value)
            }
            PatchOpKind::Replace => {
                let value = self.require_value("replace")?;
                traverse::replace_value(doc, &self.path_or_root(), value)
            }
            PatchOpKind::Remove => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ScimError::invalid_value("remove operation requires a path")
                })?;
                traverse::remove_values(doc, path)
            }
        }
    }

    fn require_value(&self, kind: &str) -> ScimResult<&Value> {
        self.value
            .as_ref()
            .ok_or_else(|| ScimError::invalid_value(format!("{} operation requires a value", kind)))
    }
}
