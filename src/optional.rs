//! Tri-state wrapper for optional SCIM fields.
//!
//! SCIM PATCH and replace semantics distinguish a field that was never sent
//! from a field explicitly set to `null`: the former leaves the stored value
//! alone, the latter clears it. A plain `Option<T>` collapses the two, so
//! resource types wrap clearable fields in [`Tristate`] instead.
//!
//! Usage pattern:
//!
//! ```rust
//! use scim_conformance::optional::Tristate;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct UserPatch {
//!     #[serde(default, skip_serializing_if = "Tristate::is_unset")]
//!     nick_name: Tristate<String>,
//! }
//!
//! let sent_null: UserPatch = serde_json::from_str(r#"{"nick_name": null}"#).unwrap();
//! assert!(sent_null.nick_name.is_null());
//!
//! let absent: UserPatch = serde_json::from_str("{}").unwrap();
//! assert!(absent.nick_name.is_unset());
//! ```

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// A field value that is absent, explicitly null, or present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tristate<T> {
    /// The field did not appear in the document.
    Unset,
    /// The field appeared with an explicit `null`.
    Null,
    /// The field appeared with a value.
    Value(T),
}

impl<T> Tristate<T> {
    /// True if the field was never sent.
    ///
    /// Named for use with `#[serde(skip_serializing_if = "Tristate::is_unset")]`.
    pub fn is_unset(&self) -> bool {
        matches!(self, Tristate::Unset)
    }

    /// True if the field was explicitly set to null.
    pub fn is_null(&self) -> bool {
        matches!(self, Tristate::Null)
    }

    /// The contained value, if any.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Tristate::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Consumes the wrapper, discarding the unset/null distinction.
    pub fn into_option(self) -> Option<T> {
        match self {
            Tristate::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Maps the contained value, preserving the tag otherwise.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Tristate<U> {
        match self {
            Tristate::Unset => Tristate::Unset,
            Tristate::Null => Tristate::Null,
            Tristate::Value(v) => Tristate::Value(f(v)),
        }
    }
}

impl<T> Default for Tristate<T> {
    fn default() -> Self {
        Tristate::Unset
    }
}

impl<T> From<Option<T>> for Tristate<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Tristate::Value(v),
            None => Tristate::Null,
        }
    }
}

impl<T: Serialize> Serialize for Tristate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Unset fields are normally skipped via skip_serializing_if; if
            // one reaches here anyway, null is the closest wire form.
            Tristate::Unset | Tristate::Null => serializer.serialize_none(),
            Tristate::Value(v) => serializer.serialize_some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Tristate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A present field deserializes as Null or Value; Unset only arises
        // from the field being absent, which serde routes through Default.
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}
