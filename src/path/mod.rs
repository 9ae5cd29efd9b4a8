//! SCIM attribute path model and parser.
//!
//! A [`Path`] addresses an attribute, sub-attribute, or filtered selection
//! of a multi-valued attribute inside a SCIM resource, following the RFC
//! 7644 `PATH` grammar:
//!
//! - `userName`
//! - `name.givenName`
//! - `emails[type eq "work"].value`
//! - `urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:manager.value`
//!
//! The root path (no elements) addresses the resource itself and is produced
//! with [`Path::root`]; it carries an extension schema URN only when built
//! with [`Path::root_with_urn`].

use crate::error::{ScimError, ScimResult};
use crate::filter::Filter;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One element of an attribute path: a name plus an optional value filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    attribute: String,
    filter: Option<Filter>,
}

impl Element {
    /// Create an element with no value filter.
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            filter: None,
        }
    }

    /// Create an element with a value filter.
    pub fn filtered(attribute: impl Into<String>, filter: Filter) -> Self {
        Self {
            attribute: attribute.into(),
            filter: Some(filter),
        }
    }

    /// The attribute name this element addresses.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The value filter restricting multi-valued entries, if any.
    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.attribute)?;
        if let Some(filter) = &self.filter {
            write!(f, "[{}]", filter)?;
        }
        Ok(())
    }
}

/// A parsed SCIM attribute path.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    schema_urn: Option<String>,
    elements: Vec<Element>,
}

impl Path {
    /// The path addressing the whole resource.
    pub fn root() -> Self {
        Self {
            schema_urn: None,
            elements: Vec::new(),
        }
    }

    /// The path addressing the root of a schema extension namespace.
    pub fn root_with_urn(urn: impl Into<String>) -> Self {
        Self {
            schema_urn: Some(urn.into()),
            elements: Vec::new(),
        }
    }

    /// A single-element path addressing a top-level attribute.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            schema_urn: None,
            elements: vec![Element::new(name)],
        }
    }

    /// Append a sub-attribute element.
    pub fn sub_attribute(mut self, name: impl Into<String>) -> Self {
        self.elements.push(Element::new(name));
        self
    }

    /// Attach a value filter to the last element.
    ///
    /// No-op on the root path, which has no element to filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        if let Some(last) = self.elements.last_mut() {
            last.filter = Some(filter);
        }
        self
    }

    /// Scope this path to an extension schema namespace.
    pub fn with_urn(mut self, urn: impl Into<String>) -> Self {
        self.schema_urn = Some(urn.into());
        self
    }

    /// True if this path addresses the resource (or extension namespace) root.
    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    /// The extension schema URN this path is scoped to, if any.
    pub fn schema_urn(&self) -> Option<&str> {
        self.schema_urn.as_deref()
    }

    /// The ordered path elements; empty for the root path.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Parse an RFC 7644 path expression.
    ///
    /// An empty input is rejected; the root path has no textual form (patch
    /// operations express it by omitting `path` entirely).
    pub fn parse(input: &str) -> ScimResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ScimError::invalid_path(input, "path cannot be empty"));
        }

        // Per the PATH ABNF the attribute part follows the final colon of a
        // schema URN prefix. Colons may also appear inside filter string
        // literals, so only the text before the first bracket can belong to
        // the URN.
        let (schema_urn, attr_part) = if trimmed.to_lowercase().starts_with("urn:") {
            let head = &trimmed[..trimmed.find('[').unwrap_or(trimmed.len())];
            match head.rfind(':') {
                Some(idx) if idx + 1 < trimmed.len() => {
                    (Some(trimmed[..idx].to_string()), &trimmed[idx + 1..])
                }
                _ => {
                    return Err(ScimError::invalid_path(
                        input,
                        "schema URN prefix must be followed by an attribute name",
                    ));
                }
            }
        } else {
            (None, trimmed)
        };

        let mut elements = Vec::new();
        let mut rest = attr_part;

        loop {
            let name_end = rest
                .find(|c| c == '.' || c == '[')
                .unwrap_or(rest.len());
            let name = &rest[..name_end];
            if name.is_empty() {
                return Err(ScimError::invalid_path(input, "empty path element"));
            }
            if !is_valid_attribute_name(name) {
                return Err(ScimError::invalid_path(
                    input,
                    format!("invalid attribute name '{}'", name),
                ));
            }
            rest = &rest[name_end..];

            let filter = if rest.starts_with('[') {
                let close = find_closing_bracket(rest).ok_or_else(|| {
                    ScimError::invalid_path(input, "unterminated value filter")
                })?;
                let filter = Filter::parse(&rest[1..close])?;
                rest = &rest[close + 1..];
                Some(filter)
            } else {
                None
            };

            elements.push(Element {
                attribute: name.to_string(),
                filter,
            });

            if rest.is_empty() {
                break;
            }
            if let Some(stripped) = rest.strip_prefix('.') {
                rest = stripped;
            } else {
                return Err(ScimError::invalid_path(
                    input,
                    format!("unexpected character at '{}'", rest),
                ));
            }
        }

        Ok(Self {
            schema_urn,
            elements,
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(urn) = &self.schema_urn {
            write!(f, "{}", urn)?;
        }
        for (idx, element) in self.elements.iter().enumerate() {
            if idx == 0 {
                // Attribute part follows a URN prefix separated by a colon.
                if self.schema_urn.is_some() {
                    write!(f, ":")?;
                }
            } else {
                write!(f, ".")?;
            }
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Path::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn is_valid_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Find the index of the `]` closing the filter that starts at index 0,
/// skipping brackets inside quoted string literals.
fn find_closing_bracket(s: &str) -> Option<usize> {
    let mut in_string = false;
    let mut escaped = false;
    for (idx, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            ']' if !in_string => return Some(idx),
            _ => {}
        }
    }
    None
}
