//! JSON path traversal engine.
//!
//! Reads, adds, replaces, and removes values at a [`Path`] inside a
//! `serde_json::Value` document tree, implementing RFC 7644 attribute
//! addressing semantics:
//!
//! - multi-step paths recurse into every matching entry of a multi-valued
//!   attribute independently (`addresses[type eq "work"].streetAddress`);
//! - ADD merges complex values field by field and appends to arrays;
//! - REPLACE replaces arrays wholesale unless a value filter selects
//!   specific entries to update in place;
//! - a `null` or empty-array value supplied to add/replace is a no-op (the
//!   SCIM equivalence of null/empty to "absent");
//! - a path that lands on a scalar where a container is expected, or a value
//!   filter that matches zero entries of an existing array, raises the
//!   [`ScimError::NoTarget`] condition for the caller to judge.
//!
//! Attribute names are matched case-insensitively throughout, as RFC 7643
//! requires. Value filters inside paths evaluate with case-insensitive
//! string comparison (the schema default); the enforcer applies
//! case-exactness where the attribute definition demands it.

use crate::error::{ScimError, ScimResult};
use crate::path::{Element, Path};
use log::trace;
use serde_json::{Map, Value};

/// Collect all values addressed by a path.
///
/// Returns clones of every match: zero or more for filtered multi-valued
/// paths, at most one otherwise. A missing attribute yields an empty result;
/// a filter matching nothing in an existing array is a no-target error.
pub fn get_values(doc: &Value, path: &Path) -> ScimResult<Vec<Value>> {
    let elements = effective_elements(path);
    if elements.is_empty() {
        return Ok(vec![doc.clone()]);
    }
    let mut out = Vec::new();
    gather(doc, &elements, path, &mut out)?;
    Ok(out)
}

/// Add a value at a path, with RFC 7644 ADD merge semantics.
pub fn add_value(doc: &mut Value, path: &Path, value: &Value) -> ScimResult<()> {
    if is_absent(value) {
        return Ok(());
    }
    trace!("add at '{}'", path);
    let elements = effective_elements(path);
    if elements.is_empty() {
        return merge_into_root(doc, value, MergeMode::Add);
    }
    visit(doc, &elements, path, &mut MutOp::Add(value))
}

/// Replace the value at a path.
///
/// Arrays are replaced wholesale unless the trailing path element carries a
/// value filter, in which case only the selected entries are updated in
/// place (and zero selected entries is a no-target error).
pub fn replace_value(doc: &mut Value, path: &Path, value: &Value) -> ScimResult<()> {
    if is_absent(value) {
        return Ok(());
    }
    trace!("replace at '{}'", path);
    let elements = effective_elements(path);
    if elements.is_empty() {
        return merge_into_root(doc, value, MergeMode::Replace);
    }
    visit(doc, &elements, path, &mut MutOp::Replace(value))
}

/// Remove all values addressed by a path.
///
/// Physically deletes matched nodes from their parent; when a filtered
/// removal empties a multi-valued attribute the field itself is removed.
/// Removing nothing at all is a no-target error.
pub fn remove_values(doc: &mut Value, path: &Path) -> ScimResult<()> {
    trace!("remove at '{}'", path);
    let elements = effective_elements(path);
    if elements.is_empty() {
        return Err(ScimError::invalid_path(
            path.to_string(),
            "cannot remove the resource root",
        ));
    }
    let mut removed = 0usize;
    visit(doc, &elements, path, &mut MutOp::Remove(&mut removed))?;
    if removed == 0 {
        return Err(ScimError::no_target(path.to_string()));
    }
    Ok(())
}

/// Mutating operation kinds, dispatched by the shared traversal recursion.
enum MutOp<'a> {
    Add(&'a Value),
    Replace(&'a Value),
    Remove(&'a mut usize),
}

#[derive(Clone, Copy)]
enum MergeMode {
    Add,
    Replace,
}

/// A path scoped to an extension schema addresses attributes inside the
/// top-level field keyed by the extension URN.
fn effective_elements(path: &Path) -> Vec<Element> {
    let mut elements = Vec::with_capacity(path.elements().len() + 1);
    if let Some(urn) = path.schema_urn() {
        elements.push(Element::new(urn));
    }
    elements.extend(path.elements().iter().cloned());
    elements
}

fn is_absent(value: &Value) -> bool {
    value.is_null() || value.as_array().is_some_and(|a| a.is_empty())
}

/// Case-insensitive field lookup.
fn find_key<'a>(obj: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    obj.keys()
        .find(|key| key.eq_ignore_ascii_case(name))
        .map(String::as_str)
}

/// Read-only gather recursion.
fn gather(
    node: &Value,
    elements: &[Element],
    full: &Path,
    out: &mut Vec<Value>,
) -> ScimResult<()> {
    let (element, rest) = elements
        .split_first()
        .expect("gather called with empty element list");

    let obj = node
        .as_object()
        .ok_or_else(|| ScimError::no_target(full.to_string()))?;

    let Some(key) = find_key(obj, element.attribute()) else {
        return Ok(());
    };
    let field = &obj[key];

    match field {
        Value::Array(items) => {
            let mut matched = 0usize;
            for item in items {
                if element
                    .filter()
                    .is_none_or(|f| f.matches(item, false))
                {
                    matched += 1;
                    if rest.is_empty() {
                        out.push(item.clone());
                    } else {
                        gather(item, rest, full, out)?;
                    }
                }
            }
            if element.filter().is_some() && matched == 0 {
                return Err(ScimError::no_target(full.to_string()));
            }
        }
        _ => {
            if let Some(filter) = element.filter() {
                if !filter.matches(field, false) {
                    return Err(ScimError::no_target(full.to_string()));
                }
            }
            if rest.is_empty() {
                out.push(field.clone());
            } else {
                gather(field, rest, full, out)?;
            }
        }
    }

    Ok(())
}

/// Shared mutating recursion: inner elements navigate (materializing missing
/// objects for add/replace), the last element applies the operation.
fn visit(node: &mut Value, elements: &[Element], full: &Path, op: &mut MutOp) -> ScimResult<()> {
    let (element, rest) = elements
        .split_first()
        .expect("visit called with empty element list");

    if rest.is_empty() {
        return visit_leaf(node, element, full, op);
    }

    let obj = node
        .as_object_mut()
        .ok_or_else(|| ScimError::no_target(full.to_string()))?;

    let key = match find_key(obj, element.attribute()) {
        Some(key) => key.to_string(),
        None => match op {
            // Mutate mode materializes missing inner nodes, unless a filter
            // would then have nothing to match.
            MutOp::Add(_) | MutOp::Replace(_) => {
                if element.filter().is_some() {
                    return Err(ScimError::no_target(full.to_string()));
                }
                obj.insert(element.attribute().to_string(), Value::Object(Map::new()));
                element.attribute().to_string()
            }
            MutOp::Remove(_) => return Ok(()),
        },
    };

    let field = obj.get_mut(&key).expect("key resolved above");

    match field {
        Value::Array(items) => {
            let mut matched = 0usize;
            for item in items {
                if element
                    .filter()
                    .is_none_or(|f| f.matches(item, false))
                {
                    matched += 1;
                    visit(item, rest, full, op)?;
                }
            }
            if element.filter().is_some() && matched == 0 {
                match op {
                    MutOp::Remove(_) => {}
                    _ => return Err(ScimError::no_target(full.to_string())),
                }
            }
        }
        Value::Object(_) => {
            if let Some(filter) = element.filter() {
                if !filter.matches(field, false) {
                    return match op {
                        MutOp::Remove(_) => Ok(()),
                        _ => Err(ScimError::no_target(full.to_string())),
                    };
                }
            }
            visit(field, rest, full, op)?;
        }
        _ => return Err(ScimError::no_target(full.to_string())),
    }

    Ok(())
}

fn visit_leaf(node: &mut Value, element: &Element, full: &Path, op: &mut MutOp) -> ScimResult<()> {
    let obj = node
        .as_object_mut()
        .ok_or_else(|| ScimError::no_target(full.to_string()))?;

    let key = find_key(obj, element.attribute()).map(str::to_string);

    match op {
        MutOp::Remove(removed) => {
            let Some(key) = key else {
                return Ok(());
            };
            match element.filter() {
                None => {
                    let taken = obj.remove(&key).expect("key resolved above");
                    **removed += match taken {
                        Value::Array(items) => items.len(),
                        _ => 1,
                    };
                }
                Some(filter) => {
                    let field = obj.get_mut(&key).expect("key resolved above");
                    match field {
                        Value::Array(items) => {
                            let before = items.len();
                            items.retain(|item| !filter.matches(item, false));
                            **removed += before - items.len();
                            if items.is_empty() {
                                obj.remove(&key);
                            }
                        }
                        other => {
                            if filter.matches(other, false) {
                                obj.remove(&key);
                                **removed += 1;
                            }
                        }
                    }
                }
            }
            Ok(())
        }
        MutOp::Add(value) => apply_update(obj, &key, element, full, value, MergeMode::Add),
        MutOp::Replace(value) => apply_update(obj, &key, element, full, value, MergeMode::Replace),
    }
}

fn apply_update(
    obj: &mut Map<String, Value>,
    key: &Option<String>,
    element: &Element,
    full: &Path,
    value: &Value,
    mode: MergeMode,
) -> ScimResult<()> {
    match element.filter() {
        None => {
            match key {
                Some(key) => {
                    let field = obj.get_mut(key).expect("key resolved by caller");
                    merge(field, value, mode);
                }
                None => {
                    obj.insert(element.attribute().to_string(), value.clone());
                }
            }
            Ok(())
        }
        Some(filter) => {
            // A filter selects existing entries to update in place.
            let Some(key) = key else {
                return Err(ScimError::no_target(full.to_string()));
            };
            let field = obj.get_mut(key).expect("key resolved by caller");
            match field {
                Value::Array(items) => {
                    let mut matched = 0usize;
                    for item in items {
                        if filter.matches(item, false) {
                            matched += 1;
                            merge(item, value, mode);
                        }
                    }
                    if matched == 0 {
                        return Err(ScimError::no_target(full.to_string()));
                    }
                    Ok(())
                }
                other => {
                    if !filter.matches(other, false) {
                        return Err(ScimError::no_target(full.to_string()));
                    }
                    merge(other, value, mode);
                    Ok(())
                }
            }
        }
    }
}

/// Merge a supplied value into a target location.
///
/// Objects merge field by field recursively; in Add mode arrays append, in
/// Replace mode arrays (and everything else) are set wholesale.
fn merge(target: &mut Value, value: &Value, mode: MergeMode) {
    match (&mut *target, value) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (name, incoming_value) in incoming {
                if incoming_value.is_null() {
                    continue;
                }
                match find_key(existing, name).map(str::to_string) {
                    Some(key) => {
                        let slot = existing.get_mut(&key).expect("key resolved above");
                        merge(slot, incoming_value, mode);
                    }
                    None => {
                        existing.insert(name.clone(), incoming_value.clone());
                    }
                }
            }
        }
        (Value::Array(existing), incoming) => match mode {
            MergeMode::Add => match incoming {
                Value::Array(items) => existing.extend(items.iter().cloned()),
                single => existing.push(single.clone()),
            },
            MergeMode::Replace => *target = incoming.clone(),
        },
        (_, incoming) => *target = incoming.clone(),
    }
}

fn merge_into_root(doc: &mut Value, value: &Value, mode: MergeMode) -> ScimResult<()> {
    let obj = doc
        .as_object_mut()
        .ok_or_else(|| ScimError::malformed("document root must be a JSON object"))?;
    let incoming = value
        .as_object()
        .ok_or_else(|| ScimError::invalid_value("root add/replace requires an object value"))?;
    for (name, incoming_value) in incoming {
        if incoming_value.is_null() {
            continue;
        }
        match find_key(obj, name).map(str::to_string) {
            Some(key) => {
                let slot = obj.get_mut(&key).expect("key resolved above");
                merge(slot, incoming_value, mode);
            }
            None => {
                obj.insert(name.clone(), incoming_value.clone());
            }
        }
    }
    Ok(())
}
