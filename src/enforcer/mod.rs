//! Schema conformance checking for SCIM resources.
//!
//! The [`SchemaEnforcer`] validates a candidate resource document against a
//! core schema and a set of extension schemas, producing categorized issue
//! lists ([`Results`]) rather than failing on the first problem, so a caller
//! can report everything at once. Three entry points cover the SCIM write
//! operations:
//!
//! - [`SchemaEnforcer::check_create`] for new resources,
//! - [`SchemaEnforcer::check_replace`] for full replacement (with optional
//!   immutability comparison against the current resource),
//! - [`SchemaEnforcer::check_modify`] for PATCH operation lists, which also
//!   tentatively applies each operation to a working copy and re-checks the
//!   final state as a whole.
//!
//! The enforcer is immutable after construction and safe to share across
//! threads; every check deep-copies its inputs before mutating anything.

use crate::error::{ScimError, ScimResult};
use crate::patch::{PatchOpKind, PatchOperation};
use crate::path::Path;
use crate::schema::{AttributeDefinition, AttributeType, Mutability, SchemaResource};
use crate::traverse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use chrono::{DateTime, FixedOffset};
use log::{debug, trace};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Accumulated conformance issues from one enforcement call.
///
/// Three append-only categories: syntax issues (type, required, canonical,
/// undefined-attribute problems), mutability issues, and path issues from
/// patch operations. Empty results mean full conformance.
#[derive(Debug, Clone, Default)]
pub struct Results {
    syntax_issues: Vec<String>,
    mutability_issues: Vec<String>,
    path_issues: Vec<String>,
}

impl Results {
    /// Syntax issues: type mismatches, missing required attributes,
    /// canonical-value violations, undefined attributes.
    pub fn syntax_issues(&self) -> &[String] {
        &self.syntax_issues
    }

    /// Mutability issues: writes to read-only or immutable attributes.
    pub fn mutability_issues(&self) -> &[String] {
        &self.mutability_issues
    }

    /// Path issues: patch paths that do not resolve against the schema.
    pub fn path_issues(&self) -> &[String] {
        &self.path_issues
    }

    /// True when no issues of any category were found.
    pub fn is_empty(&self) -> bool {
        self.syntax_issues.is_empty()
            && self.mutability_issues.is_empty()
            && self.path_issues.is_empty()
    }

    fn syntax(&mut self, message: impl Into<String>) {
        self.syntax_issues.push(message.into());
    }

    fn mutability(&mut self, message: impl Into<String>) {
        self.mutability_issues.push(message.into());
    }

    fn path(&mut self, message: impl Into<String>) {
        self.path_issues.push(message.into());
    }
}

/// Schema conformance checker for one resource type.
///
/// Holds the core schema and the extension schemas (each flagged required or
/// optional for this resource type), fixed at construction.
#[derive(Debug, Clone)]
pub struct SchemaEnforcer {
    core: SchemaResource,
    extensions: Vec<(SchemaResource, bool)>,
}

impl SchemaEnforcer {
    /// Create an enforcer from a core schema and extension schemas, each
    /// paired with whether it is required for this resource type.
    ///
    /// Fails if any schema violates the attribute-definition invariants.
    pub fn new(
        core: SchemaResource,
        extensions: Vec<(SchemaResource, bool)>,
    ) -> ScimResult<Self> {
        core.check_invariants()?;
        for (extension, _) in &extensions {
            extension.check_invariants()?;
        }
        Ok(Self { core, extensions })
    }

    /// The core schema this enforcer validates against.
    pub fn core_schema(&self) -> &SchemaResource {
        &self.core
    }

    /// The extension schemas with their required flags.
    pub fn extensions(&self) -> &[(SchemaResource, bool)] {
        &self.extensions
    }

    /// Check a new resource document for schema conformance.
    pub fn check_create(&self, doc: &Value) -> ScimResult<Results> {
        debug!("checking create against schema '{}'", self.core.id);
        let mut results = Results::default();
        self.check_resource(doc, true, None, &mut results)?;
        Ok(results)
    }

    /// Check a full replacement document.
    ///
    /// When the current resource is supplied, immutable attributes that
    /// already hold a non-null value may not change.
    pub fn check_replace(&self, doc: &Value, current: Option<&Value>) -> ScimResult<Results> {
        debug!("checking replace against schema '{}'", self.core.id);
        let mut results = Results::default();
        self.check_resource(doc, true, current, &mut results)?;
        Ok(results)
    }

    /// Check a list of PATCH operations.
    ///
    /// Each operation is classified in sequence, then tentatively applied to
    /// a working copy of the current resource (when supplied) so later
    /// operations see earlier effects. A benign no-target failure during
    /// application is swallowed; any other application failure propagates.
    /// After all operations, the fully-applied result is checked as a whole
    /// resource, catching end states that no single operation produces on
    /// its own.
    pub fn check_modify(
        &self,
        ops: &[PatchOperation],
        current: Option<&Value>,
    ) -> ScimResult<Results> {
        debug!(
            "checking {} patch operation(s) against schema '{}'",
            ops.len(),
            self.core.id
        );
        let mut results = Results::default();
        let mut applied = current.cloned();

        for op in ops {
            self.check_operation(op, applied.as_ref(), &mut results)?;

            if let Some(doc) = applied.as_mut() {
                match self.stored_form(op).apply(doc) {
                    Ok(()) => {}
                    Err(err) if err.is_no_target() => {
                        trace!("ignoring no-target during tentative apply: {}", err);
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        if let Some(doc) = applied.as_ref() {
            // Server-managed fields carried over from the current resource
            // are fine; only the schema shape of the end state matters here.
            let cleaned = self.remove_read_only_attributes(doc);
            self.check_resource(&cleaned, true, None, &mut results)?;
        }

        Ok(results)
    }

    /// An add may supply a single bare entry for a multi-valued attribute;
    /// the stored form is a one-element array, so the value is wrapped
    /// before application. The traversal layer is schema-agnostic and
    /// cannot make that call itself.
    fn stored_form(&self, op: &PatchOperation) -> PatchOperation {
        let mut op = op.clone();
        if op.op != PatchOpKind::Add {
            return op;
        }
        let is_bare_entry = op
            .value
            .as_ref()
            .is_some_and(|value| !value.is_array() && !value.is_null());
        if !is_bare_entry {
            return op;
        }
        let path = op.path_or_root();
        // A filtered add merges into the selected entries instead.
        let has_filter = path
            .elements()
            .last()
            .is_some_and(|element| element.filter().is_some());
        if has_filter {
            return op;
        }
        if let Ok(Some(attr)) = self.resolve_definition(&path) {
            if attr.multi_valued {
                let entry = op.value.take().expect("present per the check above");
                op.value = Some(Value::Array(vec![entry]));
            }
        }
        op
    }

    /// Return a copy of the document with all read-only attributes stripped,
    /// recursively, across the core and extension namespaces.
    ///
    /// Useful before a create or replace check on a client-supplied payload,
    /// which routinely echoes server-managed fields like `id` and `meta`.
    pub fn remove_read_only_attributes(&self, doc: &Value) -> Value {
        let mut copy = doc.clone();
        if let Some(obj) = copy.as_object_mut() {
            strip_read_only(obj, &self.core.attributes);
            for (extension, _) in &self.extensions {
                if let Some(key) = find_key(obj, &extension.id) {
                    if let Some(ns) = obj.get_mut(&key).and_then(Value::as_object_mut) {
                        strip_read_only(ns, &extension.attributes);
                    }
                }
            }
        }
        copy
    }

    // ---- whole-resource checking -------------------------------------

    /// Shared create/replace/applied-state check. Works on a deep copy so
    /// undefined attributes can be stripped without touching caller state.
    fn check_resource(
        &self,
        doc: &Value,
        enforce_required: bool,
        current: Option<&Value>,
        results: &mut Results,
    ) -> ScimResult<()> {
        let mut working = doc.clone();
        let obj = working
            .as_object_mut()
            .ok_or_else(|| ScimError::malformed("resource must be a JSON object"))?;

        self.check_schemas_attribute(obj, enforce_required, results);

        self.check_namespace(
            obj,
            "",
            '.',
            &self.core.attributes,
            enforce_required,
            current,
            results,
        );

        // Top-level fields that are neither core attributes, the schemas
        // list, nor a known extension namespace are undefined.
        let undefined: Vec<String> = obj
            .keys()
            .filter(|key| {
                !key.eq_ignore_ascii_case("schemas")
                    && self.core.find_attribute(key).is_none()
                    && !self
                        .extensions
                        .iter()
                        .any(|(ext, _)| ext.id.eq_ignore_ascii_case(key))
            })
            .cloned()
            .collect();
        for key in undefined {
            results.syntax(format!("Undefined attribute '{}'", key));
            trace!("stripping undefined attribute '{}'", key);
            obj.remove(&key);
        }

        for (extension, _) in &self.extensions {
            let Some(key) = find_key(obj, &extension.id) else {
                continue;
            };
            let current_ns = current
                .and_then(Value::as_object)
                .and_then(|cur| find_key(cur, &extension.id).map(|k| &cur[&k]));
            match obj.get_mut(&key) {
                Some(Value::Object(ns)) => {
                    self.check_namespace(
                        ns,
                        &extension.id,
                        ':',
                        &extension.attributes,
                        enforce_required,
                        current_ns,
                        results,
                    );
                    let undefined: Vec<String> = ns
                        .keys()
                        .filter(|k| extension.find_attribute(k).is_none())
                        .cloned()
                        .collect();
                    for k in undefined {
                        results.syntax(format!("Undefined attribute '{}:{}'", extension.id, k));
                        ns.remove(&k);
                    }
                }
                Some(_) => {
                    results.syntax(format!(
                        "Extension namespace '{}' must be a JSON object",
                        extension.id
                    ));
                }
                None => {}
            }
        }

        Ok(())
    }

    /// Check every schema-defined attribute of one namespace object:
    /// required presence, mutability, and type/value conformance.
    #[allow(clippy::too_many_arguments)]
    fn check_namespace(
        &self,
        obj: &mut Map<String, Value>,
        prefix: &str,
        separator: char,
        attributes: &[AttributeDefinition],
        enforce_required: bool,
        current: Option<&Value>,
        results: &mut Results,
    ) {
        for attr in attributes {
            let attr_path = join_path(prefix, separator, &attr.name);
            let key = find_key(obj, &attr.name);
            let value = key.as_ref().map(|k| &obj[k]);

            match value {
                None | Some(Value::Null) => {
                    if attr.required && enforce_required {
                        results.syntax(format!(
                            "Required attribute '{}' is missing",
                            attr_path
                        ));
                    }
                }
                Some(_) => {
                    match attr.mutability {
                        Mutability::ReadOnly => {
                            results.mutability(format!(
                                "Attribute '{}' is read-only and cannot be provided",
                                attr_path
                            ));
                        }
                        Mutability::Immutable => {
                            if let Some(cur_obj) = current.and_then(Value::as_object) {
                                let cur = find_key(cur_obj, &attr.name)
                                    .map(|k| &cur_obj[&k])
                                    .filter(|v| !v.is_null());
                                if let (Some(cur), Some(new)) = (cur, value) {
                                    if cur != new {
                                        results.mutability(format!(
                                            "Attribute '{}' is immutable and does not match its current value",
                                            attr_path
                                        ));
                                    }
                                }
                            }
                        }
                        _ => {}
                    }

                    let key = key.expect("value implies key");
                    let current_field = current
                        .and_then(Value::as_object)
                        .and_then(|cur| find_key(cur, &attr.name).map(|k| &cur[&k]));
                    let field = obj.get_mut(&key).expect("key resolved above");
                    self.check_value(
                        &attr_path,
                        attr,
                        field,
                        enforce_required,
                        current_field,
                        results,
                    );
                }
            }
        }
    }

    /// Cardinality dispatch: multi-valued attributes must carry arrays,
    /// single-valued ones must not.
    fn check_value(
        &self,
        attr_path: &str,
        attr: &AttributeDefinition,
        value: &mut Value,
        enforce_required: bool,
        current: Option<&Value>,
        results: &mut Results,
    ) {
        if attr.multi_valued {
            match value {
                Value::Array(items) => {
                    for item in items {
                        self.check_single_value(
                            attr_path,
                            attr,
                            item,
                            enforce_required,
                            None,
                            results,
                        );
                    }
                }
                _ => {
                    results.syntax(format!(
                        "Attribute '{}' is multi-valued and must be an array, got {}",
                        attr_path,
                        json_kind(value)
                    ));
                }
            }
        } else if value.is_array() {
            results.syntax(format!(
                "Attribute '{}' is single-valued and must not be an array",
                attr_path
            ));
        } else {
            self.check_single_value(attr_path, attr, value, enforce_required, current, results);
        }
    }

    /// Check one JSON value against its attribute definition: node kind per
    /// declared type, secondary format checks, canonical values, and
    /// recursion into complex sub-attributes.
    fn check_single_value(
        &self,
        attr_path: &str,
        attr: &AttributeDefinition,
        value: &mut Value,
        enforce_required: bool,
        current: Option<&Value>,
        results: &mut Results,
    ) {
        match attr.data_type {
            AttributeType::Complex => {
                match value {
                    Value::Object(obj) => {
                        self.check_namespace(
                            obj,
                            attr_path,
                            '.',
                            attr.sub_attributes(),
                            enforce_required,
                            current,
                            results,
                        );
                        let undefined: Vec<String> = obj
                            .keys()
                            .filter(|k| attr.find_sub_attribute(k).is_none())
                            .cloned()
                            .collect();
                        for k in undefined {
                            results.syntax(format!("Undefined attribute '{}.{}'", attr_path, k));
                            obj.remove(&k);
                        }
                    }
                    _ => {
                        results.syntax(type_mismatch(attr_path, attr, value));
                    }
                }
            }
            AttributeType::Boolean => {
                if !value.is_boolean() {
                    results.syntax(type_mismatch(attr_path, attr, value));
                }
            }
            AttributeType::Integer => {
                if !value.is_number() {
                    results.syntax(type_mismatch(attr_path, attr, value));
                } else if !value.is_i64() && !value.is_u64() {
                    results.syntax(format!(
                        "Attribute '{}' must be an integral number",
                        attr_path
                    ));
                }
            }
            AttributeType::Decimal => {
                if !value.is_number() {
                    results.syntax(type_mismatch(attr_path, attr, value));
                }
            }
            AttributeType::String => {
                match value.as_str() {
                    Some(text) => self.check_canonical(attr_path, attr, text, results),
                    None => results.syntax(type_mismatch(attr_path, attr, value)),
                }
            }
            AttributeType::DateTime => match value.as_str() {
                Some(text) => {
                    if DateTime::<FixedOffset>::parse_from_rfc3339(text).is_err() {
                        results.syntax(format!(
                            "Attribute '{}' has invalid RFC 3339 dateTime value '{}'",
                            attr_path, text
                        ));
                    }
                }
                None => results.syntax(type_mismatch(attr_path, attr, value)),
            },
            AttributeType::Binary => match value.as_str() {
                Some(text) => {
                    if BASE64_STANDARD.decode(text).is_err() {
                        results.syntax(format!(
                            "Attribute '{}' has invalid base64 value",
                            attr_path
                        ));
                    }
                }
                None => results.syntax(type_mismatch(attr_path, attr, value)),
            },
            AttributeType::Reference => match value.as_str() {
                Some(text) => {
                    if !is_valid_uri(text) {
                        results.syntax(format!(
                            "Attribute '{}' has invalid reference URI '{}'",
                            attr_path, text
                        ));
                    }
                }
                None => results.syntax(type_mismatch(attr_path, attr, value)),
            },
        }
    }

    fn check_canonical(
        &self,
        attr_path: &str,
        attr: &AttributeDefinition,
        text: &str,
        results: &mut Results,
    ) {
        if attr.canonical_values.is_empty() {
            return;
        }
        let matched = attr.canonical_values.iter().any(|allowed| {
            if attr.case_exact {
                allowed == text
            } else {
                allowed.eq_ignore_ascii_case(text)
            }
        });
        if !matched {
            results.syntax(format!(
                "Attribute '{}' has invalid value '{}'; allowed values: {}",
                attr_path,
                text,
                attr.canonical_values.join(", ")
            ));
        }
    }

    /// Verify the `schemas` attribute: core URI listed, every listed URI
    /// known, every required extension listed, no duplicates.
    fn check_schemas_attribute(
        &self,
        obj: &Map<String, Value>,
        required: bool,
        results: &mut Results,
    ) {
        let Some(key) = find_key(obj, "schemas") else {
            if required {
                results.syntax("Required attribute 'schemas' is missing".to_string());
            }
            return;
        };
        let Some(listed) = obj[&key].as_array() else {
            results.syntax("Attribute 'schemas' must be an array of URIs".to_string());
            return;
        };

        let mut seen = HashSet::new();
        let mut uris = Vec::new();
        for entry in listed {
            let Some(uri) = entry.as_str() else {
                results.syntax(format!(
                    "Attribute 'schemas' contains a non-string value: {}",
                    entry
                ));
                continue;
            };
            if !seen.insert(uri) {
                results.syntax(format!("Duplicate schema URI '{}'", uri));
                continue;
            }
            uris.push(uri);
        }

        if !uris.iter().any(|uri| *uri == self.core.id) {
            results.syntax(format!(
                "The 'schemas' attribute must include the core schema URI '{}'",
                self.core.id
            ));
        }

        for uri in &uris {
            if *uri != self.core.id && !self.extensions.iter().any(|(ext, _)| ext.id == *uri) {
                results.syntax(format!("Undefined schema URI '{}'", uri));
            }
        }

        for (extension, ext_required) in &self.extensions {
            if *ext_required && !uris.iter().any(|uri| *uri == extension.id) {
                results.syntax(format!(
                    "Required schema extension '{}' is missing from 'schemas'",
                    extension.id
                ));
            }
        }
    }

    // ---- patch operation checking ------------------------------------

    fn check_operation(
        &self,
        op: &PatchOperation,
        current: Option<&Value>,
        results: &mut Results,
    ) -> ScimResult<()> {
        let path = op.path_or_root();

        let definition = match self.resolve_definition(&path) {
            Ok(def) => def,
            Err(issue) => {
                results.path(issue);
                return Ok(());
            }
        };

        match op.op {
            PatchOpKind::Remove => self.check_remove(&path, definition, results),
            PatchOpKind::Add | PatchOpKind::Replace => {
                let Some(value) = op.value.as_ref() else {
                    results.syntax(format!(
                        "Patch {} operation on '{}' requires a value",
                        kind_name(op.op),
                        path
                    ));
                    return Ok(());
                };
                match definition {
                    None => self.check_partial(&path, value, results)?,
                    Some(attr) => {
                        self.check_targeted_update(op.op, &path, attr, value, current, results);
                    }
                }
            }
        }
        Ok(())
    }

    fn check_remove(
        &self,
        path: &Path,
        definition: Option<&AttributeDefinition>,
        results: &mut Results,
    ) {
        let Some(attr) = definition else {
            results.path("Patch remove operation requires an attribute path".to_string());
            return;
        };

        match attr.mutability {
            Mutability::ReadOnly => {
                results.mutability(format!(
                    "Attribute '{}' is read-only and cannot be removed",
                    path
                ));
            }
            Mutability::Immutable => {
                results.mutability(format!(
                    "Attribute '{}' is immutable and cannot be removed",
                    path
                ));
            }
            _ => {}
        }

        // Removing every value of a required attribute is invalid; with a
        // value filter only a subset is targeted, which may be fine.
        let has_filter = path
            .elements()
            .last()
            .is_some_and(|element| element.filter().is_some());
        if attr.required && !has_filter {
            results.syntax(format!(
                "Attribute '{}' is required and cannot be removed",
                path
            ));
        }
    }

    /// Add/replace with a resolvable target attribute: mutability plus
    /// type/canonical conformance of the supplied value.
    fn check_targeted_update(
        &self,
        kind: PatchOpKind,
        path: &Path,
        attr: &AttributeDefinition,
        value: &Value,
        current: Option<&Value>,
        results: &mut Results,
    ) {
        match attr.mutability {
            Mutability::ReadOnly => {
                results.mutability(format!(
                    "Attribute '{}' is read-only and cannot be modified",
                    path
                ));
            }
            Mutability::Immutable => {
                if let Some(current) = current {
                    let existing = traverse::get_values(current, path).unwrap_or_default();
                    let differs = existing
                        .iter()
                        .any(|cur| !cur.is_null() && cur != value);
                    if differs {
                        results.mutability(format!(
                            "Attribute '{}' is immutable and already has a value",
                            path
                        ));
                    }
                }
            }
            _ => {}
        }

        let mut working = value.clone();
        let has_filter = path
            .elements()
            .last()
            .is_some_and(|element| element.filter().is_some());

        if attr.multi_valued && has_filter {
            // A filtered update supplies one entry's worth of value, merged
            // into each selected entry.
            self.check_single_value(&path.to_string(), attr, &mut working, false, None, results);
        } else if attr.multi_valued && !working.is_array() && kind == PatchOpKind::Add {
            // Add accepts a bare entry and appends it.
            self.check_single_value(&path.to_string(), attr, &mut working, false, None, results);
        } else {
            self.check_value(&path.to_string(), attr, &mut working, false, None, results);
        }
    }

    /// A pathless (or extension-namespace-root) add/replace carries a
    /// partial resource: same attribute/value logic as a create check but
    /// with required-attribute checks skipped.
    fn check_partial(&self, path: &Path, value: &Value, results: &mut Results) -> ScimResult<()> {
        if !value.is_object() {
            results.syntax(format!(
                "Patch value for '{}' must be a JSON object, got {}",
                path,
                json_kind(value)
            ));
            return Ok(());
        }

        match path.schema_urn() {
            Some(urn) => {
                let Some((extension, _)) = self
                    .extensions
                    .iter()
                    .find(|(ext, _)| ext.id.eq_ignore_ascii_case(urn))
                else {
                    results.path(format!("Undefined schema URI '{}'", urn));
                    return Ok(());
                };
                let mut working = value.clone();
                let obj = working.as_object_mut().expect("checked above");
                self.check_namespace(
                    obj,
                    &extension.id,
                    ':',
                    &extension.attributes,
                    false,
                    None,
                    results,
                );
                for key in obj.keys() {
                    if extension.find_attribute(key).is_none() {
                        results.syntax(format!(
                            "Undefined attribute '{}:{}'",
                            extension.id, key
                        ));
                    }
                }
                Ok(())
            }
            None => self.check_resource(value, false, None, results),
        }
    }

    /// Resolve the attribute definition a path addresses, or the issue
    /// string explaining why it does not resolve. `Ok(None)` is the
    /// resource (or extension namespace) root.
    fn resolve_definition(&self, path: &Path) -> Result<Option<&AttributeDefinition>, String> {
        let namespace: &SchemaResource = match path.schema_urn() {
            None => &self.core,
            Some(urn) if urn.eq_ignore_ascii_case(&self.core.id) => &self.core,
            Some(urn) => {
                self.extensions
                    .iter()
                    .find(|(ext, _)| ext.id.eq_ignore_ascii_case(urn))
                    .map(|(ext, _)| ext)
                    .ok_or_else(|| format!("Path '{}' references undefined schema '{}'", path, urn))?
            }
        };

        let mut elements = path.elements().iter();
        let Some(first) = elements.next() else {
            return Ok(None);
        };

        let mut definition = namespace.find_attribute(first.attribute()).ok_or_else(|| {
            format!(
                "Path '{}' references undefined attribute '{}'",
                path,
                first.attribute()
            )
        })?;

        for element in elements {
            definition = definition
                .find_sub_attribute(element.attribute())
                .ok_or_else(|| {
                    format!(
                        "Path '{}' references undefined sub-attribute '{}'",
                        path,
                        element.attribute()
                    )
                })?;
        }

        Ok(Some(definition))
    }
}

// ---- helpers ---------------------------------------------------------

fn find_key(obj: &Map<String, Value>, name: &str) -> Option<String> {
    obj.keys()
        .find(|key| key.eq_ignore_ascii_case(name))
        .cloned()
}

fn join_path(prefix: &str, separator: char, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", prefix, separator, name)
    }
}

fn kind_name(kind: PatchOpKind) -> &'static str {
    match kind {
        PatchOpKind::Add => "add",
        PatchOpKind::Remove => "remove",
        PatchOpKind::Replace => "replace",
    }
}

fn type_mismatch(attr_path: &str, attr: &AttributeDefinition, value: &Value) -> String {
    format!(
        "Attribute '{}' has invalid type: expected {}, got {}",
        attr_path,
        attr.data_type.as_str(),
        json_kind(value)
    )
}

/// The JSON node kind name for error messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "decimal",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Basic URI scheme validation sufficient for SCIM reference checking.
fn is_valid_uri(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value.contains("://") || value.starts_with("urn:") || value.starts_with('/')
}

fn strip_read_only(obj: &mut Map<String, Value>, attributes: &[AttributeDefinition]) {
    for attr in attributes {
        let Some(key) = find_key(obj, &attr.name) else {
            continue;
        };
        if attr.mutability == Mutability::ReadOnly {
            obj.remove(&key);
            continue;
        }
        if attr.data_type == AttributeType::Complex {
            match obj.get_mut(&key) {
                Some(Value::Object(child)) => strip_read_only(child, attr.sub_attributes()),
                Some(Value::Array(items)) => {
                    for item in items {
                        if let Some(child) = item.as_object_mut() {
                            strip_read_only(child, attr.sub_attributes());
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests;
