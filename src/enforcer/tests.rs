use super::*;
use crate::schema::{AttributeDefinition, AttributeType, SchemaRegistry};
use serde_json::json;

const USER_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
const ENTERPRISE_URN: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

fn user_enforcer() -> SchemaEnforcer {
    let registry = SchemaRegistry::new().unwrap();
    let core = registry.require_schema(USER_URN).unwrap().clone();
    let enterprise = registry.require_schema(ENTERPRISE_URN).unwrap().clone();
    SchemaEnforcer::new(core, vec![(enterprise, false)]).unwrap()
}

fn custom_enforcer(attributes: Vec<AttributeDefinition>) -> SchemaEnforcer {
    let core = SchemaResource {
        id: "urn:example:schemas:Custom".to_string(),
        name: "Custom".to_string(),
        description: String::new(),
        attributes,
    };
    SchemaEnforcer::new(core, Vec::new()).unwrap()
}

fn ops(value: serde_json::Value) -> Vec<PatchOperation> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_create_minimal_valid_user() {
    let enforcer = user_enforcer();
    let doc = json!({"schemas": [USER_URN], "userName": "bjensen"});
    let results = enforcer.check_create(&doc).unwrap();
    assert!(results.is_empty(), "{:?}", results);
}

#[test]
fn test_create_missing_required_attribute() {
    let enforcer = user_enforcer();
    let doc = json!({"schemas": [USER_URN], "displayName": "Babs"});
    let results = enforcer.check_create(&doc).unwrap();
    assert_eq!(results.syntax_issues().len(), 1);
    assert!(results.syntax_issues()[0].contains("userName"));

    // Adding the attribute with any valid value clears the issue
    let doc = json!({"schemas": [USER_URN], "userName": "x", "displayName": "Babs"});
    assert!(enforcer.check_create(&doc).unwrap().is_empty());
}

#[test]
fn test_create_missing_schemas_attribute() {
    let enforcer = user_enforcer();
    let doc = json!({"userName": "bjensen"});
    let results = enforcer.check_create(&doc).unwrap();
    assert!(
        results
            .syntax_issues()
            .iter()
            .any(|issue| issue.contains("schemas"))
    );
}

#[test]
fn test_create_schemas_must_include_core() {
    let enforcer = user_enforcer();
    let doc = json!({"schemas": [ENTERPRISE_URN], "userName": "bjensen"});
    let results = enforcer.check_create(&doc).unwrap();
    assert!(
        results
            .syntax_issues()
            .iter()
            .any(|issue| issue.contains(USER_URN))
    );
}

#[test]
fn test_create_unknown_schema_uri() {
    let enforcer = user_enforcer();
    let doc = json!({
        "schemas": [USER_URN, "urn:example:unknown"],
        "userName": "bjensen"
    });
    let results = enforcer.check_create(&doc).unwrap();
    assert!(
        results
            .syntax_issues()
            .iter()
            .any(|issue| issue.contains("urn:example:unknown"))
    );
}

#[test]
fn test_create_required_extension_must_be_listed() {
    let registry = SchemaRegistry::new().unwrap();
    let core = registry.require_schema(USER_URN).unwrap().clone();
    let enterprise = registry.require_schema(ENTERPRISE_URN).unwrap().clone();
    let enforcer = SchemaEnforcer::new(core, vec![(enterprise, true)]).unwrap();

    let doc = json!({"schemas": [USER_URN], "userName": "bjensen"});
    let results = enforcer.check_create(&doc).unwrap();
    assert!(
        results
            .syntax_issues()
            .iter()
            .any(|issue| issue.contains(ENTERPRISE_URN))
    );
}

#[test]
fn test_create_undefined_attribute_flagged_not_fatal() {
    let enforcer = user_enforcer();
    let doc = json!({
        "schemas": [USER_URN],
        "userName": "bjensen",
        "favoriteColor": "teal"
    });
    let results = enforcer.check_create(&doc).unwrap();
    assert!(
        results
            .syntax_issues()
            .iter()
            .any(|issue| issue.contains("favoriteColor"))
    );
    // Caller-owned document is untouched
    assert_eq!(doc["favoriteColor"], json!("teal"));
}

#[test]
fn test_create_type_mismatch() {
    let enforcer = user_enforcer();
    let doc = json!({"schemas": [USER_URN], "userName": "bjensen", "active": "yes"});
    let results = enforcer.check_create(&doc).unwrap();
    assert!(
        results
            .syntax_issues()
            .iter()
            .any(|issue| issue.contains("active") && issue.contains("boolean"))
    );
}

#[test]
fn test_create_single_valued_rejects_array() {
    let enforcer = user_enforcer();
    let doc = json!({"schemas": [USER_URN], "userName": ["a", "b"]});
    let results = enforcer.check_create(&doc).unwrap();
    assert!(
        results
            .syntax_issues()
            .iter()
            .any(|issue| issue.contains("userName") && issue.contains("single-valued"))
    );
}

#[test]
fn test_create_multi_valued_requires_array() {
    let enforcer = user_enforcer();
    let doc = json!({
        "schemas": [USER_URN],
        "userName": "bjensen",
        "emails": {"value": "a@b.com"}
    });
    let results = enforcer.check_create(&doc).unwrap();
    assert!(
        results
            .syntax_issues()
            .iter()
            .any(|issue| issue.contains("emails") && issue.contains("array"))
    );
}

#[test]
fn test_create_canonical_value_enforcement() {
    let enforcer = user_enforcer();
    let bad = json!({
        "schemas": [USER_URN],
        "userName": "bjensen",
        "emails": [{"value": "a@b.com", "type": "invalid"}]
    });
    let results = enforcer.check_create(&bad).unwrap();
    assert!(
        results
            .syntax_issues()
            .iter()
            .any(|issue| issue.contains("emails.type"))
    );

    // Accepted case-insensitively since the attribute is not case-exact
    let ok = json!({
        "schemas": [USER_URN],
        "userName": "bjensen",
        "emails": [{"value": "a@b.com", "type": "WORK"}]
    });
    assert!(enforcer.check_create(&ok).unwrap().is_empty());
}

#[test]
fn test_canonical_case_exact() {
    let enforcer = custom_enforcer(vec![
        AttributeDefinition {
            case_exact: true,
            canonical_values: vec!["work".to_string(), "home".to_string()],
            ..AttributeDefinition::simple("kind", AttributeType::String)
        },
    ]);
    let results = enforcer
        .check_create(&json!({
            "schemas": ["urn:example:schemas:Custom"],
            "kind": "Work"
        }))
        .unwrap();
    assert_eq!(results.syntax_issues().len(), 1);
}

#[test]
fn test_secondary_format_checks() {
    let enforcer = custom_enforcer(vec![
        AttributeDefinition::simple("when", AttributeType::DateTime),
        AttributeDefinition::simple("blob", AttributeType::Binary),
        AttributeDefinition::simple("link", AttributeType::Reference),
        AttributeDefinition::simple("count", AttributeType::Integer),
    ]);
    let doc = json!({
        "schemas": ["urn:example:schemas:Custom"],
        "when": "not-a-date",
        "blob": "!!not base64!!",
        "link": "no scheme here",
        "count": 1.5
    });
    let results = enforcer.check_create(&doc).unwrap();
    // All four problems reported in one pass
    assert_eq!(results.syntax_issues().len(), 4, "{:?}", results);

    let ok = json!({
        "schemas": ["urn:example:schemas:Custom"],
        "when": "2011-05-13T04:42:34Z",
        "blob": "aGVsbG8=",
        "link": "https://example.com/Users/123",
        "count": 7
    });
    assert!(enforcer.check_create(&ok).unwrap().is_empty());
}

#[test]
fn test_create_read_only_flagged_and_strippable() {
    let enforcer = user_enforcer();
    let doc = json!({
        "schemas": [USER_URN],
        "userName": "bjensen",
        "id": "2819c223",
        "meta": {"resourceType": "User"}
    });
    let results = enforcer.check_create(&doc).unwrap();
    assert!(
        results
            .mutability_issues()
            .iter()
            .any(|issue| issue.contains("id"))
    );
    assert!(
        results
            .mutability_issues()
            .iter()
            .any(|issue| issue.contains("meta"))
    );

    let stripped = enforcer.remove_read_only_attributes(&doc);
    assert!(stripped.get("id").is_none());
    assert!(stripped.get("meta").is_none());
    assert!(enforcer.check_create(&stripped).unwrap().is_empty());
}

#[test]
fn test_replace_immutable_protection() {
    let enforcer = custom_enforcer(vec![
        AttributeDefinition {
            mutability: Mutability::Immutable,
            ..AttributeDefinition::simple("handle", AttributeType::String)
        },
    ]);
    let current = json!({"schemas": ["urn:example:schemas:Custom"], "handle": "original"});

    let changed = json!({"schemas": ["urn:example:schemas:Custom"], "handle": "different"});
    let results = enforcer.check_replace(&changed, Some(&current)).unwrap();
    assert_eq!(results.mutability_issues().len(), 1);
    assert!(results.mutability_issues()[0].contains("handle"));

    // The same value is not a violation, and neither is no current resource
    let same = json!({"schemas": ["urn:example:schemas:Custom"], "handle": "original"});
    assert!(enforcer.check_replace(&same, Some(&current)).unwrap().is_empty());
    assert!(enforcer.check_replace(&changed, None).unwrap().is_empty());
}

#[test]
fn test_extension_namespace_checking() {
    let enforcer = user_enforcer();
    let doc = json!({
        "schemas": [USER_URN, ENTERPRISE_URN],
        "userName": "bjensen",
        ENTERPRISE_URN: {
            "employeeNumber": "701984",
            "bogus": true
        }
    });
    let results = enforcer.check_create(&doc).unwrap();
    assert_eq!(results.syntax_issues().len(), 1);
    assert!(results.syntax_issues()[0].contains("bogus"));
}

#[test]
fn test_modify_remove_required_attribute() {
    let enforcer = user_enforcer();
    let results = enforcer
        .check_modify(&ops(json!([{"op": "remove", "path": "userName"}])), None)
        .unwrap();
    assert_eq!(results.syntax_issues().len(), 1);
    assert!(results.syntax_issues()[0].contains("userName"));
}

#[test]
fn test_modify_remove_optional_attribute() {
    let enforcer = user_enforcer();
    let current = json!({"schemas": [USER_URN], "userName": "bjensen", "nickName": "Babs"});
    let results = enforcer
        .check_modify(
            &ops(json!([{"op": "remove", "path": "nickName"}])),
            Some(&current),
        )
        .unwrap();
    assert!(results.is_empty(), "{:?}", results);
}

#[test]
fn test_modify_remove_read_only() {
    let enforcer = user_enforcer();
    let results = enforcer
        .check_modify(&ops(json!([{"op": "remove", "path": "groups"}])), None)
        .unwrap();
    assert_eq!(results.mutability_issues().len(), 1);
}

#[test]
fn test_modify_unresolvable_path() {
    let enforcer = user_enforcer();
    let results = enforcer
        .check_modify(
            &ops(json!([{"op": "replace", "path": "noSuchThing", "value": 1}])),
            None,
        )
        .unwrap();
    assert_eq!(results.path_issues().len(), 1);
    assert!(results.path_issues()[0].contains("noSuchThing"));
}

#[test]
fn test_modify_filtered_replace_applies_to_one_entry() {
    let enforcer = user_enforcer();
    let current = json!({
        "schemas": [USER_URN],
        "userName": "bjensen",
        "emails": [
            {"value": "old@example.com", "type": "work"},
            {"value": "babs@jensen.org", "type": "home"}
        ]
    });
    let results = enforcer
        .check_modify(
            &ops(json!([{
                "op": "replace",
                "path": "emails[type eq \"work\"].value",
                "value": "new@example.com"
            }])),
            Some(&current),
        )
        .unwrap();
    assert!(results.is_empty(), "{:?}", results);
}

#[test]
fn test_modify_filtered_replace_with_no_match_is_benign() {
    let enforcer = user_enforcer();
    let current = json!({
        "schemas": [USER_URN],
        "userName": "bjensen",
        "emails": [{"value": "babs@jensen.org", "type": "home"}]
    });
    // The tentative apply hits the no-target condition, which check_modify
    // swallows; classification itself finds nothing wrong.
    let results = enforcer
        .check_modify(
            &ops(json!([{
                "op": "replace",
                "path": "emails[type eq \"work\"].value",
                "value": "new@example.com"
            }])),
            Some(&current),
        )
        .unwrap();
    assert!(results.is_empty(), "{:?}", results);
}

#[test]
fn test_modify_replace_value_type_checked() {
    let enforcer = user_enforcer();
    let results = enforcer
        .check_modify(
            &ops(json!([{"op": "replace", "path": "active", "value": "yes"}])),
            None,
        )
        .unwrap();
    assert!(
        results
            .syntax_issues()
            .iter()
            .any(|issue| issue.contains("active"))
    );
}

#[test]
fn test_modify_replace_read_only() {
    let enforcer = user_enforcer();
    let results = enforcer
        .check_modify(
            &ops(json!([{"op": "replace", "path": "id", "value": "new-id"}])),
            None,
        )
        .unwrap();
    assert_eq!(results.mutability_issues().len(), 1);
}

#[test]
fn test_modify_pathless_add_is_partial_check() {
    let enforcer = user_enforcer();
    // No userName here; a partial add need not carry required attributes
    let results = enforcer
        .check_modify(
            &ops(json!([{"op": "add", "value": {"displayName": "Babs Jensen"}}])),
            None,
        )
        .unwrap();
    assert!(results.is_empty(), "{:?}", results);

    // But undefined attributes are still flagged
    let results = enforcer
        .check_modify(
            &ops(json!([{"op": "add", "value": {"favoriteColor": "teal"}}])),
            None,
        )
        .unwrap();
    assert_eq!(results.syntax_issues().len(), 1);
}

#[test]
fn test_modify_extension_urn_path() {
    let enforcer = user_enforcer();
    let results = enforcer
        .check_modify(
            &ops(json!([{
                "op": "add",
                "path": format!("{}:employeeNumber", ENTERPRISE_URN),
                "value": "701984"
            }])),
            None,
        )
        .unwrap();
    assert!(results.is_empty(), "{:?}", results);

    let results = enforcer
        .check_modify(
            &ops(json!([{
                "op": "add",
                "path": format!("{}:employeeNumber", ENTERPRISE_URN),
                "value": 42
            }])),
            None,
        )
        .unwrap();
    assert_eq!(results.syntax_issues().len(), 1);
}

#[test]
fn test_modify_operations_apply_sequentially() {
    let enforcer = user_enforcer();
    let current = json!({"schemas": [USER_URN], "userName": "bjensen"});
    // The remove targets an attribute only the preceding add creates; the
    // tentative apply must see the earlier operation's effect.
    let results = enforcer
        .check_modify(
            &ops(json!([
                {"op": "add", "path": "nickName", "value": "Babs"},
                {"op": "remove", "path": "nickName"}
            ])),
            Some(&current),
        )
        .unwrap();
    assert!(results.is_empty(), "{:?}", results);
}

#[test]
fn test_modify_end_state_recheck_catches_indirect_violation() {
    let enforcer = custom_enforcer(vec![
        AttributeDefinition {
            multi_valued: true,
            required: true,
            ..AttributeDefinition::complex(
                "tags",
                vec![
                    AttributeDefinition::simple("value", AttributeType::String),
                    AttributeDefinition::simple("type", AttributeType::String),
                ],
            )
        },
    ]);
    let current = json!({
        "schemas": ["urn:example:schemas:Custom"],
        "tags": [{"value": "a", "type": "work"}]
    });
    // The filtered remove passes classification (it targets a subset), but
    // it happens to delete the only value of a required attribute.
    let results = enforcer
        .check_modify(
            &ops(json!([{"op": "remove", "path": "tags[type eq \"work\"]"}])),
            Some(&current),
        )
        .unwrap();
    assert!(
        results
            .syntax_issues()
            .iter()
            .any(|issue| issue.contains("tags")),
        "{:?}",
        results
    );
}

#[test]
fn test_modify_add_appends_bare_entry() {
    let enforcer = user_enforcer();
    let current = json!({
        "schemas": [USER_URN],
        "userName": "bjensen",
        "emails": [{"value": "a@b.com", "type": "home"}]
    });
    let results = enforcer
        .check_modify(
            &ops(json!([{
                "op": "add",
                "path": "emails",
                "value": {"value": "b@c.com", "type": "work"}
            }])),
            Some(&current),
        )
        .unwrap();
    assert!(results.is_empty(), "{:?}", results);
}

#[test]
fn test_modify_add_bare_entry_to_absent_attribute() {
    let enforcer = user_enforcer();
    // No emails yet; the applied state must hold a one-element array, not
    // the entry object itself, or the end-state recheck rejects it.
    let current = json!({"schemas": [USER_URN], "userName": "bjensen"});
    let results = enforcer
        .check_modify(
            &ops(json!([{
                "op": "add",
                "path": "emails",
                "value": {"value": "b@c.com", "type": "work"}
            }])),
            Some(&current),
        )
        .unwrap();
    assert!(results.is_empty(), "{:?}", results);
}

#[test]
fn test_enforcer_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SchemaEnforcer>();
}
