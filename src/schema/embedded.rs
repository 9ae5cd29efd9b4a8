//! Embedded RFC 7643 core schemas.
//!
//! Provides the core User and Group schemas plus the Enterprise User
//! extension as static JSON, so an enforcer can be configured without any
//! external schema files.

/// Returns the core User schema as a JSON string.
pub fn core_user_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:core:2.0:User",
  "name": "User",
  "description": "User Account",
  "attributes": [
    {"name": "id", "type": "string", "multiValued": false, "required": false,
     "caseExact": true, "mutability": "readOnly", "returned": "always", "uniqueness": "server"},
    {"name": "externalId", "type": "string", "multiValued": false, "required": false,
     "caseExact": true, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "userName", "type": "string", "multiValued": false, "required": true,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "server"},
    {"name": "name", "type": "complex", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none",
     "subAttributes": [
       {"name": "formatted", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "familyName", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "givenName", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "middleName", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "honorificPrefix", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "honorificSuffix", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"}
     ]},
    {"name": "displayName", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "nickName", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "profileUrl", "type": "reference", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "title", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "userType", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "preferredLanguage", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "locale", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "timezone", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "active", "type": "boolean", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "password", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "writeOnly", "returned": "never", "uniqueness": "none"},
    {"name": "emails", "type": "complex", "multiValued": true, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none",
     "subAttributes": [
       {"name": "value", "type": "string", "multiValued": false, "required": true,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "display", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "type", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none",
        "canonicalValues": ["work", "home", "other"]},
       {"name": "primary", "type": "boolean", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"}
     ]},
    {"name": "phoneNumbers", "type": "complex", "multiValued": true, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none",
     "subAttributes": [
       {"name": "value", "type": "string", "multiValued": false, "required": true,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "type", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none",
        "canonicalValues": ["work", "home", "mobile", "fax", "pager", "other"]},
       {"name": "primary", "type": "boolean", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"}
     ]},
    {"name": "addresses", "type": "complex", "multiValued": true, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none",
     "subAttributes": [
       {"name": "formatted", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "streetAddress", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "locality", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "region", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "postalCode", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "country", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "type", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none",
        "canonicalValues": ["work", "home", "other"]}
     ]},
    {"name": "groups", "type": "complex", "multiValued": true, "required": false,
     "caseExact": false, "mutability": "readOnly", "returned": "default", "uniqueness": "none",
     "subAttributes": [
       {"name": "value", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readOnly", "returned": "default", "uniqueness": "none"},
       {"name": "$ref", "type": "reference", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readOnly", "returned": "default", "uniqueness": "none"},
       {"name": "display", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readOnly", "returned": "default", "uniqueness": "none"}
     ]},
    {"name": "meta", "type": "complex", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readOnly", "returned": "default", "uniqueness": "none",
     "subAttributes": [
       {"name": "resourceType", "type": "string", "multiValued": false, "required": false,
        "caseExact": true, "mutability": "readOnly", "returned": "default", "uniqueness": "none"},
       {"name": "created", "type": "dateTime", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readOnly", "returned": "default", "uniqueness": "none"},
       {"name": "lastModified", "type": "dateTime", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readOnly", "returned": "default", "uniqueness": "none"},
       {"name": "location", "type": "reference", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readOnly", "returned": "default", "uniqueness": "none"},
       {"name": "version", "type": "string", "multiValued": false, "required": false,
        "caseExact": true, "mutability": "readOnly", "returned": "default", "uniqueness": "none"}
     ]}
  ]
}"#
}

/// Returns the core Group schema as a JSON string.
pub fn core_group_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:core:2.0:Group",
  "name": "Group",
  "description": "Group",
  "attributes": [
    {"name": "id", "type": "string", "multiValued": false, "required": false,
     "caseExact": true, "mutability": "readOnly", "returned": "always", "uniqueness": "server"},
    {"name": "displayName", "type": "string", "multiValued": false, "required": true,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "members", "type": "complex", "multiValued": true, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none",
     "subAttributes": [
       {"name": "value", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "immutable", "returned": "default", "uniqueness": "none"},
       {"name": "$ref", "type": "reference", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "immutable", "returned": "default", "uniqueness": "none"},
       {"name": "type", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "immutable", "returned": "default", "uniqueness": "none",
        "canonicalValues": ["User", "Group"]},
       {"name": "display", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readOnly", "returned": "default", "uniqueness": "none"}
     ]}
  ]
}"#
}

/// Returns the Enterprise User extension schema as a JSON string.
pub fn enterprise_user_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User",
  "name": "EnterpriseUser",
  "description": "Enterprise User",
  "attributes": [
    {"name": "employeeNumber", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "costCenter", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "organization", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "division", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "department", "type": "string", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
    {"name": "manager", "type": "complex", "multiValued": false, "required": false,
     "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none",
     "subAttributes": [
       {"name": "value", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "$ref", "type": "reference", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none"},
       {"name": "displayName", "type": "string", "multiValued": false, "required": false,
        "caseExact": false, "mutability": "readOnly", "returned": "default", "uniqueness": "none"}
     ]}
  ]
}"#
}
