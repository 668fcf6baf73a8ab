//! Listing normalization.
//!
//! Raw az listing JSON is heterogeneous per category; everything leaves
//! this module as the uniform [`Resource`] shape with deterministic
//! ordering. An empty or blank listing is a valid empty collection, not an
//! error; only malformed JSON fails.

use std::collections::HashMap;
use std::sync::OnceLock;

use azlens_core::{AZURE_AD_LOCATION, ObjectCategory, Resource, UNKNOWN};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::QueryError;

// ============================================================================
// Resource Group Extraction
// ============================================================================

/// Matches the path segment following `/resourceGroups/` in an ARM id.
/// ARM ids are case-insensitive; the captured name keeps its casing.
fn resource_group_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)/resourcegroups/([^/]+)").unwrap())
}

/// Extracts the resource group from an ARM resource id.
pub fn resource_group_from_id(id: &str) -> Option<String> {
    resource_group_regex()
        .captures(id)
        .map(|c| c[1].to_string())
}

// ============================================================================
// Cloud Resources
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawResource {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default, rename = "resourceGroup")]
    resource_group: Option<String>,
    #[serde(default)]
    tags: Option<HashMap<String, Value>>,
}

/// Normalizes an `az resource list` payload.
///
/// Sorted by `(resource_group, name)` ascending, byte order.
pub fn parse_resources(raw: &str) -> Result<Vec<Resource>, QueryError> {
    let Some(rows) = parse_listing::<RawResource>(raw)? else {
        return Ok(Vec::new());
    };

    let mut resources: Vec<Resource> = rows
        .into_iter()
        .map(|r| {
            let id = r.id.unwrap_or_default();
            let resource_group = r
                .resource_group
                .filter(|g| !g.is_empty())
                .or_else(|| resource_group_from_id(&id))
                .unwrap_or_else(|| UNKNOWN.to_string());

            Resource {
                name: r.name.filter(|n| !n.is_empty()).unwrap_or_else(|| UNKNOWN.to_string()),
                resource_type: r.kind.unwrap_or_else(|| UNKNOWN.to_string()),
                location: r.location.filter(|l| !l.is_empty()).unwrap_or_else(|| UNKNOWN.to_string()),
                resource_group,
                tags: r.tags.map(coerce_tags).unwrap_or_default(),
                properties: Map::new(),
                id,
            }
        })
        .collect();

    resources.sort_by(|a, b| {
        (a.resource_group.as_str(), a.name.as_str()).cmp(&(b.resource_group.as_str(), b.name.as_str()))
    });
    Ok(resources)
}

/// Tag values arrive as arbitrary JSON; non-strings are rendered compactly.
fn coerce_tags(tags: HashMap<String, Value>) -> HashMap<String, String> {
    tags.into_iter()
        .filter_map(|(k, v)| match v {
            Value::Null => None,
            Value::String(s) => Some((k, s)),
            other => Some((k, other.to_string())),
        })
        .collect()
}

// ============================================================================
// Directory Objects
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawApp {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "appId")]
    app_id: Option<String>,
    #[serde(default, rename = "displayName")]
    display_name: Option<String>,
    #[serde(default, rename = "signInAudience")]
    sign_in_audience: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "displayName")]
    display_name: Option<String>,
    #[serde(default, rename = "userPrincipalName")]
    user_principal_name: Option<String>,
    #[serde(default)]
    mail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "displayName")]
    display_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRoleAssignment {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "roleDefinitionName")]
    role_definition_name: Option<String>,
    #[serde(default, rename = "principalName")]
    principal_name: Option<String>,
    #[serde(default, rename = "principalId")]
    principal_id: Option<String>,
    #[serde(default, rename = "principalType")]
    principal_type: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

/// Normalizes one directory-object category.
pub fn parse_directory_objects(
    category: ObjectCategory,
    raw: &str,
) -> Result<Vec<Resource>, QueryError> {
    match category {
        ObjectCategory::Applications => parse_app_registrations(raw),
        ObjectCategory::Users => parse_users(raw),
        ObjectCategory::Groups => parse_groups(raw),
        ObjectCategory::RoleAssignments => parse_role_assignments(raw),
    }
}

/// Normalizes `az ad app list`. Name chain: displayName, appId, "Unknown".
pub fn parse_app_registrations(raw: &str) -> Result<Vec<Resource>, QueryError> {
    let Some(rows) = parse_listing::<RawApp>(raw)? else {
        return Ok(Vec::new());
    };

    let mut apps: Vec<Resource> = rows
        .into_iter()
        .map(|a| {
            let object_id = a.id.or_else(|| a.app_id.clone()).unwrap_or_default();
            let name = a
                .display_name
                .filter(|n| !n.is_empty())
                .or_else(|| a.app_id.clone())
                .unwrap_or_else(|| UNKNOWN.to_string());

            let mut properties = Map::new();
            insert_prop(&mut properties, "appId", a.app_id);
            insert_prop(&mut properties, "signInAudience", a.sign_in_audience);

            directory_resource(ObjectCategory::Applications, &object_id, name, properties)
        })
        .collect();

    sort_by_name(&mut apps);
    Ok(apps)
}

/// Normalizes `az ad user list`. Name chain: displayName,
/// userPrincipalName, "Unknown".
pub fn parse_users(raw: &str) -> Result<Vec<Resource>, QueryError> {
    let Some(rows) = parse_listing::<RawUser>(raw)? else {
        return Ok(Vec::new());
    };

    let mut users: Vec<Resource> = rows
        .into_iter()
        .map(|u| {
            let object_id = u.id.unwrap_or_default();
            let name = u
                .display_name
                .filter(|n| !n.is_empty())
                .or_else(|| u.user_principal_name.clone())
                .unwrap_or_else(|| UNKNOWN.to_string());

            let mut properties = Map::new();
            insert_prop(&mut properties, "userPrincipalName", u.user_principal_name);
            insert_prop(&mut properties, "mail", u.mail);

            directory_resource(ObjectCategory::Users, &object_id, name, properties)
        })
        .collect();

    sort_by_name(&mut users);
    Ok(users)
}

/// Normalizes `az ad group list`. Name chain: displayName, "Unknown".
pub fn parse_groups(raw: &str) -> Result<Vec<Resource>, QueryError> {
    let Some(rows) = parse_listing::<RawGroup>(raw)? else {
        return Ok(Vec::new());
    };

    let mut groups: Vec<Resource> = rows
        .into_iter()
        .map(|g| {
            let object_id = g.id.unwrap_or_default();
            let name = g
                .display_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string());

            let mut properties = Map::new();
            insert_prop(&mut properties, "description", g.description);

            directory_resource(ObjectCategory::Groups, &object_id, name, properties)
        })
        .collect();

    sort_by_name(&mut groups);
    Ok(groups)
}

/// Normalizes `az role assignment list`. Name chain: principalName,
/// principalId, "Unknown"; sorted by `(roleDefinitionName, name)`.
pub fn parse_role_assignments(raw: &str) -> Result<Vec<Resource>, QueryError> {
    let Some(rows) = parse_listing::<RawRoleAssignment>(raw)? else {
        return Ok(Vec::new());
    };

    let mut assignments: Vec<Resource> = rows
        .into_iter()
        .map(|ra| {
            let object_id = ra.name.or(ra.id).unwrap_or_default();
            let name = ra
                .principal_name
                .filter(|n| !n.is_empty())
                .or_else(|| ra.principal_id.clone())
                .unwrap_or_else(|| UNKNOWN.to_string());

            let mut properties = Map::new();
            insert_prop(&mut properties, "roleDefinitionName", ra.role_definition_name);
            insert_prop(&mut properties, "principalId", ra.principal_id);
            insert_prop(&mut properties, "principalType", ra.principal_type);
            insert_prop(&mut properties, "scope", ra.scope);

            directory_resource(ObjectCategory::RoleAssignments, &object_id, name, properties)
        })
        .collect();

    assignments.sort_by(|a, b| {
        let role_a = a.property_str("roleDefinitionName").unwrap_or(UNKNOWN);
        let role_b = b.property_str("roleDefinitionName").unwrap_or(UNKNOWN);
        (role_a, a.name.as_str()).cmp(&(role_b, b.name.as_str()))
    });
    Ok(assignments)
}

// ============================================================================
// Helpers
// ============================================================================

/// Parses a listing payload. `Ok(None)` means blank input; malformed JSON
/// is a [`QueryError::Parse`].
fn parse_listing<T: serde::de::DeserializeOwned>(
    raw: &str,
) -> Result<Option<Vec<T>>, QueryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

fn directory_resource(
    category: ObjectCategory,
    object_id: &str,
    name: String,
    properties: Map<String, Value>,
) -> Resource {
    Resource {
        id: category.synthesized_id(object_id),
        name,
        resource_type: category.type_name(),
        location: AZURE_AD_LOCATION.to_string(),
        resource_group: AZURE_AD_LOCATION.to_string(),
        tags: HashMap::new(),
        properties,
    }
}

fn insert_prop(map: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(v) = value {
        map.insert(key.to_string(), Value::String(v));
    }
}

fn sort_by_name(items: &mut [Resource]) {
    items.sort_by(|a, b| a.name.cmp(&b.name));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_group_from_id() {
        let id = "/subscriptions/x/resourceGroups/myRG/providers/Microsoft.Compute/virtualMachines/vm1";
        assert_eq!(resource_group_from_id(id).as_deref(), Some("myRG"));
    }

    #[test]
    fn test_resource_group_case_insensitive_segment() {
        let id = "/subscriptions/x/resourcegroups/Prod-RG/providers/p/t/n";
        assert_eq!(resource_group_from_id(id).as_deref(), Some("Prod-RG"));
    }

    #[test]
    fn test_resource_group_absent() {
        assert_eq!(resource_group_from_id("/subscriptions/x/providers/p"), None);
    }

    #[test]
    fn test_empty_listing_is_not_an_error() {
        assert!(parse_resources("").unwrap().is_empty());
        assert!(parse_resources("  \n").unwrap().is_empty());
        assert!(parse_resources("[]").unwrap().is_empty());
        assert!(parse_users("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_listing_is_a_parse_error() {
        assert!(matches!(
            parse_resources("{not json"),
            Err(QueryError::Parse(_))
        ));
        assert!(matches!(
            parse_groups(r#"{"value": 1}"#),
            Err(QueryError::Parse(_))
        ));
    }

    #[test]
    fn test_resources_sorted_by_group_then_name() {
        let raw = r#"[
            {"id": "/subscriptions/x/resourceGroups/zeta/providers/Microsoft.Web/sites/b",
             "name": "b", "type": "Microsoft.Web/sites", "location": "westeurope"},
            {"id": "/subscriptions/x/resourceGroups/alpha/providers/Microsoft.Web/sites/z",
             "name": "z", "type": "Microsoft.Web/sites", "location": "westeurope"},
            {"id": "/subscriptions/x/resourceGroups/alpha/providers/Microsoft.Web/sites/a",
             "name": "a", "type": "Microsoft.Web/sites", "location": "westeurope"}
        ]"#;

        let resources = parse_resources(raw).unwrap();
        let order: Vec<_> = resources
            .iter()
            .map(|r| (r.resource_group.as_str(), r.name.as_str()))
            .collect();
        assert_eq!(order, [("alpha", "a"), ("alpha", "z"), ("zeta", "b")]);
    }

    #[test]
    fn test_resource_group_falls_back_to_id_then_unknown() {
        let raw = r#"[
            {"id": "/subscriptions/x/resourceGroups/fromId/providers/p/t/n", "name": "n1"},
            {"id": "no-group-here", "name": "n2"}
        ]"#;

        let resources = parse_resources(raw).unwrap();
        assert_eq!(resources[0].resource_group, "fromId");
        assert_eq!(resources[1].resource_group, "Unknown");
    }

    #[test]
    fn test_tags_coerced_to_strings() {
        let raw = r#"[{
            "id": "/subscriptions/x/resourceGroups/rg/providers/p/t/n",
            "name": "n",
            "tags": {"env": "prod", "count": 3, "orphan": null}
        }]"#;

        let resources = parse_resources(raw).unwrap();
        assert_eq!(resources[0].tags.get("env").map(String::as_str), Some("prod"));
        assert_eq!(resources[0].tags.get("count").map(String::as_str), Some("3"));
        assert!(!resources[0].tags.contains_key("orphan"));
    }

    #[test]
    fn test_app_name_fallback_chain() {
        let raw = r#"[
            {"id": "obj-1", "appId": "app-1", "displayName": "My App"},
            {"id": "obj-2", "appId": "app-2", "displayName": ""},
            {"id": "obj-3"}
        ]"#;

        let apps = parse_app_registrations(raw).unwrap();
        let names: Vec<_> = apps.iter().map(|a| a.name.as_str()).collect();
        // Sorted by name ascending.
        assert_eq!(names, ["My App", "Unknown", "app-2"]);
    }

    #[test]
    fn test_app_identity() {
        let raw = r#"[{"id": "obj-1", "appId": "app-1", "displayName": "My App"}]"#;
        let apps = parse_app_registrations(raw).unwrap();

        assert_eq!(apps[0].id, "azure-ad://applications/obj-1");
        assert_eq!(apps[0].resource_type, "Microsoft.AzureAD/applications");
        assert_eq!(apps[0].location, "Azure AD");
        assert_eq!(apps[0].resource_group, "Azure AD");
        assert!(apps[0].tags.is_empty());
        assert_eq!(apps[0].property_str("appId"), Some("app-1"));
    }

    #[test]
    fn test_user_name_falls_back_to_upn() {
        let raw = r#"[
            {"id": "u1", "userPrincipalName": "jane@contoso.com"},
            {"id": "u2", "displayName": "Adam", "userPrincipalName": "adam@contoso.com"}
        ]"#;

        let users = parse_users(raw).unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Adam", "jane@contoso.com"]);
    }

    #[test]
    fn test_sort_is_case_sensitive() {
        // Byte order: uppercase before lowercase, no locale folding.
        let raw = r#"[
            {"id": "g1", "displayName": "alpha"},
            {"id": "g2", "displayName": "Beta"}
        ]"#;

        let groups = parse_groups(raw).unwrap();
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Beta", "alpha"]);
    }

    #[test]
    fn test_role_assignments_sorted_by_role_then_principal() {
        let raw = r#"[
            {"name": "ra1", "roleDefinitionName": "Reader", "principalName": "zoe@contoso.com"},
            {"name": "ra2", "roleDefinitionName": "Contributor", "principalName": "bob@contoso.com"},
            {"name": "ra3", "roleDefinitionName": "Reader", "principalName": "amy@contoso.com"}
        ]"#;

        let assignments = parse_role_assignments(raw).unwrap();
        let order: Vec<_> = assignments
            .iter()
            .map(|a| {
                (
                    a.property_str("roleDefinitionName").unwrap().to_string(),
                    a.name.clone(),
                )
            })
            .collect();

        assert_eq!(
            order,
            [
                ("Contributor".to_string(), "bob@contoso.com".to_string()),
                ("Reader".to_string(), "amy@contoso.com".to_string()),
                ("Reader".to_string(), "zoe@contoso.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_unique_ids_within_snapshot() {
        let raw = r#"[
            {"id": "u1", "displayName": "A"},
            {"id": "u2", "displayName": "B"}
        ]"#;

        let users = parse_users(raw).unwrap();
        assert_ne!(users[0].id, users[1].id);
    }
}
