//! The uniform resource entity.
//!
//! Both deployed cloud resources and Azure AD directory objects are
//! represented by [`Resource`] so that the presentation layer can treat
//! every listing the same way. Directory objects have no native ARM id
//! path; they get a synthesized `azure-ad://<category>/<object-id>` id.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Object Category
// ============================================================================

/// The directory-object categories fetched alongside cloud resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectCategory {
    /// App registrations (`az ad app list`).
    Applications,
    /// Users (`az ad user list`).
    Users,
    /// Groups (`az ad group list`).
    Groups,
    /// Role assignments (`az role assignment list`).
    RoleAssignments,
}

impl ObjectCategory {
    /// All categories, in fetch order.
    pub const ALL: [ObjectCategory; 4] = [
        ObjectCategory::Applications,
        ObjectCategory::Users,
        ObjectCategory::Groups,
        ObjectCategory::RoleAssignments,
    ];

    /// The path segment used in synthesized ids and type strings.
    pub fn segment(&self) -> &'static str {
        match self {
            Self::Applications => "applications",
            Self::Users => "users",
            Self::Groups => "groups",
            Self::RoleAssignments => "roleAssignments",
        }
    }

    /// Returns the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Applications => "App Registrations",
            Self::Users => "Users",
            Self::Groups => "Groups",
            Self::RoleAssignments => "Role Assignments",
        }
    }

    /// Synthesizes the stable URI-style id for a directory object.
    pub fn synthesized_id(&self, object_id: &str) -> String {
        format!("azure-ad://{}/{}", self.segment(), object_id)
    }

    /// The fully-qualified type string for this category.
    pub fn type_name(&self) -> String {
        format!("Microsoft.AzureAD/{}", self.segment())
    }
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Resource
// ============================================================================

/// Location string used for every directory object.
pub const AZURE_AD_LOCATION: &str = "Azure AD";

/// Fallback string for unresolvable names and resource groups.
pub const UNKNOWN: &str = "Unknown";

/// A uniform entity covering cloud resources and directory objects.
///
/// Instances are created fresh on each successful fetch and are immutable
/// after construction. `id` is unique within one refresh snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Globally unique, stable identifier. Either the native ARM id or a
    /// synthesized `azure-ad://<category>/<id>` URI.
    pub id: String,
    /// Display name, resolved through a per-category fallback chain.
    pub name: String,
    /// Fully-qualified type string (`Microsoft.<Provider>/<kind>` or
    /// `Microsoft.AzureAD/<category>`).
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Geographic region, or `"Azure AD"` for directory objects.
    pub location: String,
    /// Resource group extracted from the ARM id path, or `"Azure AD"` /
    /// `"Unknown"`.
    #[serde(rename = "resourceGroup")]
    pub resource_group: String,
    /// Resource tags; always empty for directory objects.
    #[serde(default)]
    pub tags: HashMap<String, String>,
    /// Category-specific fields (appId, userPrincipalName, ...).
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Resource {
    /// Returns true if this entity is a directory object rather than a
    /// deployed cloud resource.
    pub fn is_directory_object(&self) -> bool {
        self.id.starts_with("azure-ad://")
    }

    /// Returns a named string property, if present and non-empty.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_id() {
        let id = ObjectCategory::Users.synthesized_id("abc-123");
        assert_eq!(id, "azure-ad://users/abc-123");

        let id = ObjectCategory::RoleAssignments.synthesized_id("ra-1");
        assert_eq!(id, "azure-ad://roleAssignments/ra-1");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(
            ObjectCategory::Applications.type_name(),
            "Microsoft.AzureAD/applications"
        );
    }

    #[test]
    fn test_is_directory_object() {
        let ad = Resource {
            id: ObjectCategory::Groups.synthesized_id("g1"),
            name: "Engineering".to_string(),
            resource_type: ObjectCategory::Groups.type_name(),
            location: AZURE_AD_LOCATION.to_string(),
            resource_group: AZURE_AD_LOCATION.to_string(),
            tags: HashMap::new(),
            properties: serde_json::Map::new(),
        };
        assert!(ad.is_directory_object());

        let vm = Resource {
            id: "/subscriptions/x/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm1"
                .to_string(),
            name: "vm1".to_string(),
            resource_type: "Microsoft.Compute/virtualMachines".to_string(),
            location: "westeurope".to_string(),
            resource_group: "rg".to_string(),
            tags: HashMap::new(),
            properties: serde_json::Map::new(),
        };
        assert!(!vm.is_directory_object());
    }

    #[test]
    fn test_property_str_skips_empty() {
        let mut props = serde_json::Map::new();
        props.insert("appId".to_string(), serde_json::json!("app-1"));
        props.insert("empty".to_string(), serde_json::json!(""));
        props.insert("number".to_string(), serde_json::json!(42));

        let r = Resource {
            id: "azure-ad://applications/a".to_string(),
            name: "a".to_string(),
            resource_type: ObjectCategory::Applications.type_name(),
            location: AZURE_AD_LOCATION.to_string(),
            resource_group: AZURE_AD_LOCATION.to_string(),
            tags: HashMap::new(),
            properties: props,
        };

        assert_eq!(r.property_str("appId"), Some("app-1"));
        assert_eq!(r.property_str("empty"), None);
        assert_eq!(r.property_str("number"), None);
        assert_eq!(r.property_str("missing"), None);
    }
}
