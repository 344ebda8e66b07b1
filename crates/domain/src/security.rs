use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A grant on one action of one resource, named `resource:action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Identifier unique within the permission collection.
    pub id: String,
    /// Display name, conventionally `resource:action`.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// Resource the grant applies to.
    pub resource: String,
    /// Action allowed on the resource.
    pub action: String,
    /// Whether the permission is currently active.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Builds the conventional `resource:action` name.
    #[must_use]
    pub fn qualified_name(resource: &str, action: &str) -> String {
        format!("{resource}:{action}")
    }
}

/// A named bundle of permissions.
///
/// `permissions` holds copies taken when the role was last assigned its
/// grants. Later edits to a permission do not propagate into the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Identifier unique within the role collection.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// Ordered permission snapshots.
    pub permissions: Vec<Permission>,
    /// Whether the role is currently active.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Returns whether the role's snapshot contains the permission id.
    #[must_use]
    pub fn has_permission(&self, permission_id: &str) -> bool {
        self.permissions
            .iter()
            .any(|permission| permission.id == permission_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{Permission, Role};

    fn permission(id: &str, resource: &str, action: &str) -> Permission {
        let stamp = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(|| unreachable!());
        Permission {
            id: id.to_owned(),
            name: Permission::qualified_name(resource, action),
            description: String::new(),
            resource: resource.to_owned(),
            action: action.to_owned(),
            is_active: true,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn qualified_name_joins_resource_and_action() {
        assert_eq!(Permission::qualified_name("users", "read"), "users:read");
    }

    #[test]
    fn role_checks_its_snapshot() {
        let read = permission("1", "users", "read");
        let role = Role {
            id: "1".to_owned(),
            name: "Viewer".to_owned(),
            description: "Read-only access".to_owned(),
            permissions: vec![read.clone()],
            is_active: true,
            created_at: read.created_at,
            updated_at: read.updated_at,
        };

        assert!(role.has_permission("1"));
        assert!(!role.has_permission("2"));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(permission("1", "users", "read"));
        assert!(value.is_ok());
        let value = value.unwrap_or_default();
        assert_eq!(value["isActive"], serde_json::json!(true));
        assert!(value.get("createdAt").is_some());
    }
}
