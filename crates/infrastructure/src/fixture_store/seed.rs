use chrono::{DateTime, Utc};
use rbac_console_domain::{AuditLogEntry, Permission, Role, User};
use serde_json::{Map, Value, json};

use super::FixtureSeed;

/// Email accepted by the mock login.
pub const DEMO_EMAIL: &str = "admin@demo.com";
/// Password accepted by the mock login.
pub const DEMO_PASSWORD: &str = "demo123";

const EPOCH: &str = "2024-01-01T00:00:00Z";

fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|stamp| stamp.with_timezone(&Utc))
        .unwrap_or_default()
}

fn metadata(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn permission(id: &str, resource: &str, action: &str, description: &str) -> Permission {
    Permission {
        id: id.to_owned(),
        name: Permission::qualified_name(resource, action),
        description: description.to_owned(),
        resource: resource.to_owned(),
        action: action.to_owned(),
        is_active: true,
        created_at: at(EPOCH),
        updated_at: at(EPOCH),
    }
}

fn role(id: &str, name: &str, description: &str, permissions: Vec<Permission>) -> Role {
    Role {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        permissions,
        is_active: true,
        created_at: at(EPOCH),
        updated_at: at(EPOCH),
    }
}

struct UserRow<'a> {
    id: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    role: &'a Role,
    is_active: bool,
    last_login: &'a str,
    created_at: &'a str,
    updated_at: &'a str,
}

impl UserRow<'_> {
    fn build(self) -> User {
        User {
            id: self.id.to_owned(),
            first_name: self.first_name.to_owned(),
            last_name: self.last_name.to_owned(),
            email: self.email.to_owned(),
            role: Some(self.role.clone()),
            is_active: self.is_active,
            last_login: Some(at(self.last_login)),
            created_at: at(self.created_at),
            updated_at: at(self.updated_at),
        }
    }
}

fn audit(
    id: &str,
    action: &str,
    resource: &str,
    resource_id: &str,
    (user_id, user_email): (&str, &str),
    details: Value,
    timestamp: &str,
) -> AuditLogEntry {
    AuditLogEntry {
        id: id.to_owned(),
        action: action.to_owned(),
        resource: resource.to_owned(),
        resource_id: resource_id.to_owned(),
        user_id: user_id.to_owned(),
        user_email: user_email.to_owned(),
        metadata: metadata(details),
        timestamp: at(timestamp),
    }
}

fn select(permissions: &[Permission], keep: impl Fn(&Permission) -> bool) -> Vec<Permission> {
    permissions
        .iter()
        .filter(|&permission| keep(permission))
        .cloned()
        .collect()
}

pub(super) fn demo_seed() -> FixtureSeed {
    let permissions = vec![
        permission("1", "users", "read", "View users"),
        permission("2", "users", "write", "Create and edit users"),
        permission("3", "users", "delete", "Delete users"),
        permission("4", "roles", "read", "View roles"),
        permission("5", "roles", "write", "Create and edit roles"),
        permission("6", "permissions", "read", "View permissions"),
        permission("7", "audit", "read", "View audit logs"),
    ];

    let super_admin = role("1", "Super Admin", "Full system access", permissions.clone());
    let admin = role(
        "2",
        "Admin",
        "Administrative access",
        select(&permissions, |p| !p.name.contains("delete")),
    );
    let user_manager = role(
        "3",
        "User Manager",
        "User management access",
        select(&permissions, |p| p.resource == "users"),
    );
    let viewer = role(
        "4",
        "Viewer",
        "Read-only access",
        select(&permissions, |p| p.action == "read"),
    );

    let users = vec![
        UserRow {
            id: "1",
            first_name: "Farah",
            last_name: "Admin",
            email: DEMO_EMAIL,
            role: &super_admin,
            is_active: true,
            last_login: "2024-11-27T10:30:00Z",
            created_at: EPOCH,
            updated_at: "2024-11-27T00:00:00Z",
        }
        .build(),
        UserRow {
            id: "2",
            first_name: "Sophie",
            last_name: "Martin",
            email: "sophie.martin@demo.com",
            role: &admin,
            is_active: true,
            last_login: "2024-11-26T15:45:00Z",
            created_at: "2024-02-15T00:00:00Z",
            updated_at: "2024-11-26T00:00:00Z",
        }
        .build(),
        UserRow {
            id: "3",
            first_name: "Pierre",
            last_name: "Dubois",
            email: "pierre.dubois@demo.com",
            role: &user_manager,
            is_active: true,
            last_login: "2024-11-25T09:20:00Z",
            created_at: "2024-03-10T00:00:00Z",
            updated_at: "2024-11-25T00:00:00Z",
        }
        .build(),
        UserRow {
            id: "4",
            first_name: "Marie",
            last_name: "Leroy",
            email: "marie.leroy@demo.com",
            role: &viewer,
            is_active: true,
            last_login: "2024-11-24T14:10:00Z",
            created_at: "2024-04-20T00:00:00Z",
            updated_at: "2024-11-24T00:00:00Z",
        }
        .build(),
        UserRow {
            id: "5",
            first_name: "Lucas",
            last_name: "Moreau",
            email: "lucas.moreau@demo.com",
            role: &viewer,
            is_active: false,
            last_login: "2024-10-15T11:30:00Z",
            created_at: "2024-05-12T00:00:00Z",
            updated_at: "2024-11-20T00:00:00Z",
        }
        .build(),
        UserRow {
            id: "6",
            first_name: "Emma",
            last_name: "Rousseau",
            email: "emma.rousseau@demo.com",
            role: &user_manager,
            is_active: true,
            last_login: "2024-11-27T08:15:00Z",
            created_at: "2024-06-08T00:00:00Z",
            updated_at: "2024-11-27T00:00:00Z",
        }
        .build(),
    ];

    let farah = ("1", DEMO_EMAIL);
    let sophie = ("2", "sophie.martin@demo.com");
    let pierre = ("3", "pierre.dubois@demo.com");

    let audit_logs = vec![
        audit(
            "1",
            "login",
            "auth",
            "1",
            farah,
            json!({ "ip": "192.168.1.100", "userAgent": "Chrome/119.0" }),
            "2024-11-27T10:30:00Z",
        ),
        audit(
            "2",
            "create",
            "user",
            "6",
            farah,
            json!({ "targetUser": "emma.rousseau@demo.com" }),
            "2024-11-27T09:45:00Z",
        ),
        audit(
            "3",
            "update",
            "user",
            "5",
            sophie,
            json!({ "changes": ["isActive"], "previousValue": "true", "newValue": "false" }),
            "2024-11-26T16:20:00Z",
        ),
        audit(
            "4",
            "login",
            "auth",
            "2",
            sophie,
            json!({ "ip": "192.168.1.105", "userAgent": "Firefox/120.0" }),
            "2024-11-26T15:45:00Z",
        ),
        audit(
            "5",
            "create",
            "role",
            "4",
            farah,
            json!({ "roleName": "Viewer", "permissions": ["users:read", "roles:read"] }),
            "2024-11-25T14:30:00Z",
        ),
        audit(
            "6",
            "update",
            "role",
            "3",
            farah,
            json!({ "changes": ["permissions"], "addedPermissions": ["users:delete"] }),
            "2024-11-25T11:15:00Z",
        ),
        audit(
            "7",
            "logout",
            "auth",
            "3",
            pierre,
            json!({ "sessionDuration": "2h 15m" }),
            "2024-11-25T11:35:00Z",
        ),
        audit(
            "8",
            "login",
            "auth",
            "3",
            pierre,
            json!({ "ip": "192.168.1.110", "userAgent": "Safari/17.0" }),
            "2024-11-25T09:20:00Z",
        ),
    ];

    FixtureSeed {
        permissions,
        roles: vec![super_admin, admin, user_manager, viewer],
        users,
        audit_logs,
    }
}

#[cfg(test)]
mod tests {
    use super::demo_seed;

    #[test]
    fn derived_roles_pick_their_permission_subsets() {
        let seed = demo_seed();
        let names = |index: usize| -> Vec<String> {
            seed.roles[index]
                .permissions
                .iter()
                .map(|permission| permission.name.clone())
                .collect()
        };

        assert_eq!(names(0).len(), 7);
        assert!(!names(1).contains(&"users:delete".to_owned()));
        assert_eq!(names(2), vec!["users:read", "users:write", "users:delete"]);
        assert_eq!(
            names(3),
            vec!["users:read", "roles:read", "permissions:read", "audit:read"]
        );
    }

    #[test]
    fn seed_timestamps_parse() {
        let seed = demo_seed();
        assert_eq!(
            seed.audit_logs[0].timestamp.to_rfc3339(),
            "2024-11-27T10:30:00+00:00"
        );
        assert!(!seed.users[4].is_active);
    }
}
