use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Append-only record of one administrative action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// Identifier unique within the audit collection.
    pub id: String,
    /// Action tag such as `login` or `update`.
    pub action: String,
    /// Resource tag such as `user` or `auth`.
    pub resource: String,
    /// Identifier of the record the action targeted.
    pub resource_id: String,
    /// Acting user id.
    pub user_id: String,
    /// Acting user email, denormalized at write time.
    pub user_email: String,
    /// Free-form details.
    pub metadata: Map<String, Value>,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
}
