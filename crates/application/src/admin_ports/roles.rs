use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rbac_console_core::AppResult;
use rbac_console_domain::{Role, User};

use super::query::{QueryPairs, matches_search, push_pair};
use crate::envelope::ApiResponse;
use crate::pagination::{Page, PageRequest};

/// Listing filters for roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFilters {
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
    /// Required active flag.
    pub is_active: Option<bool>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

impl RoleFilters {
    /// Returns whether the role passes every filter that is set.
    #[must_use]
    pub fn matches(&self, role: &Role) -> bool {
        if let Some(search) = self.search.as_deref().filter(|search| !search.is_empty())
            && !matches_search(
                search.to_lowercase().as_str(),
                &[role.name.as_str(), role.description.as_str()],
            )
        {
            return false;
        }

        self.is_active
            .is_none_or(|is_active| role.is_active == is_active)
    }

    /// Returns the normalized page request.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

impl QueryPairs for RoleFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "search", self.search.as_deref());
        push_pair(&mut pairs, "isActive", self.is_active);
        push_pair(&mut pairs, "page", self.page);
        push_pair(&mut pairs, "limit", self.limit);
        pairs
    }
}

/// Payload for creating a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleInput {
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Permissions to snapshot into the role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_ids: Option<Vec<String>>,
}

/// Partial update for a role. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleInput {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Permissions to re-snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_ids: Option<Vec<String>>,
    /// New active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Users currently embedding a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUsers {
    /// The role.
    pub role: Role,
    /// Users whose snapshot carries the role id.
    pub users: Vec<User>,
    /// `users.len()`.
    pub user_count: usize,
}

/// Role administration API shared by mock and real backends.
#[async_trait]
pub trait RolesApi: Send + Sync {
    /// Lists roles matching the filters, one page at a time.
    async fn list_roles(&self, filters: RoleFilters) -> AppResult<Page<Role>>;

    /// Returns one role.
    async fn get_role(&self, id: &str) -> AppResult<ApiResponse<Role>>;

    /// Creates a role.
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<ApiResponse<Role>>;

    /// Applies a partial update to a role.
    async fn update_role(&self, id: &str, input: UpdateRoleInput)
    -> AppResult<ApiResponse<Role>>;

    /// Deletes a role. Users keep their embedded snapshot.
    async fn delete_role(&self, id: &str) -> AppResult<ApiResponse<()>>;

    /// Replaces the role's permission snapshot.
    async fn update_role_permissions(
        &self,
        id: &str,
        permission_ids: Vec<String>,
    ) -> AppResult<ApiResponse<Role>>;

    /// Returns the role together with the users holding it.
    async fn get_role_users(&self, id: &str) -> AppResult<ApiResponse<RoleUsers>>;
}
