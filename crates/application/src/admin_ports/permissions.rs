use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rbac_console_core::AppResult;
use rbac_console_domain::{Permission, Role};

use super::query::{QueryPairs, matches_search, push_pair};
use crate::envelope::ApiResponse;
use crate::pagination::{Page, PageRequest};

/// Listing filters for permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionFilters {
    /// Case-insensitive match on name, description or resource.
    pub search: Option<String>,
    /// Exact resource.
    pub resource: Option<String>,
    /// Exact action.
    pub action: Option<String>,
    /// Required active flag.
    pub is_active: Option<bool>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

impl PermissionFilters {
    /// Returns whether the permission passes every filter that is set.
    #[must_use]
    pub fn matches(&self, permission: &Permission) -> bool {
        if let Some(search) = self.search.as_deref().filter(|search| !search.is_empty())
            && !matches_search(
                search.to_lowercase().as_str(),
                &[
                    permission.name.as_str(),
                    permission.description.as_str(),
                    permission.resource.as_str(),
                ],
            )
        {
            return false;
        }

        if let Some(resource) = self.resource.as_deref().filter(|value| !value.is_empty())
            && permission.resource != resource
        {
            return false;
        }

        if let Some(action) = self.action.as_deref().filter(|value| !value.is_empty())
            && permission.action != action
        {
            return false;
        }

        self.is_active
            .is_none_or(|is_active| permission.is_active == is_active)
    }

    /// Returns the normalized page request.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

impl QueryPairs for PermissionFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "search", self.search.as_deref());
        push_pair(&mut pairs, "resource", self.resource.as_deref());
        push_pair(&mut pairs, "action", self.action.as_deref());
        push_pair(&mut pairs, "isActive", self.is_active);
        push_pair(&mut pairs, "page", self.page);
        push_pair(&mut pairs, "limit", self.limit);
        pairs
    }
}

/// Payload for creating a permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePermissionInput {
    /// Display name, conventionally `resource:action`.
    pub name: String,
    /// Description.
    pub description: String,
    /// Resource the grant applies to.
    pub resource: String,
    /// Action allowed on the resource.
    pub action: String,
}

/// Partial update for a permission. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissionInput {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// New action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// New active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// A permission and the roles whose snapshot contains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDetail {
    /// The permission.
    pub permission: Permission,
    /// Roles granting it.
    pub roles: Vec<Role>,
}

/// Permission administration API shared by mock and real backends.
#[async_trait]
pub trait PermissionsApi: Send + Sync {
    /// Lists permissions matching the filters, one page at a time.
    async fn list_permissions(&self, filters: PermissionFilters) -> AppResult<Page<Permission>>;

    /// Returns every permission keyed by resource.
    async fn get_grouped_permissions(
        &self,
    ) -> AppResult<ApiResponse<BTreeMap<String, Vec<Permission>>>>;

    /// Returns one permission with the roles that grant it.
    async fn get_permission(&self, id: &str) -> AppResult<ApiResponse<PermissionDetail>>;

    /// Creates a permission.
    async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<ApiResponse<Permission>>;

    /// Creates several permissions at once, in input order.
    async fn create_permissions_bulk(
        &self,
        inputs: Vec<CreatePermissionInput>,
    ) -> AppResult<ApiResponse<Vec<Permission>>>;

    /// Applies a partial update to a permission.
    async fn update_permission(
        &self,
        id: &str,
        input: UpdatePermissionInput,
    ) -> AppResult<ApiResponse<Permission>>;

    /// Deletes a permission. Roles keep their snapshot.
    async fn delete_permission(&self, id: &str) -> AppResult<ApiResponse<()>>;

    /// Returns distinct resources in first-seen order.
    async fn list_resources(&self) -> AppResult<ApiResponse<Vec<String>>>;

    /// Returns distinct actions in first-seen order.
    async fn list_actions(&self) -> AppResult<ApiResponse<Vec<String>>>;
}
