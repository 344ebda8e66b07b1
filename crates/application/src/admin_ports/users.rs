use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rbac_console_core::AppResult;
use rbac_console_domain::User;

use super::query::{QueryPairs, matches_search, push_pair};
use crate::envelope::ApiResponse;
use crate::pagination::{Page, PageRequest};

/// Listing filters for users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    /// Case-insensitive match on first name, last name, email or role name.
    pub search: Option<String>,
    /// Role id the user must hold.
    pub role: Option<String>,
    /// Required active flag.
    pub is_active: Option<bool>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

impl UserFilters {
    /// Returns whether the user passes every filter that is set.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        if let Some(search) = self.search.as_deref().filter(|search| !search.is_empty()) {
            let needle = search.to_lowercase();
            let role_name = user.role.as_ref().map(|role| role.name.as_str());
            let mut fields = vec![
                user.first_name.as_str(),
                user.last_name.as_str(),
                user.email.as_str(),
            ];
            fields.extend(role_name);
            if !matches_search(needle.as_str(), &fields) {
                return false;
            }
        }

        if let Some(role_id) = self.role.as_deref().filter(|role| !role.is_empty())
            && user.role_id() != Some(role_id)
        {
            return false;
        }

        self.is_active
            .is_none_or(|is_active| user.is_active == is_active)
    }

    /// Returns the normalized page request.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

impl QueryPairs for UserFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "search", self.search.as_deref());
        push_pair(&mut pairs, "role", self.role.as_deref());
        push_pair(&mut pairs, "isActive", self.is_active);
        push_pair(&mut pairs, "page", self.page);
        push_pair(&mut pairs, "limit", self.limit);
        pairs
    }
}

/// Payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Initial password, forwarded to real backends only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Role to embed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
}

/// Partial update for a user. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    /// New given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role to re-resolve and embed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    /// New active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// User administration API shared by mock and real backends.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Lists users matching the filters, one page at a time.
    async fn list_users(&self, filters: UserFilters) -> AppResult<Page<User>>;

    /// Returns one user.
    async fn get_user(&self, id: &str) -> AppResult<ApiResponse<User>>;

    /// Creates a user.
    async fn create_user(&self, input: CreateUserInput) -> AppResult<ApiResponse<User>>;

    /// Applies a partial update to a user.
    async fn update_user(&self, id: &str, input: UpdateUserInput)
    -> AppResult<ApiResponse<User>>;

    /// Deletes a user.
    async fn delete_user(&self, id: &str) -> AppResult<ApiResponse<()>>;

    /// Marks a user active.
    async fn activate_user(&self, id: &str) -> AppResult<ApiResponse<User>>;

    /// Replaces the user's role with the first resolvable id in `role_ids`.
    async fn update_user_roles(
        &self,
        id: &str,
        role_ids: Vec<String>,
    ) -> AppResult<ApiResponse<User>>;

    /// Sets the user's active flag.
    async fn toggle_user_status(&self, id: &str, is_active: bool)
    -> AppResult<ApiResponse<User>>;
}
