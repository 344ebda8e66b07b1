use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use rbac_console_application::{
    ApiResponse, CreateRoleInput, Page, QueryPairs, RoleFilters, RoleUsers, RolesApi,
    UpdateRoleInput,
};
use rbac_console_core::AppResult;
use rbac_console_domain::Role;

use super::{HttpAdminApi, json_body};

#[async_trait]
impl RolesApi for HttpAdminApi {
    async fn list_roles(&self, filters: RoleFilters) -> AppResult<Page<Role>> {
        self.get(&["roles"], &filters.query_pairs()).await
    }

    async fn get_role(&self, id: &str) -> AppResult<ApiResponse<Role>> {
        self.get(&["roles", id], &[]).await
    }

    async fn create_role(&self, input: CreateRoleInput) -> AppResult<ApiResponse<Role>> {
        self.send(Method::POST, &["roles"], json_body(&input)?)
            .await
    }

    async fn update_role(
        &self,
        id: &str,
        input: UpdateRoleInput,
    ) -> AppResult<ApiResponse<Role>> {
        self.send(Method::PUT, &["roles", id], json_body(&input)?)
            .await
    }

    async fn delete_role(&self, id: &str) -> AppResult<ApiResponse<()>> {
        self.command(Method::DELETE, &["roles", id], None)
            .await
            .map(ApiResponse::ok)
    }

    async fn update_role_permissions(
        &self,
        id: &str,
        permission_ids: Vec<String>,
    ) -> AppResult<ApiResponse<Role>> {
        self.send(
            Method::PUT,
            &["roles", id, "permissions"],
            json!({ "permissionIds": permission_ids }),
        )
        .await
    }

    async fn get_role_users(&self, id: &str) -> AppResult<ApiResponse<RoleUsers>> {
        self.get(&["roles", id, "users"], &[]).await
    }
}
