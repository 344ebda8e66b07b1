use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use rbac_console_application::{
    ApiResponse, CreatePermissionInput, Page, PermissionDetail, PermissionFilters,
    PermissionsApi, QueryPairs, UpdatePermissionInput,
};
use rbac_console_core::AppResult;
use rbac_console_domain::Permission;

use super::{HttpAdminApi, json_body};

#[async_trait]
impl PermissionsApi for HttpAdminApi {
    async fn list_permissions(&self, filters: PermissionFilters) -> AppResult<Page<Permission>> {
        self.get(&["permissions"], &filters.query_pairs()).await
    }

    async fn get_grouped_permissions(
        &self,
    ) -> AppResult<ApiResponse<BTreeMap<String, Vec<Permission>>>> {
        self.get(&["permissions", "grouped"], &[]).await
    }

    async fn get_permission(&self, id: &str) -> AppResult<ApiResponse<PermissionDetail>> {
        self.get(&["permissions", id], &[]).await
    }

    async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<ApiResponse<Permission>> {
        self.send(Method::POST, &["permissions"], json_body(&input)?)
            .await
    }

    async fn create_permissions_bulk(
        &self,
        inputs: Vec<CreatePermissionInput>,
    ) -> AppResult<ApiResponse<Vec<Permission>>> {
        self.send(
            Method::POST,
            &["permissions", "bulk"],
            json!({ "permissions": inputs }),
        )
        .await
    }

    async fn update_permission(
        &self,
        id: &str,
        input: UpdatePermissionInput,
    ) -> AppResult<ApiResponse<Permission>> {
        self.send(Method::PUT, &["permissions", id], json_body(&input)?)
            .await
    }

    async fn delete_permission(&self, id: &str) -> AppResult<ApiResponse<()>> {
        self.command(Method::DELETE, &["permissions", id], None)
            .await
            .map(ApiResponse::ok)
    }

    async fn list_resources(&self) -> AppResult<ApiResponse<Vec<String>>> {
        self.get(&["permissions", "resources"], &[]).await
    }

    async fn list_actions(&self) -> AppResult<ApiResponse<Vec<String>>> {
        self.get(&["permissions", "actions"], &[]).await
    }
}
