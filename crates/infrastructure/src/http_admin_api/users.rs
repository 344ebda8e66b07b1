use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use rbac_console_application::{
    ApiResponse, CreateUserInput, Page, QueryPairs, UpdateUserInput, UserFilters, UsersApi,
};
use rbac_console_core::AppResult;
use rbac_console_domain::User;

use super::{HttpAdminApi, json_body};

#[async_trait]
impl UsersApi for HttpAdminApi {
    async fn list_users(&self, filters: UserFilters) -> AppResult<Page<User>> {
        self.get(&["users"], &filters.query_pairs()).await
    }

    async fn get_user(&self, id: &str) -> AppResult<ApiResponse<User>> {
        self.get(&["users", id], &[]).await
    }

    async fn create_user(&self, input: CreateUserInput) -> AppResult<ApiResponse<User>> {
        self.send(Method::POST, &["users"], json_body(&input)?)
            .await
    }

    async fn update_user(
        &self,
        id: &str,
        input: UpdateUserInput,
    ) -> AppResult<ApiResponse<User>> {
        self.send(Method::PUT, &["users", id], json_body(&input)?)
            .await
    }

    async fn delete_user(&self, id: &str) -> AppResult<ApiResponse<()>> {
        self.command(Method::DELETE, &["users", id], None)
            .await
            .map(ApiResponse::ok)
    }

    async fn activate_user(&self, id: &str) -> AppResult<ApiResponse<User>> {
        self.fetch(Method::PATCH, &["users", id, "activate"], &[], None)
            .await
    }

    async fn update_user_roles(
        &self,
        id: &str,
        role_ids: Vec<String>,
    ) -> AppResult<ApiResponse<User>> {
        self.send(
            Method::PUT,
            &["users", id, "roles"],
            json!({ "roleIds": role_ids }),
        )
        .await
    }

    async fn toggle_user_status(
        &self,
        id: &str,
        is_active: bool,
    ) -> AppResult<ApiResponse<User>> {
        self.send(
            Method::PATCH,
            &["users", id, "status"],
            json!({ "isActive": is_active }),
        )
        .await
    }
}
