use async_trait::async_trait;
use rbac_console_application::{
    ApiResponse, CreateUserInput, Page, UpdateUserInput, UserFilters, UsersApi, paginate,
};
use rbac_console_core::AppResult;
use rbac_console_domain::{Role, User};

use super::{
    CREATE_MS, DELETE_MS, GET_MS, LIST_MS, MockAdminApi, REASSIGN_MS, STATUS_MS, UPDATE_MS,
    not_found,
};
use crate::fixture_store::FixtureCollections;

fn find_role(roles: &[Role], role_id: &str) -> Option<Role> {
    roles.iter().find(|role| role.id == role_id).cloned()
}

/// Applies `change` to the user and restamps it.
fn modify_user(
    collections: &mut FixtureCollections,
    id: &str,
    change: impl FnOnce(&mut User, &[Role]),
) -> AppResult<User> {
    let FixtureCollections {
        users,
        roles,
        clock,
        ..
    } = collections;

    let user = users
        .iter_mut()
        .find(|user| user.id == id)
        .ok_or_else(|| not_found("user", id))?;
    change(user, roles);
    user.updated_at = clock.tick();
    Ok(user.clone())
}

#[async_trait]
impl UsersApi for MockAdminApi {
    async fn list_users(&self, filters: UserFilters) -> AppResult<Page<User>> {
        self.settle("users.list", LIST_MS).await;

        let users = self
            .store
            .read()
            .await
            .users
            .iter()
            .filter(|user| filters.matches(user))
            .cloned()
            .collect();

        Ok(paginate(users, filters.page_request()))
    }

    async fn get_user(&self, id: &str) -> AppResult<ApiResponse<User>> {
        self.settle("users.get", GET_MS).await;

        self.store
            .read()
            .await
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .map(ApiResponse::ok)
            .ok_or_else(|| not_found("user", id))
    }

    async fn create_user(&self, input: CreateUserInput) -> AppResult<ApiResponse<User>> {
        self.settle("users.create", CREATE_MS).await;

        let mut collections = self.store.write().await;
        let role = input
            .role_id
            .as_deref()
            .and_then(|role_id| find_role(&collections.roles, role_id))
            .or_else(|| collections.roles.first().cloned());
        let now = collections.clock.tick();

        let user = User {
            id: collections.user_ids.issue(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            role,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        collections.users.push(user.clone());

        Ok(ApiResponse::ok(user))
    }

    async fn update_user(
        &self,
        id: &str,
        input: UpdateUserInput,
    ) -> AppResult<ApiResponse<User>> {
        self.settle("users.update", UPDATE_MS).await;

        let mut collections = self.store.write().await;
        modify_user(&mut collections, id, |user, roles| {
            if let Some(first_name) = input.first_name {
                user.first_name = first_name;
            }
            if let Some(last_name) = input.last_name {
                user.last_name = last_name;
            }
            if let Some(email) = input.email {
                user.email = email;
            }
            if let Some(role_id) = input.role_id.filter(|role_id| !role_id.is_empty()) {
                user.role = find_role(roles, &role_id);
            }
            if let Some(is_active) = input.is_active {
                user.is_active = is_active;
            }
        })
        .map(ApiResponse::ok)
    }

    async fn delete_user(&self, id: &str) -> AppResult<ApiResponse<()>> {
        self.settle("users.delete", DELETE_MS).await;

        let mut collections = self.store.write().await;
        let index = collections
            .users
            .iter()
            .position(|user| user.id == id)
            .ok_or_else(|| not_found("user", id))?;
        collections.users.remove(index);

        Ok(ApiResponse::ok(()))
    }

    async fn activate_user(&self, id: &str) -> AppResult<ApiResponse<User>> {
        self.settle("users.activate", STATUS_MS).await;

        let mut collections = self.store.write().await;
        modify_user(&mut collections, id, |user, _| user.is_active = true).map(ApiResponse::ok)
    }

    async fn update_user_roles(
        &self,
        id: &str,
        role_ids: Vec<String>,
    ) -> AppResult<ApiResponse<User>> {
        self.settle("users.update_roles", REASSIGN_MS).await;

        let mut collections = self.store.write().await;
        modify_user(&mut collections, id, |user, roles| {
            if let Some(role) = role_ids
                .first()
                .and_then(|role_id| find_role(roles, role_id))
            {
                user.role = Some(role);
            }
        })
        .map(ApiResponse::ok)
    }

    async fn toggle_user_status(
        &self,
        id: &str,
        is_active: bool,
    ) -> AppResult<ApiResponse<User>> {
        self.settle("users.toggle_status", STATUS_MS).await;

        let mut collections = self.store.write().await;
        modify_user(&mut collections, id, |user, _| user.is_active = is_active)
            .map(ApiResponse::ok)
    }
}
