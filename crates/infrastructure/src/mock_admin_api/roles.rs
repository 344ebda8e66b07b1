use async_trait::async_trait;
use rbac_console_application::{
    ApiResponse, CreateRoleInput, Page, RoleFilters, RoleUsers, RolesApi, UpdateRoleInput,
    paginate,
};
use rbac_console_core::AppResult;
use rbac_console_domain::{Permission, Role};

use super::{
    CREATE_MS, DELETE_MS, GET_MS, LIST_MS, MockAdminApi, REASSIGN_MS, UPDATE_MS, not_found,
};
use crate::fixture_store::FixtureCollections;

const ROLE_USERS_MS: u64 = 400;

/// Snapshots the permissions whose id is listed, in collection order.
fn resolve_permissions(permissions: &[Permission], ids: &[String]) -> Vec<Permission> {
    permissions
        .iter()
        .filter(|permission| ids.contains(&permission.id))
        .cloned()
        .collect()
}

fn modify_role(
    collections: &mut FixtureCollections,
    id: &str,
    change: impl FnOnce(&mut Role, &[Permission]),
) -> AppResult<Role> {
    let FixtureCollections {
        roles,
        permissions,
        clock,
        ..
    } = collections;

    let role = roles
        .iter_mut()
        .find(|role| role.id == id)
        .ok_or_else(|| not_found("role", id))?;
    change(role, permissions);
    role.updated_at = clock.tick();
    Ok(role.clone())
}

#[async_trait]
impl RolesApi for MockAdminApi {
    async fn list_roles(&self, filters: RoleFilters) -> AppResult<Page<Role>> {
        self.settle("roles.list", LIST_MS).await;

        let roles = self
            .store
            .read()
            .await
            .roles
            .iter()
            .filter(|role| filters.matches(role))
            .cloned()
            .collect();

        Ok(paginate(roles, filters.page_request()))
    }

    async fn get_role(&self, id: &str) -> AppResult<ApiResponse<Role>> {
        self.settle("roles.get", GET_MS).await;

        self.store
            .read()
            .await
            .roles
            .iter()
            .find(|role| role.id == id)
            .cloned()
            .map(ApiResponse::ok)
            .ok_or_else(|| not_found("role", id))
    }

    async fn create_role(&self, input: CreateRoleInput) -> AppResult<ApiResponse<Role>> {
        self.settle("roles.create", CREATE_MS).await;

        let mut collections = self.store.write().await;
        let permissions = input
            .permission_ids
            .as_deref()
            .map(|ids| resolve_permissions(&collections.permissions, ids))
            .unwrap_or_default();
        let now = collections.clock.tick();

        let role = Role {
            id: collections.role_ids.issue(),
            name: input.name,
            description: input.description,
            permissions,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        collections.roles.push(role.clone());

        Ok(ApiResponse::ok(role))
    }

    async fn update_role(
        &self,
        id: &str,
        input: UpdateRoleInput,
    ) -> AppResult<ApiResponse<Role>> {
        self.settle("roles.update", UPDATE_MS).await;

        let mut collections = self.store.write().await;
        modify_role(&mut collections, id, |role, permissions| {
            if let Some(name) = input.name {
                role.name = name;
            }
            if let Some(description) = input.description {
                role.description = description;
            }
            if let Some(ids) = input.permission_ids {
                role.permissions = resolve_permissions(permissions, &ids);
            }
            if let Some(is_active) = input.is_active {
                role.is_active = is_active;
            }
        })
        .map(ApiResponse::ok)
    }

    async fn delete_role(&self, id: &str) -> AppResult<ApiResponse<()>> {
        self.settle("roles.delete", DELETE_MS).await;

        let mut collections = self.store.write().await;
        let index = collections
            .roles
            .iter()
            .position(|role| role.id == id)
            .ok_or_else(|| not_found("role", id))?;
        collections.roles.remove(index);

        Ok(ApiResponse::ok(()))
    }

    async fn update_role_permissions(
        &self,
        id: &str,
        permission_ids: Vec<String>,
    ) -> AppResult<ApiResponse<Role>> {
        self.settle("roles.update_permissions", REASSIGN_MS).await;

        let mut collections = self.store.write().await;
        modify_role(&mut collections, id, |role, permissions| {
            role.permissions = resolve_permissions(permissions, &permission_ids);
        })
        .map(ApiResponse::ok)
    }

    async fn get_role_users(&self, id: &str) -> AppResult<ApiResponse<RoleUsers>> {
        self.settle("roles.get_users", ROLE_USERS_MS).await;

        let collections = self.store.read().await;
        let role = collections
            .roles
            .iter()
            .find(|role| role.id == id)
            .cloned()
            .ok_or_else(|| not_found("role", id))?;
        let users: Vec<_> = collections
            .users
            .iter()
            .filter(|user| user.role_id() == Some(id))
            .cloned()
            .collect();

        Ok(ApiResponse::ok(RoleUsers {
            user_count: users.len(),
            role,
            users,
        }))
    }
}
