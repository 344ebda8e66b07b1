use std::collections::BTreeMap;

use async_trait::async_trait;
use rbac_console_application::{
    ApiResponse, CreatePermissionInput, Page, PermissionDetail, PermissionFilters,
    PermissionsApi, UpdatePermissionInput, paginate,
};
use rbac_console_core::AppResult;
use rbac_console_domain::Permission;

use super::{CREATE_MS, DELETE_MS, GET_MS, LIST_MS, MockAdminApi, UPDATE_MS, not_found};
use crate::fixture_store::FixtureCollections;

const GROUPED_MS: u64 = 300;
const BULK_MS: u64 = 800;
const DISTINCT_MS: u64 = 200;

fn insert_permission(
    collections: &mut FixtureCollections,
    input: CreatePermissionInput,
) -> Permission {
    let now = collections.clock.tick();
    let permission = Permission {
        id: collections.permission_ids.issue(),
        name: input.name,
        description: input.description,
        resource: input.resource,
        action: input.action,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    collections.permissions.push(permission.clone());
    permission
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|existing| existing == value) {
            seen.push(value.to_owned());
        }
    }
    seen
}

#[async_trait]
impl PermissionsApi for MockAdminApi {
    async fn list_permissions(&self, filters: PermissionFilters) -> AppResult<Page<Permission>> {
        self.settle("permissions.list", LIST_MS).await;

        let permissions = self
            .store
            .read()
            .await
            .permissions
            .iter()
            .filter(|permission| filters.matches(permission))
            .cloned()
            .collect();

        Ok(paginate(permissions, filters.page_request()))
    }

    async fn get_grouped_permissions(
        &self,
    ) -> AppResult<ApiResponse<BTreeMap<String, Vec<Permission>>>> {
        self.settle("permissions.grouped", GROUPED_MS).await;

        let mut grouped: BTreeMap<String, Vec<Permission>> = BTreeMap::new();
        for permission in &self.store.read().await.permissions {
            grouped
                .entry(permission.resource.clone())
                .or_default()
                .push(permission.clone());
        }

        Ok(ApiResponse::ok(grouped))
    }

    async fn get_permission(&self, id: &str) -> AppResult<ApiResponse<PermissionDetail>> {
        self.settle("permissions.get", GET_MS).await;

        let collections = self.store.read().await;
        let permission = collections
            .permissions
            .iter()
            .find(|permission| permission.id == id)
            .cloned()
            .ok_or_else(|| not_found("permission", id))?;
        let roles = collections
            .roles
            .iter()
            .filter(|role| role.has_permission(id))
            .cloned()
            .collect();

        Ok(ApiResponse::ok(PermissionDetail { permission, roles }))
    }

    async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<ApiResponse<Permission>> {
        self.settle("permissions.create", CREATE_MS).await;

        let mut collections = self.store.write().await;
        Ok(ApiResponse::ok(insert_permission(&mut collections, input)))
    }

    async fn create_permissions_bulk(
        &self,
        inputs: Vec<CreatePermissionInput>,
    ) -> AppResult<ApiResponse<Vec<Permission>>> {
        self.settle("permissions.create_bulk", BULK_MS).await;

        let mut collections = self.store.write().await;
        let created = inputs
            .into_iter()
            .map(|input| insert_permission(&mut collections, input))
            .collect();

        Ok(ApiResponse::ok(created))
    }

    async fn update_permission(
        &self,
        id: &str,
        input: UpdatePermissionInput,
    ) -> AppResult<ApiResponse<Permission>> {
        self.settle("permissions.update", UPDATE_MS).await;

        let mut collections = self.store.write().await;
        let FixtureCollections {
            permissions, clock, ..
        } = &mut *collections;

        let permission = permissions
            .iter_mut()
            .find(|permission| permission.id == id)
            .ok_or_else(|| not_found("permission", id))?;
        if let Some(name) = input.name {
            permission.name = name;
        }
        if let Some(description) = input.description {
            permission.description = description;
        }
        if let Some(resource) = input.resource {
            permission.resource = resource;
        }
        if let Some(action) = input.action {
            permission.action = action;
        }
        if let Some(is_active) = input.is_active {
            permission.is_active = is_active;
        }
        permission.updated_at = clock.tick();

        Ok(ApiResponse::ok(permission.clone()))
    }

    async fn delete_permission(&self, id: &str) -> AppResult<ApiResponse<()>> {
        self.settle("permissions.delete", DELETE_MS).await;

        let mut collections = self.store.write().await;
        let index = collections
            .permissions
            .iter()
            .position(|permission| permission.id == id)
            .ok_or_else(|| not_found("permission", id))?;
        collections.permissions.remove(index);

        Ok(ApiResponse::ok(()))
    }

    async fn list_resources(&self) -> AppResult<ApiResponse<Vec<String>>> {
        self.settle("permissions.resources", DISTINCT_MS).await;

        let collections = self.store.read().await;
        Ok(ApiResponse::ok(distinct(
            collections
                .permissions
                .iter()
                .map(|permission| permission.resource.as_str()),
        )))
    }

    async fn list_actions(&self) -> AppResult<ApiResponse<Vec<String>>> {
        self.settle("permissions.actions", DISTINCT_MS).await;

        let collections = self.store.read().await;
        Ok(ApiResponse::ok(distinct(
            collections
                .permissions
                .iter()
                .map(|permission| permission.action.as_str()),
        )))
    }
}
