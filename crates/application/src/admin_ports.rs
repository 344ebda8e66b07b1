mod audit;
mod auth;
mod permissions;
mod query;
mod roles;
mod users;

pub use audit::{AuditApi, AuditExport, AuditFilters, AuditStats, DailyActivity};
pub use auth::{
    AuthApi, AuthSession, AuthTokens, ChangePasswordInput, LoginCredentials, LogoutInput,
    RefreshTokenInput, RefreshedToken, ResetPasswordInput,
};
pub use permissions::{
    CreatePermissionInput, PermissionDetail, PermissionFilters, PermissionsApi,
    UpdatePermissionInput,
};
pub use query::QueryPairs;
pub use roles::{CreateRoleInput, RoleFilters, RoleUsers, RolesApi, UpdateRoleInput};
pub use users::{CreateUserInput, UpdateUserInput, UserFilters, UsersApi};
