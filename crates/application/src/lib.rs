//! API contracts, envelopes and session services for the RBAC console.

#![forbid(unsafe_code)]

mod admin_ports;
mod envelope;
mod pagination;
mod session_ports;
mod session_service;

pub use admin_ports::{
    AuditApi, AuditExport, AuditFilters, AuditStats, AuthApi, AuthSession, AuthTokens,
    ChangePasswordInput, CreatePermissionInput, CreateRoleInput, CreateUserInput, DailyActivity,
    LoginCredentials, LogoutInput, PermissionDetail, PermissionFilters, PermissionsApi,
    QueryPairs, RefreshTokenInput, RefreshedToken, ResetPasswordInput, RoleFilters, RoleUsers,
    RolesApi, UpdatePermissionInput, UpdateRoleInput, UpdateUserInput, UserFilters, UsersApi,
};
pub use envelope::{ApiResponse, PaginatedResponse, PaginationMeta};
pub use pagination::{DEFAULT_PAGE_LIMIT, Page, PageRequest, page_count, paginate};
pub use session_ports::{
    ACCESS_TOKEN_KEY, CookieOptions, Notifier, REFRESH_TOKEN_KEY, SameSite, SessionSnapshot,
    SessionSnapshotStore, TokenStore,
};
pub use session_service::{SessionService, SessionState};
