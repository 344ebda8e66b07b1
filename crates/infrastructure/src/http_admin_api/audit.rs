use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;

use rbac_console_application::{
    ApiResponse, AuditApi, AuditExport, AuditFilters, AuditStats, Page, QueryPairs,
};
use rbac_console_core::{AppError, AppResult};
use rbac_console_domain::AuditLogEntry;

use super::HttpAdminApi;

fn limit_query(limit: Option<usize>) -> Vec<(&'static str, String)> {
    limit
        .map(|limit| vec![("limit", limit.to_string())])
        .unwrap_or_default()
}

#[async_trait]
impl AuditApi for HttpAdminApi {
    async fn list_audit_logs(&self, filters: AuditFilters) -> AppResult<Page<AuditLogEntry>> {
        self.get(&["audit", "logs"], &filters.query_pairs()).await
    }

    async fn get_recent_activity(
        &self,
        limit: Option<usize>,
    ) -> AppResult<ApiResponse<Vec<AuditLogEntry>>> {
        self.get(&["audit", "recent"], &limit_query(limit)).await
    }

    async fn get_user_activity(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> AppResult<ApiResponse<Vec<AuditLogEntry>>> {
        self.get(&["audit", "users", user_id], &limit_query(limit))
            .await
    }

    async fn get_audit_stats(&self, days: Option<u32>) -> AppResult<ApiResponse<AuditStats>> {
        let query: Vec<(&'static str, String)> = days
            .map(|days| vec![("days", days.to_string())])
            .unwrap_or_default();
        self.get(&["audit", "stats"], &query).await
    }

    async fn export_logs(&self, filters: AuditFilters) -> AppResult<AuditExport> {
        let response = self
            .dispatch(
                Method::GET,
                &["audit", "export"],
                &filters.query_pairs(),
                None,
            )
            .await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("text/csv")
            .to_owned();
        let body = response.text().await.map_err(|error| {
            AppError::Internal(format!("failed to read audit export: {error}"))
        })?;

        Ok(AuditExport { content_type, body })
    }
}
