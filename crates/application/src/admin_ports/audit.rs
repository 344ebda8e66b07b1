use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use rbac_console_core::AppResult;
use rbac_console_domain::AuditLogEntry;

use super::query::{QueryPairs, matches_search, push_pair};
use crate::envelope::ApiResponse;
use crate::pagination::{Page, PageRequest};

/// Listing filters for audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilters {
    /// Case-insensitive match on action, resource or user email.
    pub search: Option<String>,
    /// Exact action tag.
    pub action: Option<String>,
    /// Exact resource tag.
    pub resource: Option<String>,
    /// Acting user id.
    pub user_id: Option<String>,
    /// Inclusive lower bound on the timestamp.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the timestamp.
    pub end_date: Option<DateTime<Utc>>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

impl AuditFilters {
    /// Returns whether the entry passes every filter that is set.
    #[must_use]
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(search) = self.search.as_deref().filter(|search| !search.is_empty())
            && !matches_search(
                search.to_lowercase().as_str(),
                &[
                    entry.action.as_str(),
                    entry.resource.as_str(),
                    entry.user_email.as_str(),
                ],
            )
        {
            return false;
        }

        let exact = [
            (self.action.as_deref(), entry.action.as_str()),
            (self.resource.as_deref(), entry.resource.as_str()),
            (self.user_id.as_deref(), entry.user_id.as_str()),
        ];
        if exact.iter().any(|(wanted, actual)| {
            wanted.is_some_and(|wanted| !wanted.is_empty() && wanted != *actual)
        }) {
            return false;
        }

        self.start_date
            .is_none_or(|start_date| entry.timestamp >= start_date)
            && self
                .end_date
                .is_none_or(|end_date| entry.timestamp <= end_date)
    }

    /// Returns the normalized page request.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

impl QueryPairs for AuditFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "search", self.search.as_deref());
        push_pair(&mut pairs, "action", self.action.as_deref());
        push_pair(&mut pairs, "resource", self.resource.as_deref());
        push_pair(&mut pairs, "userId", self.user_id.as_deref());
        push_pair(
            &mut pairs,
            "startDate",
            self.start_date
                .map(|date| date.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        push_pair(
            &mut pairs,
            "endDate",
            self.end_date
                .map(|date| date.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        push_pair(&mut pairs, "page", self.page);
        push_pair(&mut pairs, "limit", self.limit);
        pairs
    }
}

/// Entry count for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    /// Calendar day.
    pub date: NaiveDate,
    /// Entries recorded that day.
    pub count: usize,
}

/// Aggregates over a trailing window of audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStats {
    /// Entries in the window.
    pub total_actions: usize,
    /// Distinct acting users in the window.
    pub unique_users: usize,
    /// Tally by action tag.
    pub actions_by_type: BTreeMap<String, usize>,
    /// Tally by resource tag.
    pub actions_by_resource: BTreeMap<String, usize>,
    /// One bucket per day, oldest first.
    pub daily_activity: Vec<DailyActivity>,
}

/// Exported audit document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditExport {
    /// MIME type of `body`.
    pub content_type: String,
    /// Document content.
    pub body: String,
}

/// Audit log API shared by mock and real backends.
#[async_trait]
pub trait AuditApi: Send + Sync {
    /// Lists entries matching the filters, newest first, one page at a time.
    async fn list_audit_logs(&self, filters: AuditFilters) -> AppResult<Page<AuditLogEntry>>;

    /// Returns the `limit` newest entries.
    async fn get_recent_activity(
        &self,
        limit: Option<usize>,
    ) -> AppResult<ApiResponse<Vec<AuditLogEntry>>>;

    /// Returns the `limit` newest entries by one user.
    async fn get_user_activity(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> AppResult<ApiResponse<Vec<AuditLogEntry>>>;

    /// Computes statistics over the trailing `days` days.
    async fn get_audit_stats(&self, days: Option<u32>) -> AppResult<ApiResponse<AuditStats>>;

    /// Exports entries as a CSV document.
    async fn export_logs(&self, filters: AuditFilters) -> AppResult<AuditExport>;
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::Map;

    use rbac_console_domain::AuditLogEntry;

    use super::AuditFilters;
    use crate::admin_ports::QueryPairs;

    fn entry(action: &str, user_id: &str, day: u32) -> AuditLogEntry {
        AuditLogEntry {
            id: "1".to_owned(),
            action: action.to_owned(),
            resource: "auth".to_owned(),
            resource_id: user_id.to_owned(),
            user_id: user_id.to_owned(),
            user_email: format!("user{user_id}@demo.com"),
            metadata: Map::new(),
            timestamp: Utc
                .with_ymd_and_hms(2024, 11, day, 12, 0, 0)
                .single()
                .unwrap_or_else(|| unreachable!()),
        }
    }

    #[test]
    fn typed_filters_combine_as_conjunction() {
        let filters = AuditFilters {
            action: Some("login".to_owned()),
            user_id: Some("2".to_owned()),
            ..AuditFilters::default()
        };

        assert!(filters.matches(&entry("login", "2", 26)));
        assert!(!filters.matches(&entry("login", "1", 26)));
        assert!(!filters.matches(&entry("logout", "2", 26)));
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let target = entry("login", "1", 26);
        let filters = AuditFilters {
            start_date: Some(target.timestamp),
            end_date: Some(target.timestamp),
            ..AuditFilters::default()
        };

        assert!(filters.matches(&target));
        assert!(!filters.matches(&entry("login", "1", 25)));
    }

    #[test]
    fn search_covers_user_email() {
        let filters = AuditFilters {
            search: Some("USER3@".to_owned()),
            ..AuditFilters::default()
        };

        assert!(filters.matches(&entry("login", "3", 25)));
        assert!(!filters.matches(&entry("login", "4", 25)));
    }

    #[test]
    fn query_pairs_encode_dates_as_rfc3339() {
        let filters = AuditFilters {
            start_date: Utc.with_ymd_and_hms(2024, 11, 25, 0, 0, 0).single(),
            page: Some(2),
            ..AuditFilters::default()
        };

        assert_eq!(
            filters.query_pairs(),
            vec![
                ("startDate", "2024-11-25T00:00:00.000Z".to_owned()),
                ("page", "2".to_owned()),
            ]
        );
    }
}
