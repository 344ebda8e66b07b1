use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Days, Local, NaiveDate, SecondsFormat, TimeDelta, TimeZone, Utc};
use rbac_console_application::{
    ApiResponse, AuditApi, AuditExport, AuditFilters, AuditStats, DailyActivity, Page, paginate,
};
use rbac_console_core::{AppError, AppResult};
use rbac_console_domain::AuditLogEntry;

use super::MockAdminApi;

const LIST_MS: u64 = 500;
const RECENT_MS: u64 = 300;
const USER_ACTIVITY_MS: u64 = 400;
const STATS_MS: u64 = 400;
const EXPORT_MS: u64 = 1000;

const DEFAULT_RECENT_LIMIT: usize = 5;
const DEFAULT_USER_ACTIVITY_LIMIT: usize = 10;
const DEFAULT_STATS_DAYS: u32 = 7;
/// Longest stats window, roughly ten years of daily buckets.
const MAX_STATS_DAYS: u32 = 3660;

const CSV_CONTENT_TYPE: &str = "text/csv";
const CSV_HEADER: &str = "Timestamp,Action,Resource,User,Details";

fn newest_first<'a>(entries: impl Iterator<Item = &'a AuditLogEntry>) -> Vec<AuditLogEntry> {
    let mut entries: Vec<AuditLogEntry> = entries.cloned().collect();
    entries.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
    entries
}

/// Aggregates the entries recorded in `[now - days, now]`.
///
/// Daily buckets follow the calendar of `now`'s time zone and run oldest
/// first, one per day, ending with the day containing `now`. Windows longer
/// than 3660 days are shortened to 3660.
pub fn compute_audit_stats<Tz: TimeZone>(
    entries: &[AuditLogEntry],
    now: DateTime<Tz>,
    days: u32,
) -> AuditStats {
    let days = days.min(MAX_STATS_DAYS);
    let zone = now.timezone();
    let end = now.with_timezone(&Utc);
    let start = end
        .checked_sub_signed(TimeDelta::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let windowed: Vec<&AuditLogEntry> = entries
        .iter()
        .filter(|entry| entry.timestamp >= start && entry.timestamp <= end)
        .collect();

    let mut actions_by_type = BTreeMap::new();
    let mut actions_by_resource = BTreeMap::new();
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut users = BTreeSet::new();
    for entry in &windowed {
        *actions_by_type.entry(entry.action.clone()).or_insert(0) += 1;
        *actions_by_resource.entry(entry.resource.clone()).or_insert(0) += 1;
        *per_day
            .entry(entry.timestamp.with_timezone(&zone).date_naive())
            .or_insert(0) += 1;
        users.insert(entry.user_id.as_str());
    }

    let today = now.date_naive();
    let daily_activity = (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| DailyActivity {
            date,
            count: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect();

    AuditStats {
        total_actions: windowed.len(),
        unique_users: users.len(),
        actions_by_type,
        actions_by_resource,
        daily_activity,
    }
}

fn csv_row(entry: &AuditLogEntry) -> AppResult<String> {
    let details = serde_json::to_string(&entry.metadata).map_err(|error| {
        AppError::Internal(format!(
            "failed to encode metadata of audit entry '{}': {error}",
            entry.id
        ))
    })?;

    Ok(format!(
        "{},{},{},{},\"{}\"",
        entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        entry.action,
        entry.resource,
        entry.user_email,
        details.replace('"', "\"\"")
    ))
}

/// Renders entries as CSV, one row per entry in the given order.
pub(crate) fn render_csv(entries: &[AuditLogEntry]) -> AppResult<String> {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADER.to_owned());
    for entry in entries {
        lines.push(csv_row(entry)?);
    }
    Ok(lines.join("\n"))
}

#[async_trait]
impl AuditApi for MockAdminApi {
    async fn list_audit_logs(&self, filters: AuditFilters) -> AppResult<Page<AuditLogEntry>> {
        self.settle("audit.list", LIST_MS).await;

        let entries = newest_first(
            self.store
                .read()
                .await
                .audit_logs
                .iter()
                .filter(|entry| filters.matches(entry)),
        );

        Ok(paginate(entries, filters.page_request()))
    }

    async fn get_recent_activity(
        &self,
        limit: Option<usize>,
    ) -> AppResult<ApiResponse<Vec<AuditLogEntry>>> {
        self.settle("audit.recent", RECENT_MS).await;

        let mut entries = newest_first(self.store.read().await.audit_logs.iter());
        entries.truncate(limit.unwrap_or(DEFAULT_RECENT_LIMIT));

        Ok(ApiResponse::ok(entries))
    }

    async fn get_user_activity(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> AppResult<ApiResponse<Vec<AuditLogEntry>>> {
        self.settle("audit.user_activity", USER_ACTIVITY_MS).await;

        let mut entries = newest_first(
            self.store
                .read()
                .await
                .audit_logs
                .iter()
                .filter(|entry| entry.user_id == user_id),
        );
        entries.truncate(limit.unwrap_or(DEFAULT_USER_ACTIVITY_LIMIT));

        Ok(ApiResponse::ok(entries))
    }

    async fn get_audit_stats(&self, days: Option<u32>) -> AppResult<ApiResponse<AuditStats>> {
        self.settle("audit.stats", STATS_MS).await;

        let collections = self.store.read().await;
        Ok(ApiResponse::ok(compute_audit_stats(
            &collections.audit_logs,
            Local::now(),
            days.unwrap_or(DEFAULT_STATS_DAYS),
        )))
    }

    async fn export_logs(&self, _filters: AuditFilters) -> AppResult<AuditExport> {
        self.settle("audit.export", EXPORT_MS).await;

        let body = render_csv(&self.store.read().await.audit_logs)?;
        Ok(AuditExport {
            content_type: CSV_CONTENT_TYPE.to_owned(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use serde_json::{Map, json};

    use rbac_console_domain::AuditLogEntry;

    use super::{MAX_STATS_DAYS, compute_audit_stats, render_csv};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, day, hour, 0, 0)
            .single()
            .unwrap_or_else(|| unreachable!())
    }

    fn entry(id: &str, action: &str, user_id: &str, timestamp: DateTime<Utc>) -> AuditLogEntry {
        AuditLogEntry {
            id: id.to_owned(),
            action: action.to_owned(),
            resource: "auth".to_owned(),
            resource_id: user_id.to_owned(),
            user_id: user_id.to_owned(),
            user_email: format!("user{user_id}@demo.com"),
            metadata: Map::new(),
            timestamp,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, day).unwrap_or_else(|| unreachable!())
    }

    #[test]
    fn stats_cover_only_the_trailing_window() {
        let entries = vec![
            entry("1", "login", "1", at(27, 10)),
            entry("2", "logout", "1", at(26, 9)),
            entry("3", "login", "2", at(25, 8)),
            entry("4", "login", "3", at(10, 8)),
        ];

        let stats = compute_audit_stats(&entries, at(27, 12), 7);

        assert_eq!(stats.total_actions, 3);
        assert_eq!(stats.unique_users, 2);
        assert_eq!(stats.actions_by_type.get("login"), Some(&2));
        assert_eq!(stats.actions_by_type.get("logout"), Some(&1));
        assert_eq!(stats.actions_by_resource.get("auth"), Some(&3));
    }

    #[test]
    fn daily_activity_has_one_bucket_per_day_oldest_first() {
        let entries = vec![
            entry("1", "login", "1", at(27, 10)),
            entry("2", "login", "1", at(27, 11)),
            entry("3", "login", "2", at(25, 8)),
        ];

        let stats = compute_audit_stats(&entries, at(27, 12), 3);

        let buckets: Vec<(NaiveDate, usize)> = stats
            .daily_activity
            .iter()
            .map(|bucket| (bucket.date, bucket.count))
            .collect();
        assert_eq!(buckets, vec![(date(25), 1), (date(26), 0), (date(27), 2)]);
    }

    #[test]
    fn oversized_windows_are_capped() {
        let entries = vec![entry("1", "login", "1", at(27, 10))];

        let stats = compute_audit_stats(&entries, at(27, 12), u32::MAX);

        assert_eq!(stats.total_actions, 1);
        assert_eq!(stats.daily_activity.len(), MAX_STATS_DAYS as usize);
        assert_eq!(stats.daily_activity.last().map(|bucket| bucket.date), Some(date(27)));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let entries = vec![
            entry("1", "login", "1", at(20, 12)),
            entry("2", "login", "1", at(27, 12)),
        ];

        let stats = compute_audit_stats(&entries, at(27, 12), 7);
        assert_eq!(stats.total_actions, 2);
    }

    #[test]
    fn zero_days_yields_no_buckets() {
        let stats = compute_audit_stats(&[], at(27, 12), 0);
        assert_eq!(stats.total_actions, 0);
        assert!(stats.daily_activity.is_empty());
    }

    #[test]
    fn csv_quotes_metadata_json() {
        let mut logged = entry("1", "login", "1", at(27, 10));
        logged.metadata = match json!({ "ip": "10.0.0.1" }) {
            serde_json::Value::Object(map) => map,
            _ => Map::new(),
        };

        let csv = render_csv(&[logged]);
        assert!(csv.is_ok());
        assert_eq!(
            csv.unwrap_or_default(),
            "Timestamp,Action,Resource,User,Details\n\
             2024-11-27T10:00:00.000Z,login,auth,user1@demo.com,\"{\"\"ip\"\":\"\"10.0.0.1\"\"}\""
        );
    }

    #[test]
    fn csv_of_nothing_is_just_the_header() {
        assert_eq!(
            render_csv(&[]).unwrap_or_default(),
            "Timestamp,Action,Resource,User,Details"
        );
    }
}
