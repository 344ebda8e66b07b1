use chrono::{DateTime, TimeDelta, Utc};
use rbac_console_domain::{AuditLogEntry, Permission, Role, User};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

mod seed;

pub use seed::{DEMO_EMAIL, DEMO_PASSWORD};

/// Records a [`FixtureStore`] starts from.
#[derive(Debug, Clone, Default)]
pub struct FixtureSeed {
    /// Permission collection.
    pub permissions: Vec<Permission>,
    /// Role collection.
    pub roles: Vec<Role>,
    /// User collection.
    pub users: Vec<User>,
    /// Audit collection.
    pub audit_logs: Vec<AuditLogEntry>,
}

impl FixtureSeed {
    /// Returns the demo fixtures: seven permissions, four roles, six users and
    /// eight audit entries.
    #[must_use]
    pub fn demo() -> Self {
        seed::demo_seed()
    }
}

/// Issues string ids from a counter that never goes backwards.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IdSequence {
    next: u64,
}

impl IdSequence {
    fn after<'a>(ids: impl Iterator<Item = &'a str>) -> Self {
        let highest = ids.filter_map(|id| id.parse::<u64>().ok()).max().unwrap_or(0);
        Self {
            next: highest.saturating_add(1),
        }
    }

    pub(crate) fn issue(&mut self) -> String {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id.to_string()
    }
}

/// Timestamp source whose values strictly increase.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MonotonicClock {
    last: Option<DateTime<Utc>>,
}

impl MonotonicClock {
    fn after(stamps: impl Iterator<Item = DateTime<Utc>>) -> Self {
        Self { last: stamps.max() }
    }

    pub(crate) fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last {
            Some(last) if last >= now => last + TimeDelta::milliseconds(1),
            _ => now,
        };
        self.last = Some(stamp);
        stamp
    }
}

/// Collections and sequences guarded together by one lock.
#[derive(Debug)]
pub(crate) struct FixtureCollections {
    pub(crate) permissions: Vec<Permission>,
    pub(crate) roles: Vec<Role>,
    pub(crate) users: Vec<User>,
    pub(crate) audit_logs: Vec<AuditLogEntry>,
    pub(crate) permission_ids: IdSequence,
    pub(crate) role_ids: IdSequence,
    pub(crate) user_ids: IdSequence,
    pub(crate) audit_ids: IdSequence,
    pub(crate) clock: MonotonicClock,
}

/// In-memory source of truth for mock mode.
///
/// Each mutation runs to completion under a single write guard, so concurrent
/// calls never interleave their changes. Ids come from per-collection
/// counters and are not reused after deletes.
#[derive(Debug)]
pub struct FixtureStore {
    collections: RwLock<FixtureCollections>,
}

impl FixtureStore {
    /// Creates a store holding the demo fixtures.
    #[must_use]
    pub fn seeded() -> Self {
        Self::from_seed(FixtureSeed::demo())
    }

    /// Creates a store with no records.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_seed(FixtureSeed::default())
    }

    /// Creates a store holding the given records.
    #[must_use]
    pub fn from_seed(seed: FixtureSeed) -> Self {
        let permission_ids = IdSequence::after(seed.permissions.iter().map(|p| p.id.as_str()));
        let role_ids = IdSequence::after(seed.roles.iter().map(|role| role.id.as_str()));
        let user_ids = IdSequence::after(seed.users.iter().map(|user| user.id.as_str()));
        let audit_ids = IdSequence::after(seed.audit_logs.iter().map(|entry| entry.id.as_str()));
        let clock = MonotonicClock::after(
            seed.permissions
                .iter()
                .flat_map(|permission| [permission.created_at, permission.updated_at])
                .chain(
                    seed.roles
                        .iter()
                        .flat_map(|role| [role.created_at, role.updated_at]),
                )
                .chain(
                    seed.users
                        .iter()
                        .flat_map(|user| [user.created_at, user.updated_at]),
                )
                .chain(seed.audit_logs.iter().map(|entry| entry.timestamp)),
        );

        Self {
            collections: RwLock::new(FixtureCollections {
                permissions: seed.permissions,
                roles: seed.roles,
                users: seed.users,
                audit_logs: seed.audit_logs,
                permission_ids,
                role_ids,
                user_ids,
                audit_ids,
                clock,
            }),
        }
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, FixtureCollections> {
        self.collections.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, FixtureCollections> {
        self.collections.write().await
    }

    /// Returns a copy of the permission collection.
    pub async fn permissions(&self) -> Vec<Permission> {
        self.read().await.permissions.clone()
    }

    /// Returns a copy of the role collection.
    pub async fn roles(&self) -> Vec<Role> {
        self.read().await.roles.clone()
    }

    /// Returns a copy of the user collection.
    pub async fn users(&self) -> Vec<User> {
        self.read().await.users.clone()
    }

    /// Returns a copy of the audit collection in insertion order.
    pub async fn audit_logs(&self) -> Vec<AuditLogEntry> {
        self.read().await.audit_logs.clone()
    }

    /// Appends an audit entry, assigning its id. A `None` timestamp is
    /// stamped with the store clock.
    pub async fn append_audit_entry(
        &self,
        mut entry: AuditLogEntry,
        timestamp: Option<DateTime<Utc>>,
    ) -> AuditLogEntry {
        let mut collections = self.write().await;
        entry.id = collections.audit_ids.issue();
        entry.timestamp = match timestamp {
            Some(timestamp) => timestamp,
            None => collections.clock.tick(),
        };
        collections.audit_logs.push(entry.clone());
        entry
    }
}

impl Default for FixtureStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use rbac_console_domain::AuditLogEntry;
    use serde_json::Map;

    use super::{FixtureSeed, FixtureStore, IdSequence, MonotonicClock};

    #[test]
    fn id_sequence_starts_after_highest_numeric_id() {
        let mut sequence = IdSequence::after(["2", "9", "legacy", "4"].into_iter());
        assert_eq!(sequence.issue(), "10");
        assert_eq!(sequence.issue(), "11");
    }

    #[test]
    fn clock_never_repeats_a_stamp() {
        let mut clock = MonotonicClock::default();
        let first = clock.tick();
        let second = clock.tick();
        let third = clock.tick();
        assert!(first < second);
        assert!(second < third);
    }

    #[tokio::test]
    async fn clock_starts_after_future_dated_seed_records() {
        let future = Utc::now() + TimeDelta::hours(1);
        let mut seed = FixtureSeed::demo();
        if let Some(user) = seed.users.first_mut() {
            user.updated_at = future;
        }
        let store = FixtureStore::from_seed(seed);

        let stamp = store.write().await.clock.tick();
        assert!(stamp > future);
    }

    #[tokio::test]
    async fn seeded_store_holds_demo_fixtures() {
        let store = FixtureStore::seeded();
        assert_eq!(store.permissions().await.len(), 7);
        assert_eq!(store.roles().await.len(), 4);
        assert_eq!(store.users().await.len(), 6);
        assert_eq!(store.audit_logs().await.len(), 8);
    }

    #[tokio::test]
    async fn appended_audit_entries_get_fresh_ids() {
        let store = FixtureStore::from_seed(FixtureSeed::demo());
        let entry = AuditLogEntry {
            id: String::new(),
            action: "login".to_owned(),
            resource: "auth".to_owned(),
            resource_id: "1".to_owned(),
            user_id: "1".to_owned(),
            user_email: "admin@demo.com".to_owned(),
            metadata: Map::new(),
            timestamp: chrono::Utc::now(),
        };

        let appended = store.append_audit_entry(entry, None).await;
        assert_eq!(appended.id, "9");
        assert_eq!(store.audit_logs().await.len(), 9);
    }
}
