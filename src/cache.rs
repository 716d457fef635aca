use crate::domain::EmployeeRecord;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Most recently fetched employee records, keyed by email. The poller
/// swaps whole snapshots in; the countdown ticker only ever reads. All
/// replacement is wholesale, so a reader never observes a half-applied
/// refresh.
#[derive(Clone, Default)]
pub struct TaskCache {
    inner: Arc<RwLock<Snapshot>>,
}

#[derive(Default)]
struct Snapshot {
    records: HashMap<String, EmployeeRecord>,
    refreshed_at: Option<DateTime<Local>>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace_all(&self, records: Vec<EmployeeRecord>) {
        let mut snap = self.inner.write().await;
        snap.records = records.into_iter().map(|r| (r.email.clone(), r)).collect();
        snap.refreshed_at = Some(Local::now());
    }

    pub async fn get(&self, email: &str) -> Option<EmployeeRecord> {
        self.inner.read().await.records.get(email).cloned()
    }

    /// Non-admin records, sorted by name for stable rendering.
    pub async fn employees(&self) -> Vec<EmployeeRecord> {
        let snap = self.inner.read().await;
        let mut out: Vec<EmployeeRecord> =
            snap.records.values().filter(|r| !r.is_admin).cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    pub async fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.inner.read().await.refreshed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str, name: &str, is_admin: bool) -> EmployeeRecord {
        serde_json::from_str(&format!(
            r#"{{ "email": "{}", "name": "{}", "isAdmin": {} }}"#,
            email, name, is_admin
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn replace_all_swaps_the_whole_snapshot() {
        let cache = TaskCache::new();
        cache
            .replace_all(vec![record("a@x.io", "Asha", false)])
            .await;
        cache
            .replace_all(vec![record("b@x.io", "Bo", false)])
            .await;

        assert!(cache.get("a@x.io").await.is_none());
        assert!(cache.get("b@x.io").await.is_some());
        assert!(cache.last_refreshed().await.is_some());
    }

    #[tokio::test]
    async fn employees_filters_admins_and_sorts() {
        let cache = TaskCache::new();
        cache
            .replace_all(vec![
                record("z@x.io", "Zoya", false),
                record("boss@x.io", "Boss", true),
                record("a@x.io", "Asha", false),
            ])
            .await;

        let names: Vec<String> = cache
            .employees()
            .await
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Asha", "Zoya"]);
    }
}
