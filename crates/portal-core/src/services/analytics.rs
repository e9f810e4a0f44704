//! Lightweight traffic analytics.
//!
//! Page views are per-path, per-day counters under
//! `analytics:views:{date}:{path}`. Counters use a plain read-modify-write;
//! concurrent writers can race and last write wins, which is acceptable for
//! this traffic profile.

use serde::{Deserialize, Serialize};

use crate::store::Store;

use super::ServiceResult;

/// View count for one path on one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageViewCount {
    pub path: String,
    pub views: u64,
}

/// Page-view recorder and reporter.
pub struct PageViews<'a> {
    store: &'a Store,
}

impl<'a> PageViews<'a> {
    /// Create a new page-view service.
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Record a view of `path` for today (UTC). Returns the new count.
    pub fn record(&self, path: &str) -> ServiceResult<u64> {
        self.record_on(&today(), path)
    }

    /// Record a view for an explicit date (YYYY-MM-DD).
    pub fn record_on(&self, date: &str, path: &str) -> ServiceResult<u64> {
        let key = view_key(date, path);
        let current: u64 = self.store.get_json(&key)?.unwrap_or(0);
        let next = current + 1;
        self.store.set_json(&key, &next)?;
        Ok(next)
    }

    /// All per-path counts for a date, most-viewed first.
    pub fn views_for_date(&self, date: &str) -> ServiceResult<Vec<PageViewCount>> {
        let prefix = format!("analytics:views:{}:", date);
        let keys = self.store.list_keys(&prefix)?;

        let mut counts = Vec::new();
        for key in keys {
            let views: u64 = self.store.get_json(&key)?.unwrap_or(0);
            let path = key[prefix.len()..].to_string();
            counts.push(PageViewCount { path, views });
        }

        counts.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.path.cmp(&b.path)));
        Ok(counts)
    }
}

fn view_key(date: &str, path: &str) -> String {
    format!("analytics:views:{}:{}", date, path)
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
