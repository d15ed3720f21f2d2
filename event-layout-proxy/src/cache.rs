use std::collections::HashMap;
use std::sync::Arc;

use event_layout::RawEvent;
use log::debug;
use reqwest::Url;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

pub struct Config {
    pub enabled: bool,
    pub ttl: Duration,
}

struct Entry {
    expires: Instant,
    rows: Arc<Vec<RawEvent>>,
}

/// Upstream rows by source URL. Entries are served until their TTL runs
/// out; a disabled cache never holds anything.
pub struct RowCache {
    ttl: Option<Duration>,
    entries: RwLock<HashMap<Url, Entry>>,
}

impl RowCache {
    pub fn new(config: Config) -> Self {
        Self {
            ttl: config.enabled.then_some(config.ttl),
            entries: RwLock::default(),
        }
    }

    pub async fn get(&self, url: &Url) -> Option<Arc<Vec<RawEvent>>> {
        self.ttl?;

        let entries = self.entries.read().await;
        let entry = entries.get(url)?;
        (entry.expires > Instant::now()).then(|| Arc::clone(&entry.rows))
    }

    pub async fn insert(&self, url: Url, rows: Vec<RawEvent>) -> Arc<Vec<RawEvent>> {
        let rows = Arc::new(rows);
        let Some(ttl) = self.ttl else {
            return rows;
        };

        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, entry| entry.expires > now);
        if entries.len() < before {
            debug!("Dropped {} expired cache entries", before - entries.len());
        }

        entries.insert(
            url,
            Entry {
                expires: now + ttl,
                rows: Arc::clone(&rows),
            },
        );

        rows
    }
}
