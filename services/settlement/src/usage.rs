//! Usage counting for the presentation layer
//!
//! Counting is best-effort instrumentation: callers record a use after a
//! successful evaluation and must not fail the evaluation if recording fails.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::config::UsageConfig;

pub trait UsageCounter: Send + Sync {
    /// Increment and return the new total
    fn record(&self) -> Result<u64>;

    fn current(&self) -> Result<u64>;
}

/// Persisted counter state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageRecord {
    pub count: u64,
    #[serde(default)]
    pub last_used: Option<i64>,
}

/// Counter stored as a small JSON file. Increments are serialized by a mutex.
pub struct FileUsageCounter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileUsageCounter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable state restarts from zero.
    fn read_record(&self) -> UsageRecord {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return UsageRecord::default(),
        };
        match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Corrupt usage counter at {:?}, resetting: {}", self.path, e);
                UsageRecord::default()
            }
        }
    }

    fn write_record(&self, record: &UsageRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
        }
        let json = serde_json::to_string(record)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write usage counter to {:?}", self.path))?;
        Ok(())
    }
}

impl UsageCounter for FileUsageCounter {
    fn record(&self) -> Result<u64> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("usage counter lock poisoned"))?;

        let mut record = self.read_record();
        record.count += 1;
        record.last_used = Some(chrono::Utc::now().timestamp_millis());
        self.write_record(&record)?;

        tracing::info!("Usage count now {}", record.count);
        Ok(record.count)
    }

    fn current(&self) -> Result<u64> {
        Ok(self.read_record().count)
    }
}

#[derive(Default)]
pub struct InMemoryUsageCounter {
    count: AtomicU64,
}

impl InMemoryUsageCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UsageCounter for InMemoryUsageCounter {
    fn record(&self) -> Result<u64> {
        Ok(self.count.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn current(&self) -> Result<u64> {
        Ok(self.count.load(Ordering::SeqCst))
    }
}

/// Used when counting is disabled
pub struct NoopUsageCounter;

impl UsageCounter for NoopUsageCounter {
    fn record(&self) -> Result<u64> {
        Ok(0)
    }

    fn current(&self) -> Result<u64> {
        Ok(0)
    }
}

pub fn counter_from_config(config: &UsageConfig) -> Box<dyn UsageCounter> {
    if config.enabled {
        Box::new(FileUsageCounter::new(&config.counter_path))
    } else {
        Box::new(NoopUsageCounter)
    }
}

/// Record one use, logging instead of failing
pub fn record_best_effort(counter: &dyn UsageCounter) -> Option<u64> {
    match counter.record() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!("Failed to record usage: {:#}", e);
            None
        }
    }
}
