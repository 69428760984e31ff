//! 进程内缓存
//!
//! 过期条目在读取时按未命中处理并顺手清除；
//! 条目数超过阈值后，写入时再整体清扫一次

use super::CacheStore;
use crate::error::CacheError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// 缓存条目
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// 默认清扫阈值
const DEFAULT_SWEEP_THRESHOLD: usize = 1024;

/// 进程内 TTL 缓存
#[derive(Debug)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    sweep_threshold: usize,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_sweep_threshold(DEFAULT_SWEEP_THRESHOLD)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 条目数超过 `threshold` 时，写入前清除所有过期条目
    pub fn with_sweep_threshold(threshold: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            sweep_threshold: threshold,
        }
    }

    /// 未过期的条目数
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Utc::now();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // 已过期：升级为写锁后再确认一次，避免删掉刚写入的新值
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            debug!("缓存键已过期并清除: {}", key);
        }
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| CacheError::WriteFailed {
            key: key.to_string(),
            reason: format!("TTL 超出范围: {}", e),
        })?;

        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| CacheError::WriteFailed {
                key: key.to_string(),
                reason: "过期时间溢出".to_string(),
            })?;

        let mut entries = self.entries.write().await;
        if entries.len() >= self.sweep_threshold {
            let now = Utc::now();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired(now));
            debug!("清扫过期缓存条目: {} -> {}", before, entries.len());
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }
}
