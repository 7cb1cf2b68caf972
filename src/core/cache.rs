//! 神煞结果缓存
//!
//! 基于 moka 的有界缓存，淘汰策略为 LRU：
//! - moka 负责容量上限与真实时间的过期
//! - 条目另记逻辑过期时间，读取时按调用方给出的当前时间惰性判断
//! - 缓存自身线程安全，统计计数用原子变量

use crate::core::models::CacheConfig;
use chrono::{DateTime, Duration, Utc};
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// 过期时长上限约一百三十年
const MAX_TTL_SECS: u64 = u32::MAX as u64;

/// 缓存条目
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<String>,
    expires_at: DateTime<Utc>,
}

/// 缓存统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// 当前条目数
    pub size: usize,
    /// 容量上限
    pub capacity: usize,
    /// 命中次数
    pub hits: u64,
    /// 未命中次数（含过期）
    pub misses: u64,
}

/// 有界 LRU + TTL 缓存
pub struct MarkerCache {
    entries: Cache<String, CacheEntry>,
    capacity: usize,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MarkerCache {
    /// 创建缓存；容量为 0 时不保存任何条目
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let ttl = ttl.clamp(Duration::zero(), Duration::seconds(MAX_TTL_SECS as i64));
        let entries = Cache::builder()
            .max_capacity(capacity as u64)
            .time_to_live(ttl.to_std().unwrap_or_default())
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self {
            entries,
            capacity,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        let secs = config.ttl_secs.min(MAX_TTL_SECS) as i64;
        Self::new(config.capacity, Duration::seconds(secs))
    }

    /// 读取条目；已过期则删除并视为未命中
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<Vec<String>> {
        match self.entries.get(key) {
            Some(entry) if now <= entry.expires_at => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value)
            }
            Some(_) => {
                self.entries.invalidate(key);
                tracing::debug!("缓存条目已过期: {}", key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// 写入条目，容量满时由 moka 淘汰最久未使用者
    pub fn insert(&self, key: String, value: Vec<String>, now: DateTime<Utc>) {
        if self.capacity == 0 {
            return;
        }
        let expires_at = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// 清空缓存与统计
    pub fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for MarkerCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}
