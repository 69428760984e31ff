//! 缓存层
//!
//! `CacheStore` 是编排器唯一跨请求存活的状态。实现必须能被并发访问；
//! 编排器不会对不同的键加锁。

pub mod memory;

pub use memory::MemoryCache;

use crate::error::CacheError;
use async_trait::async_trait;
use std::time::Duration;

/// 键值缓存，带过期时间
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 读取缓存
    ///
    /// 未命中返回 `Ok(None)`，与存储错误严格区分
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// 写入缓存，覆盖同键的旧值
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}
