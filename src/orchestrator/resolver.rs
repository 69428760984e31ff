//! 建议解析器 - 编排层
//!
//! ## 职责
//!
//! 一次请求的完整流程：缓存查找 → 搜索证据 → 扇出处理 → 聚合 → 缓存回写。
//! 整个请求共用一个期限。
//!
//! ## 状态机
//!
//! ```text
//! Start → CacheLookup ─┬─ 命中 ──────────────────────────→ Ok
//!                      └─ 未命中 → EvidenceFetch ─┬─ 零结果 → 占位文本（写缓存）
//!                                                 └─ FanOut → FanIn ─┬─ 超时 → Timeout（不写缓存）
//!                                                                    └─ 聚合 → Ok / PartialSuccess
//! ```
//!
//! 不重试搜索或条目处理，重试策略属于各自的协作者。
//! 同一个键的并发请求可能重复走昂贵路径（没有 single-flight）。

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};
use tracing::{error, info, warn};

use crate::cache::{CacheStore, MemoryCache};
use crate::config::{Config, DEFAULT_PLACEHOLDER};
use crate::error::ResolveError;
use crate::models::{AggregateOutcome, Query, Resolution};
use crate::orchestrator::fan_out::{fan_out, FanIn};
use crate::services::{
    EvidenceProvider, ItemProcessor, SearchEvidenceProvider, ThreadItemProcessor,
};

/// 编排器设置
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// 单次请求的总期限
    pub deadline: Duration,
    /// 所有缓存写入使用的过期时间
    pub cache_ttl: Duration,
    /// 低置信度占位文本
    pub placeholder: String,
    /// 同时运行的 worker 上限
    pub max_concurrent_items: Option<usize>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(180),
            cache_ttl: Duration::from_secs(2_592_000),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            max_concurrent_items: None,
        }
    }
}

/// 编排器依赖的协作者
#[derive(Clone)]
pub struct Dependencies {
    pub cache: Arc<dyn CacheStore>,
    pub provider: Arc<dyn EvidenceProvider>,
    pub processor: Arc<dyn ItemProcessor>,
}

impl Dependencies {
    /// 按配置创建线上协作者
    pub fn from_config(config: &Config) -> Self {
        Self {
            cache: Arc::new(MemoryCache::new()),
            provider: Arc::new(SearchEvidenceProvider::new(config)),
            processor: Arc::new(ThreadItemProcessor::new(config)),
        }
    }
}

/// 编排器
pub struct Orchestrator {
    deps: Dependencies,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(deps: Dependencies, settings: OrchestratorSettings) -> Self {
        Self { deps, settings }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Dependencies::from_config(config), config.orchestrator_settings())
    }

    /// 解析一次建议请求
    ///
    /// 总是返回明确的状态，不向调用方抛出原始错误
    pub async fn resolve(&self, query: &Query) -> Resolution {
        match self.try_resolve(query).await {
            Ok(resolution) => resolution,
            Err(e) => {
                match &e {
                    ResolveError::BadRequest { .. } => warn!("{} 请求被拒绝: {}", query, e),
                    _ => error!("{} 请求失败: {}", query, e),
                }
                Resolution::from(e)
            }
        }
    }

    async fn try_resolve(&self, query: &Query) -> Result<Resolution, ResolveError> {
        if let Some(field) = query.first_missing_field() {
            return Err(ResolveError::BadRequest { field });
        }

        let key = query.cache_key();
        let deadline = request_deadline(self.settings.deadline);

        // ========== 缓存查找 ==========
        let cached = timeout_at(deadline, self.deps.cache.get(&key))
            .await
            .map_err(|_| ResolveError::Timeout)?
            .map_err(ResolveError::CacheUnavailable)?;

        if let Some(advice) = cached {
            info!("[{}] ✓ 命中缓存", key);
            return Ok(Resolution::Ok { advice });
        }

        // ========== 搜索证据 ==========
        let items = timeout_at(deadline, self.deps.provider.find(query))
            .await
            .map_err(|_| ResolveError::Timeout)?
            .map_err(ResolveError::EvidenceUnavailable)?;

        if items.is_empty() {
            info!("[{}] 搜索无结果，写入占位文本", key);
            return Ok(self.resolve_with_placeholder(&key, deadline).await);
        }

        info!("[{}] 🔍 找到 {} 个候选帖子，开始并行处理", key, items.len());

        // ========== 扇出 / 扇入 ==========
        let results = match fan_out(
            Arc::clone(&self.deps.processor),
            items,
            query,
            deadline,
            self.settings.max_concurrent_items,
        )
        .await
        {
            FanIn::Complete(results) => results,
            FanIn::DeadlineElapsed { reported, total } => {
                warn!("[{}] ⏱ 期限已到，仅 {}/{} 个条目完成", key, reported, total);
                return Err(ResolveError::Timeout);
            }
        };

        // ========== 聚合 ==========
        let outcome = AggregateOutcome::from_results(results);
        info!(
            "[{}] 聚合完成: 产物 {} 个, 硬失败 {} 个",
            key,
            outcome.artifact_count,
            outcome.errors.len()
        );

        if outcome.all_soft || !outcome.has_artifacts() {
            if !outcome.errors.is_empty() {
                warn!("[{}] 没有可用产物且存在失败: {:?}", key, outcome.errors);
            }
            return Ok(self.resolve_with_placeholder(&key, deadline).await);
        }

        self.write_back(&key, &outcome.final_text, deadline).await;

        if outcome.errors.is_empty() {
            Ok(Resolution::Ok {
                advice: outcome.final_text,
            })
        } else {
            Ok(Resolution::PartialSuccess {
                advice: outcome.final_text,
                errors: outcome.errors,
            })
        }
    }

    /// 缓存并返回占位文本
    async fn resolve_with_placeholder(&self, key: &str, deadline: Instant) -> Resolution {
        let advice = self.settings.placeholder.clone();
        self.write_back(key, &advice, deadline).await;
        Resolution::Ok { advice }
    }

    /// 回写缓存，失败只记日志
    async fn write_back(&self, key: &str, value: &str, deadline: Instant) {
        match timeout_at(deadline, self.deps.cache.set(key, value, self.settings.cache_ttl)).await {
            Ok(Ok(())) => info!("[{}] ✓ 已写入缓存", key),
            Ok(Err(e)) => warn!("[{}] ⚠️ 写入缓存失败: {}", key, e),
            Err(_) => warn!("[{}] ⚠️ 写入缓存超时", key),
        }
    }
}

/// 期限过大时退化为远期时间点，避免 `Instant` 溢出
fn request_deadline(budget: Duration) -> Instant {
    let now = Instant::now();
    match now.checked_add(budget) {
        Some(deadline) => deadline,
        None => {
            warn!("请求期限 {:?} 超出范围，按远期处理", budget);
            now.checked_add(FAR_FUTURE).unwrap_or(now)
        }
    }
}

/// 约 30 年
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

impl From<ResolveError> for Resolution {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::BadRequest { .. } => Resolution::BadRequest {
                reason: err.to_string(),
            },
            ResolveError::Timeout => Resolution::Timeout,
            ResolveError::CacheUnavailable(_) | ResolveError::EvidenceUnavailable(_) => {
                Resolution::Internal {
                    reason: err.to_string(),
                }
            }
        }
    }
}
