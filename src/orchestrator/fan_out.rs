//! 扇出 / 扇入
//!
//! 每个证据条目一个 worker，结果经 `JoinSet` 按完成顺序回到聚合器。
//! 期限到达时聚合器立即返回，剩余 worker 被中止，它们的结果直接丢弃。

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use crate::models::{EvidenceItem, Query, WorkResult};
use crate::services::{ItemProcessor, NOT_APPLICABLE_MARKER};
use crate::utils::logging::truncate_text;

/// 扇入结果
#[derive(Debug)]
pub enum FanIn {
    /// 所有 worker 都在期限内汇报，顺序即完成顺序
    Complete(Vec<WorkResult>),
    /// 期限先到，`reported` 为已汇报的数量
    DeadlineElapsed { reported: usize, total: usize },
}

/// 并行处理所有条目并收集结果
///
/// `max_concurrent` 为 `None` 时 worker 数等于条目数
pub async fn fan_out(
    processor: Arc<dyn ItemProcessor>,
    items: Vec<EvidenceItem>,
    query: &Query,
    deadline: Instant,
    max_concurrent: Option<usize>,
) -> FanIn {
    let total = items.len();
    let limiter = max_concurrent.map(|n| Arc::new(Semaphore::new(n.max(1))));
    let mut workers = JoinSet::new();

    for item in items {
        let processor = Arc::clone(&processor);
        let query = query.clone();
        let limiter = limiter.clone();

        workers.spawn(async move {
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            run_worker(processor.as_ref(), &item, &query).await
        });
    }

    let mut results = Vec::with_capacity(total);
    let collected = timeout_at(deadline, async {
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("worker 异常退出: {}", e);
                    results.push(WorkResult::HardFailure(format!("worker 异常退出: {}", e)));
                }
            }
        }
    })
    .await;

    match collected {
        Ok(()) => FanIn::Complete(results),
        Err(_) => {
            workers.abort_all();
            FanIn::DeadlineElapsed {
                reported: results.len(),
                total,
            }
        }
    }
}

/// 单个 worker：处理一个条目并分类结果
async fn run_worker(processor: &dyn ItemProcessor, item: &EvidenceItem, query: &Query) -> WorkResult {
    match processor.process(item, query).await {
        Ok(text) if text.contains(NOT_APPLICABLE_MARKER) => {
            debug!("条目与对局无关: {}", item.link);
            WorkResult::SoftFailure(format!("内容与对局无关: {}", item.link))
        }
        Ok(text) => {
            debug!("条目处理完成: {} -> {}", item.link, truncate_text(&text, 60));
            WorkResult::Artifact(text)
        }
        Err(e) => {
            warn!("条目处理失败: {}", e);
            WorkResult::HardFailure(e.to_string())
        }
    }
}
