//! 条目处理服务 - 业务能力层
//!
//! 把一个证据条目变成一段文本产物：抓取 → 摘要，严格顺序执行

use async_trait::async_trait;
use tracing::debug;

use crate::clients::{LlmClient, RedditClient};
use crate::config::Config;
use crate::error::ItemError;
use crate::models::{EvidenceItem, Query};
use crate::services::summary_service::SummaryService;
use crate::services::thread_parser;

/// 条目处理器
///
/// 返回文本中包含 `NOT_APPLICABLE_MARKER` 表示内容与查询无关（软失败），
/// 返回 `Err` 表示硬失败。
#[async_trait]
pub trait ItemProcessor: Send + Sync {
    async fn process(&self, item: &EvidenceItem, query: &Query) -> Result<String, ItemError>;
}

/// 帖子处理器
pub struct ThreadItemProcessor {
    reddit_client: RedditClient,
    summary_service: SummaryService,
}

impl ThreadItemProcessor {
    pub fn new(config: &Config) -> Self {
        Self {
            reddit_client: RedditClient::new(config),
            summary_service: SummaryService::new(LlmClient::new(config), config.thread_limits()),
        }
    }
}

#[async_trait]
impl ItemProcessor for ThreadItemProcessor {
    async fn process(&self, item: &EvidenceItem, query: &Query) -> Result<String, ItemError> {
        let listing = self.reddit_client.fetch_thread(&item.link).await?;

        let thread = thread_parser::parse_listing(&listing)
            .map_err(|e| ItemError::scrape(&item.link, &e))?;
        debug!("帖子解析完成: {} 个节点 ({})", thread.len(), item.link);

        self.summary_service
            .summarize(&thread, query)
            .await
            .map_err(|e| ItemError::summarize(&item.link, &e))
    }
}
