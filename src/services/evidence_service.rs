//! 证据搜索服务 - 业务能力层
//!
//! 只负责"为一个查询找候选帖子"能力

use async_trait::async_trait;
use tracing::debug;

use crate::clients::SearchClient;
use crate::config::Config;
use crate::error::ProviderError;
use crate::models::{EvidenceItem, Query};

/// 证据来源
///
/// 零结果是正常返回（空列表），与请求 / 传输错误区分
#[async_trait]
pub trait EvidenceProvider: Send + Sync {
    async fn find(&self, query: &Query) -> Result<Vec<EvidenceItem>, ProviderError>;
}

/// 基于网页搜索的证据来源
pub struct SearchEvidenceProvider {
    search_client: SearchClient,
}

impl SearchEvidenceProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            search_client: SearchClient::new(config),
        }
    }
}

#[async_trait]
impl EvidenceProvider for SearchEvidenceProvider {
    async fn find(&self, query: &Query) -> Result<Vec<EvidenceItem>, ProviderError> {
        let response = self.search_client.search(query).await?;

        let items: Vec<EvidenceItem> = response
            .items
            .into_iter()
            .filter(|item| {
                let usable = is_well_formed_link(&item.link);
                if !usable {
                    debug!("丢弃链接不合法的搜索结果: {:?}", item.link);
                }
                usable
            })
            .map(EvidenceItem::from)
            .collect();

        Ok(items)
    }
}

/// 非空且为绝对 https 地址
fn is_well_formed_link(link: &str) -> bool {
    match reqwest::Url::parse(link) {
        Ok(url) => url.scheme() == "https" && url.host_str().is_some(),
        Err(_) => false,
    }
}
