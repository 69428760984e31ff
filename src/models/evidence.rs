//! 证据条目
//!
//! 搜索服务返回的候选文档，每个条目只会被一个 worker 消费一次

use serde::{Deserialize, Serialize};

/// 搜索 API 原始响应
///
/// 没有结果时 `items` 字段整体缺失，按空列表处理
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// 搜索 API 原始条目
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(rename = "formattedUrl", default)]
    pub formatted_url: String,
}

/// 证据条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// 稳定标识 / 链接，非空
    pub link: String,
    /// 标题（仅用于日志）
    pub title: String,
    /// 摘要片段
    pub snippet: String,
}

impl EvidenceItem {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: String::new(),
            snippet: String::new(),
        }
    }
}

impl From<SearchItem> for EvidenceItem {
    fn from(item: SearchItem) -> Self {
        Self {
            link: item.link,
            title: item.title,
            snippet: item.snippet,
        }
    }
}
