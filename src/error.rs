use thiserror::Error;

/// 缓存存储错误（区别于"未命中"）
#[derive(Debug, Error)]
pub enum CacheError {
    /// 存储不可用
    #[error("缓存存储不可用: {reason}")]
    Unavailable { reason: String },
    /// 写入失败
    #[error("写入缓存键 {key} 失败: {reason}")]
    WriteFailed { key: String, reason: String },
}

/// 搜索服务错误
///
/// "零结果" 不是错误，不会出现在这里
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 网络请求失败
    #[error("搜索请求失败 ({endpoint}): {reason}")]
    RequestFailed { endpoint: String, reason: String },
    /// 返回非 2xx 响应
    #[error("搜索返回错误响应 ({endpoint}): status={status}")]
    BadResponse { endpoint: String, status: u16 },
    /// JSON 解析失败
    #[error("搜索响应解析失败: {reason}")]
    DecodeFailed { reason: String },
}

/// 单个条目的处理错误（硬失败）
#[derive(Debug, Error)]
pub enum ItemError {
    /// 链接不是可识别的帖子地址
    #[error("链接格式不正确: {link}")]
    InvalidLink { link: String },
    /// 抓取失败
    #[error("抓取失败 {link}: {reason}")]
    Scrape { link: String, reason: String },
    /// 生成摘要失败
    #[error("摘要失败 {link}: {reason}")]
    Summarize { link: String, reason: String },
}

impl ItemError {
    /// 用 anyhow 错误链构造抓取错误
    pub fn scrape(link: impl Into<String>, err: &anyhow::Error) -> Self {
        ItemError::Scrape {
            link: link.into(),
            reason: format!("{:#}", err),
        }
    }

    /// 用 anyhow 错误链构造摘要错误
    pub fn summarize(link: impl Into<String>, err: &anyhow::Error) -> Self {
        ItemError::Summarize {
            link: link.into(),
            reason: format!("{:#}", err),
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 请求级错误
///
/// 任何一种都会直接终止本次请求，并跳过缓存回写
#[derive(Debug, Error)]
pub enum ResolveError {
    /// 查询字段为空
    #[error("查询参数 {field} 不能为空")]
    BadRequest { field: &'static str },
    /// 缓存读取失败，不绕过缓存重算
    #[error("缓存不可用: {0}")]
    CacheUnavailable(CacheError),
    /// 搜索失败，不写缓存
    #[error("搜索不可用: {0}")]
    EvidenceUnavailable(ProviderError),
    /// 整体期限已到
    #[error("处理超时，已终止")]
    Timeout,
}
