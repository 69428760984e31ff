use crate::error::ConfigError;
use crate::orchestrator::OrchestratorSettings;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 默认低置信度占位文本
pub const DEFAULT_PLACEHOLDER: &str =
    "We aren't confident about the availability of advice on Reddit for this matchup :(";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 监听地址
    pub listen_addr: String,
    /// 允许跨域的前端来源
    pub allowed_origin: String,
    /// 单次请求的总期限（秒）
    pub request_deadline_secs: u64,
    /// 缓存过期时间（秒）
    pub cache_ttl_secs: u64,
    /// 低置信度占位文本
    pub placeholder_text: String,
    /// 同时处理的条目上限，None 表示每个条目一个 worker
    pub max_concurrent_items: Option<usize>,
    // --- 搜索 API 配置 ---
    pub search_api_key: String,
    pub search_engine_id: String,
    pub search_api_base_url: String,
    pub search_result_count: u32,
    // --- Reddit API 配置 ---
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_username: String,
    pub reddit_password: String,
    pub reddit_app_name: String,
    pub reddit_auth_base_url: String,
    pub reddit_api_base_url: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_max_tokens: u32,
    // --- 评论树裁剪 ---
    pub top_comments: usize,
    pub top_replies: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            allowed_origin: "https://leagueofmatchups.ai".to_string(),
            request_deadline_secs: 180,
            cache_ttl_secs: 2_592_000,
            placeholder_text: DEFAULT_PLACEHOLDER.to_string(),
            max_concurrent_items: None,
            search_api_key: String::new(),
            search_engine_id: String::new(),
            search_api_base_url: "https://www.googleapis.com/customsearch/v1".to_string(),
            search_result_count: 4,
            reddit_client_id: String::new(),
            reddit_client_secret: String::new(),
            reddit_username: String::new(),
            reddit_password: String::new(),
            reddit_app_name: "matchup-advice".to_string(),
            reddit_auth_base_url: "https://www.reddit.com".to_string(),
            reddit_api_base_url: "https://oauth.reddit.com".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_max_tokens: 2200,
            top_comments: 5,
            top_replies: 2,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(default.listen_addr),
            allowed_origin: std::env::var("ALLOWED_ORIGIN").unwrap_or(default.allowed_origin),
            request_deadline_secs: std::env::var("REQUEST_DEADLINE_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_deadline_secs),
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.cache_ttl_secs),
            placeholder_text: std::env::var("PLACEHOLDER_TEXT").unwrap_or(default.placeholder_text),
            max_concurrent_items: std::env::var("MAX_CONCURRENT_ITEMS").ok().and_then(|v| v.parse().ok()).or(default.max_concurrent_items),
            search_api_key: std::env::var("CUSTOM_SEARCH_API_KEY").unwrap_or(default.search_api_key),
            search_engine_id: std::env::var("CUSTOM_SEARCH_CSE_ID").unwrap_or(default.search_engine_id),
            search_api_base_url: std::env::var("CUSTOM_SEARCH_BASE_URL").unwrap_or(default.search_api_base_url),
            search_result_count: std::env::var("CUSTOM_SEARCH_RESULT_COUNT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.search_result_count),
            reddit_client_id: std::env::var("REDDIT_CLIENT_ID").unwrap_or(default.reddit_client_id),
            reddit_client_secret: std::env::var("REDDIT_CLIENT_SECRET").unwrap_or(default.reddit_client_secret),
            reddit_username: std::env::var("REDDIT_CLIENT_USERNAME").unwrap_or(default.reddit_username),
            reddit_password: std::env::var("REDDIT_CLIENT_PASSWORD").unwrap_or(default.reddit_password),
            reddit_app_name: std::env::var("REDDIT_APP_NAME").unwrap_or(default.reddit_app_name),
            reddit_auth_base_url: std::env::var("REDDIT_AUTH_BASE_URL").unwrap_or(default.reddit_auth_base_url),
            reddit_api_base_url: std::env::var("REDDIT_API_BASE_URL").unwrap_or(default.reddit_api_base_url),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_tokens),
            top_comments: std::env::var("TOP_COMMENTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.top_comments),
            top_replies: std::env::var("TOP_REPLIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.top_replies),
        }
    }

    /// 从 TOML 文件加载配置，缺失字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// `MATCHUP_CONFIG` 指向的文件优先，否则读环境变量
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var("MATCHUP_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_toml_file(path),
            _ => Ok(Self::from_env()),
        }
    }

    /// 编排器使用的设置
    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            deadline: Duration::from_secs(self.request_deadline_secs),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            placeholder: self.placeholder_text.clone(),
            max_concurrent_items: self.max_concurrent_items,
        }
    }

    /// 每层保留的评论数
    pub fn thread_limits(&self) -> Vec<usize> {
        vec![self.top_comments, self.top_replies]
    }
}
