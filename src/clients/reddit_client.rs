/// Reddit API 客户端
///
/// 负责 OAuth 取 token 和读取帖子评论树原始 JSON
use crate::config::Config;
use crate::error::ItemError;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// token 提前刷新的余量
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// 帖子链接格式
const THREAD_LINK_PATTERN: &str = r"^https://www\.reddit\.com/r/([^/]+)/comments/([^/?#]+)";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// 帖子定位信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadLocator {
    pub subreddit: String,
    pub post_id: String,
}

/// 解析帖子链接
///
/// 只接受 `https://www.reddit.com/r/<sub>/comments/<id>...` 形式
pub fn parse_thread_link(link: &str) -> Option<ThreadLocator> {
    let re = Regex::new(THREAD_LINK_PATTERN).ok()?;
    let caps = re.captures(link)?;
    Some(ThreadLocator {
        subreddit: caps.get(1)?.as_str().to_string(),
        post_id: caps.get(2)?.as_str().to_string(),
    })
}

/// Reddit 客户端
pub struct RedditClient {
    http: reqwest::Client,
    auth_base_url: String,
    api_base_url: String,
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
    user_agent: String,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    /// 创建新的 Reddit 客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_base_url: config.reddit_auth_base_url.clone(),
            api_base_url: config.reddit_api_base_url.clone(),
            client_id: config.reddit_client_id.clone(),
            client_secret: config.reddit_client_secret.clone(),
            username: config.reddit_username.clone(),
            password: config.reddit_password.clone(),
            user_agent: format!("{} by /u/{}", config.reddit_app_name, config.reddit_username),
            token: Mutex::new(None),
        }
    }

    /// 读取帖子及评论树的原始 JSON
    pub async fn fetch_thread(&self, link: &str) -> Result<Value, ItemError> {
        let locator = parse_thread_link(link).ok_or_else(|| ItemError::InvalidLink {
            link: link.to_string(),
        })?;

        self.fetch_listing(&locator)
            .await
            .map_err(|e| ItemError::scrape(link, &e))
    }

    async fn fetch_listing(&self, locator: &ThreadLocator) -> Result<Value> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/r/{}/comments/{}",
            self.api_base_url, locator.subreddit, locator.post_id
        );
        debug!("读取帖子: {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .with_context(|| format!("请求帖子失败: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("读取帖子返回异常状态码: {}", status.as_u16());
        }

        response.json::<Value>().await.context("帖子 JSON 解析失败")
    }

    /// 取得有效 token，必要时刷新
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() + TOKEN_REFRESH_MARGIN < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.request_token().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<CachedToken> {
        let url = format!("{}/api/v1/access_token", self.auth_base_url);
        debug!("请求 Reddit token");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(&[
                ("grant_type", "password"),
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await
            .context("token 请求失败")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("token 请求返回异常状态码: {}", status.as_u16());
        }

        let token: TokenResponse = response.json().await.context("token 响应解析失败")?;
        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(3600));

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}
