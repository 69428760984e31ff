/// 搜索 API 客户端
///
/// 封装网页自定义搜索 JSON API 的调用逻辑
use crate::config::Config;
use crate::error::ProviderError;
use crate::models::{Query, SearchResponse};
use tracing::debug;

/// 搜索客户端
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    engine_id: String,
    result_count: u32,
}

impl SearchClient {
    /// 创建新的搜索客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.search_api_base_url.clone(),
            api_key: config.search_api_key.clone(),
            engine_id: config.search_engine_id.clone(),
            result_count: config.search_result_count,
        }
    }

    /// 构建搜索词
    pub fn search_terms(query: &Query) -> String {
        format!(
            "{} v {} {} reddit",
            query.champion, query.opponent, query.role
        )
    }

    /// 执行搜索
    ///
    /// 响应中没有 `items` 时返回空列表，不算错误
    pub async fn search(&self, query: &Query) -> Result<SearchResponse, ProviderError> {
        let terms = Self::search_terms(query);
        debug!("搜索词: {}", terms);

        let count = self.result_count.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", terms.as_str()),
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("num", count.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                endpoint: self.base_url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::BadResponse {
                endpoint: self.base_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| ProviderError::DecodeFailed {
                reason: e.to_string(),
            })?;

        debug!("搜索返回 {} 个条目", body.items.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SearchClient {
        let config = Config {
            search_api_base_url: format!("{}/customsearch/v1", server.uri()),
            search_api_key: "key".to_string(),
            search_engine_id: "cx".to_string(),
            ..Config::default()
        };
        SearchClient::new(&config)
    }

    #[test]
    fn test_search_terms() {
        let query = Query::new("Darius", "Garen", "top");
        assert_eq!(SearchClient::search_terms(&query), "Darius v Garen top reddit");
    }

    #[tokio::test]
    async fn test_search_parses_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("q", "Darius v Garen top reddit"))
            .and(query_param("num", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {
                        "title": "Darius vs Garen tips",
                        "link": "https://www.reddit.com/r/summonerschool/comments/abc/darius_vs_garen/",
                        "snippet": "...",
                        "formattedUrl": "https://www.reddit.com/r/summonerschool/..."
                    }
                ]
            })))
            .mount(&server)
            .await;

        let response = client_for(&server)
            .search(&Query::new("Darius", "Garen", "top"))
            .await
            .unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].title, "Darius vs Garen tips");
    }

    #[tokio::test]
    async fn test_search_without_items_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "searchInformation": { "totalResults": "0" }
            })))
            .mount(&server)
            .await;

        let response = client_for(&server)
            .search(&Query::new("Teemo", "Yuumi", "support"))
            .await
            .unwrap();

        assert!(response.items.is_empty());
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search(&Query::new("Darius", "Garen", "top"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::BadResponse { status: 403, .. }));
    }

    /// 需要 CUSTOM_SEARCH_API_KEY / CUSTOM_SEARCH_CSE_ID
    #[tokio::test]
    #[ignore]
    async fn test_live_search() {
        let client = SearchClient::new(&Config::from_env());
        let response = client
            .search(&Query::new("Darius", "Garen", "top"))
            .await
            .unwrap();

        assert!(response.items.len() <= 4);
    }
}
