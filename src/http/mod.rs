//! 表现层
//!
//! `GET /api/matchup?champ=&opp=&role=`，把 `Resolution` 映射为响应码：
//!
//! | 状态 | 响应码 |
//! |------|--------|
//! | Ok | 200 |
//! | PartialSuccess | 206 |
//! | BadRequest | 400 |
//! | Timeout | 408 |
//! | Internal | 500 |

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::{Query as QueryParams, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{Query, Resolution};
use crate::orchestrator::Orchestrator;

/// 构建路由
pub fn router(orchestrator: Arc<Orchestrator>, allowed_origin: &str) -> Router {
    Router::new()
        .route("/api/matchup", get(matchup_handler))
        .layer(build_cors_layer(allowed_origin))
        .with_state(orchestrator)
}

/// 缺失的参数按空字符串处理，由编排器返回 BadRequest
async fn matchup_handler(
    State(orchestrator): State<Arc<Orchestrator>>,
    QueryParams(query): QueryParams<Query>,
) -> Response {
    orchestrator.resolve(&query).await.into_response()
}

impl IntoResponse for Resolution {
    fn into_response(self) -> Response {
        match self {
            Resolution::Ok { advice } => {
                (StatusCode::OK, Json(json!({ "advice": advice }))).into_response()
            }
            Resolution::PartialSuccess { advice, errors } => (
                StatusCode::PARTIAL_CONTENT,
                Json(json!({ "advice": advice, "errors": errors })),
            )
                .into_response(),
            Resolution::BadRequest { reason } => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": reason }))).into_response()
            }
            Resolution::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                Json(json!({ "error": "处理超时，已终止" })),
            )
                .into_response(),
            Resolution::Internal { reason } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": reason })),
            )
                .into_response(),
        }
    }
}

fn build_cors_layer(allowed_origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86_400));

    match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            warn!("跨域来源配置无效 ({}): {}，不允许跨域", allowed_origin, e);
            cors
        }
    }
}

/// 启动 HTTP 服务，收到 Ctrl-C / SIGTERM 后优雅退出
pub async fn serve(config: &Config, orchestrator: Arc<Orchestrator>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("无法监听地址: {}", config.listen_addr))?;

    info!("✓ 开始监听: {}", config.listen_addr);

    axum::serve(listener, router(orchestrator, &config.allowed_origin))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    info!("服务已关闭");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("无法监听 Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("无法监听 SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("正在关闭服务...");
}
