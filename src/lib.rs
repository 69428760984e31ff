//! # Matchup Advice
//!
//! 为"某个位置上两个英雄的对局"生成建议的服务
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `cache/` - `CacheStore` 键值缓存（带过期时间），唯一跨请求存活的状态
//! - `clients/` - 搜索 / Reddit / LLM 的 HTTP 客户端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个查询或单个条目
//! - `EvidenceProvider` - 为查询找候选帖子
//! - `ItemProcessor` - 抓取一个帖子并生成摘要
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/resolver` - 缓存查找 → 搜索 → 扇出 → 聚合 → 回写
//! - `orchestrator/fan_out` - 每个条目一个 worker，总期限内扇入
//!
//! ### ④ 表现层（Presentation）
//! - `http/` - axum 路由，把请求状态映射为响应码
//!
//! ## 模块结构

pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use cache::{CacheStore, MemoryCache};
pub use config::Config;
pub use models::{EvidenceItem, Query, Resolution, ResolveStatus};
pub use orchestrator::{Dependencies, Orchestrator, OrchestratorSettings};
pub use services::{EvidenceProvider, ItemProcessor, NOT_APPLICABLE_MARKER};
