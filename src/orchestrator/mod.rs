//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 把 N 个彼此独立、缓慢且可能失败的远程任务，在一个总期限内
//! 汇总成一个响应，并负责缓存读写。
//!
//! ## 模块划分
//!
//! ### `resolver` - 单次请求编排
//! - 校验查询、构造缓存键
//! - 缓存查找（命中直接返回，存储错误直接失败，不绕过缓存）
//! - 搜索证据、零结果写占位文本
//! - 聚合结果并回写缓存（写入失败只记日志）
//!
//! ### `fan_out` - 扇出 / 扇入
//! - 每个条目一个 worker（可选 Semaphore 上限）
//! - 结果按完成顺序汇入聚合器，顺序不确定
//! - 期限到达立即返回，剩余 worker 中止
//!
//! ## 层次关系
//!
//! ```text
//! http (表现层)
//!     ↓
//! orchestrator::resolver (处理单次请求)
//!     ↓
//! orchestrator::fan_out (处理 Vec<EvidenceItem>)
//!     ↓
//! services (能力层：evidence / item processor / summary)
//!     ↓
//! clients + cache (基础设施)
//! ```

pub mod fan_out;
pub mod resolver;

pub use fan_out::FanIn;
pub use resolver::{Dependencies, Orchestrator, OrchestratorSettings};
