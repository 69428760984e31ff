//! 处理结果模型
//!
//! - `WorkResult`：单个证据条目的处理结果，由一个 worker 产生、聚合器消费一次
//! - `AggregateOutcome`：所有 worker 汇报完成后的聚合结果
//! - `Resolution`：一次请求的最终结果，调用方总能拿到明确的状态

/// 单个条目的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkResult {
    /// 可用的文本产物
    Artifact(String),
    /// 处理器明确表示内容与查询无关，静默丢弃
    SoftFailure(String),
    /// 抓取 / 生成失败，连同成功的产物一并返回给调用方
    HardFailure(String),
}

/// 聚合结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateOutcome {
    /// 所有产物按完成顺序拼接，每个产物后跟一个空行
    pub final_text: String,
    /// 硬失败原因，按完成顺序
    pub errors: Vec<String>,
    /// 产物数量
    pub artifact_count: usize,
    /// 是否所有结果都是软失败
    pub all_soft: bool,
}

impl AggregateOutcome {
    /// 从完整的结果集合构建聚合结果
    ///
    /// 结果顺序即 worker 完成顺序，不按条目排名重排。
    pub fn from_results(results: Vec<WorkResult>) -> Self {
        let total = results.len();
        let mut outcome = Self::default();
        let mut soft = 0usize;

        for result in results {
            match result {
                WorkResult::Artifact(text) => {
                    outcome.final_text.push_str(&text);
                    outcome.final_text.push_str("\n\n");
                    outcome.artifact_count += 1;
                }
                WorkResult::SoftFailure(_) => soft += 1,
                WorkResult::HardFailure(reason) => outcome.errors.push(reason),
            }
        }

        outcome.all_soft = total > 0 && soft == total;
        outcome
    }

    pub fn has_artifacts(&self) -> bool {
        self.artifact_count > 0
    }
}

/// 请求状态码（表现层据此映射响应码）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    Ok,
    PartialSuccess,
    BadRequest,
    Timeout,
    Internal,
}

/// 一次请求的最终结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 完整建议（也可能是低置信度占位文本）
    Ok { advice: String },
    /// 部分条目硬失败，但已有可用产物
    PartialSuccess { advice: String, errors: Vec<String> },
    /// 查询字段不完整
    BadRequest { reason: String },
    /// 整体期限已到
    Timeout,
    /// 缓存或搜索不可用
    Internal { reason: String },
}

impl Resolution {
    pub fn status(&self) -> ResolveStatus {
        match self {
            Resolution::Ok { .. } => ResolveStatus::Ok,
            Resolution::PartialSuccess { .. } => ResolveStatus::PartialSuccess,
            Resolution::BadRequest { .. } => ResolveStatus::BadRequest,
            Resolution::Timeout => ResolveStatus::Timeout,
            Resolution::Internal { .. } => ResolveStatus::Internal,
        }
    }

    /// 建议文本（如有）
    pub fn advice(&self) -> Option<&str> {
        match self {
            Resolution::Ok { advice } | Resolution::PartialSuccess { advice, .. } => Some(advice.as_str()),
            _ => None,
        }
    }
}
