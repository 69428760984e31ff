//! 对局查询
//!
//! 一次建议请求由 (英雄, 对手, 位置) 三元组唯一确定

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 对局查询
///
/// 三个字段原样参与缓存键的构造，不做大小写或空白归一化。
/// 需要大小写无关语义的调用方必须在调用前自行归一化。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    /// 己方英雄（subject A）
    #[serde(rename = "champ", default)]
    pub champion: String,

    /// 对位英雄（subject B）
    #[serde(rename = "opp", default)]
    pub opponent: String,

    /// 位置标签（context tag）
    #[serde(default)]
    pub role: String,
}

impl Query {
    /// 创建新的查询
    pub fn new(
        champion: impl Into<String>,
        opponent: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            champion: champion.into(),
            opponent: opponent.into(),
            role: role.into(),
        }
    }

    /// 返回第一个为空的字段名
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.champion.is_empty() {
            Some("champ")
        } else if self.opponent.is_empty() {
            Some("opp")
        } else if self.role.is_empty() {
            Some("role")
        } else {
            None
        }
    }

    /// 缓存键：`<champion>v<opponent>@<role>`
    ///
    /// 纯函数，不做哈希、不做大小写折叠。
    pub fn cache_key(&self) -> String {
        format!("{}v{}@{}", self.champion, self.opponent, self.role)
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} vs {} @ {}]",
            self.champion, self.opponent, self.role
        )
    }
}
