//! 摘要服务 - 业务能力层
//!
//! 只负责"把一个帖子变成一段建议"能力，不关心流程

use anyhow::{Context, Result};
use chrono::DateTime;

use crate::clients::LlmClient;
use crate::models::thread::ThreadArena;
use crate::models::Query;

/// 处理器判定内容与查询无关时返回的标记
pub const NOT_APPLICABLE_MARKER: &str = "INVALID-INPUT";

/// 摘要服务
///
/// 职责：
/// - 按层裁剪评论树并渲染成文本
/// - 调用 LLM 生成带引用的要点
/// - 只处理单个帖子
pub struct SummaryService {
    llm_client: LlmClient,
    limits: Vec<usize>,
}

impl SummaryService {
    pub fn new(llm_client: LlmClient, limits: Vec<usize>) -> Self {
        Self { llm_client, limits }
    }

    /// 生成一个帖子的建议摘要
    ///
    /// 内容与对局无关时，返回值包含 `NOT_APPLICABLE_MARKER`
    pub async fn summarize(&self, thread: &ThreadArena, query: &Query) -> Result<String> {
        let formatted = format_thread(thread, &self.limits)?;
        let system_message = build_system_message(query);
        let user_message = format!("Analyze the following data:\n\n{}", formatted);

        self.llm_client
            .chat(&user_message, Some(&system_message))
            .await
            .with_context(|| format!("模型 {} 生成摘要失败", self.llm_client.model_name()))
    }
}

/// 渲染裁剪后的评论树
///
/// 每行格式：`[时间] [标题] [链接] [得分] {内容}`，标题只出现在帖子行，
/// 每深一层多一个制表符。任何一行链接为空都视为错误。
pub fn format_thread(thread: &ThreadArena, limits: &[usize]) -> Result<String> {
    let mut out = String::new();

    for (id, depth) in thread.top_k_view(limits) {
        let node = thread.node(id);
        if node.permalink.is_empty() {
            anyhow::bail!("第 {} 层存在空链接", depth);
        }

        let date = DateTime::from_timestamp(node.created_utc, 0)
            .with_context(|| format!("时间戳超出范围: {}", node.created_utc))?
            .format("%Y-%m-%d %H:%M:%S");

        let title = node
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("[{}] ", t))
            .unwrap_or_default();

        out.push_str(&format!(
            "{}[{}] {}[{}] [{}] {{{}}}\n",
            "\t".repeat(depth),
            date,
            title,
            node.permalink,
            node.score,
            node.content
        ));
    }

    Ok(out)
}

fn build_system_message(query: &Query) -> String {
    format!(
        r#"You are an expert League of Legends analyst. The data below is a Reddit thread (post, comments and replies) that may discuss the {champion} vs {opponent} matchup in the {role} role.

Data format:
[timestamp] [post title] [post link] [score] {{post content}}
    [timestamp] [comment link] [score] {{comment content}}
        [timestamp] [reply link] [score] {{reply content}}

Instructions:
1. Use comments and replies; ignore off-topic or unproductive ones.
2. Weigh recent and higher-scored comments more heavily.
3. If the thread discusses the matchup from {opponent}'s side, adjust the advice so it is for {champion}.
4. Write 4 to 7 bullet points in a formal, third-person tone.
5. Cite every relevant source link for each point, prefixed with "www.reddit.com".

Format:
• Point [Sources: [link1, link2]]

If the thread does not discuss this matchup at all, respond with exactly {marker} and nothing else.

Respond with ONLY the summary."#,
        champion = query.champion,
        opponent = query.opponent,
        role = query.role,
        marker = NOT_APPLICABLE_MARKER,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::thread::{ThreadNode, ROOT};

    fn node(title: Option<&str>, permalink: &str, score: i64, content: &str) -> ThreadNode {
        ThreadNode {
            created_utc: 1_700_000_000,
            title: title.map(str::to_string),
            permalink: permalink.to_string(),
            score,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_format_thread() {
        let mut arena = ThreadArena::new(node(Some("Darius vs Garen"), "/post", 42, "help"));
        let c = arena.push_child(ROOT, node(None, "/c1", 10, "space him"));
        arena.push_child(c, node(None, "/r1", 3, "agreed"));

        let text = format_thread(&arena, &[5, 2]).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "[2023-11-14 22:13:20] [Darius vs Garen] [/post] [42] {help}",
                "\t[2023-11-14 22:13:20] [/c1] [10] {space him}",
                "\t\t[2023-11-14 22:13:20] [/r1] [3] {agreed}",
            ]
        );
    }

    #[test]
    fn test_format_thread_rejects_empty_permalink() {
        let mut arena = ThreadArena::new(node(Some("t"), "/post", 1, ""));
        arena.push_child(ROOT, node(None, "", 1, "orphan"));
        assert!(format_thread(&arena, &[5]).is_err());
    }

    #[test]
    fn test_system_message_mentions_marker() {
        let message = build_system_message(&Query::new("Ahri", "Zed", "mid"));
        assert!(message.contains(NOT_APPLICABLE_MARKER));
        assert!(message.contains("Ahri vs Zed"));
    }
}
