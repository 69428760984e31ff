//! 帖子 JSON 解析
//!
//! 把两段式 listing JSON（[帖子, 评论]）转换成 `ThreadArena`。
//! 单条评论格式不对时跳过，帖子本身缺失则报错。

use crate::models::thread::{NodeId, ThreadArena, ThreadNode, ROOT};
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

/// 解析帖子 listing
pub fn parse_listing(listing: &Value) -> Result<ThreadArena> {
    let parts = listing.as_array().context("帖子数据不是数组")?;
    if parts.len() < 2 {
        anyhow::bail!("帖子数据不完整: 只有 {} 段", parts.len());
    }

    let post = parse_post(&parts[0])?;
    let mut arena = ThreadArena::new(post);

    let top_level = listing_children(&parts[1]).context("评论数据格式不正确")?;

    // (父节点, 子评论列表) 工作队列，避免递归
    let mut pending: Vec<(NodeId, &Vec<Value>)> = vec![(ROOT, top_level)];

    while let Some((parent, children)) = pending.pop() {
        for child in children {
            let Some(data) = child.get("data") else {
                continue;
            };

            let comment = match parse_comment(data) {
                Ok(comment) => comment,
                Err(e) => {
                    // "more" 占位节点等会走到这里
                    debug!("跳过无法解析的评论: {:#}", e);
                    continue;
                }
            };

            let id = arena.push_child(parent, comment);

            // 没有回复时 replies 是空字符串
            if let Some(replies) = data.get("replies").and_then(listing_children) {
                pending.push((id, replies));
            }
        }
    }

    Ok(arena)
}

fn listing_children(listing: &Value) -> Option<&Vec<Value>> {
    listing.get("data")?.get("children")?.as_array()
}

fn parse_post(listing: &Value) -> Result<ThreadNode> {
    let data = listing_children(listing)
        .and_then(|children| children.first())
        .and_then(|child| child.get("data"))
        .context("帖子内容缺失")?;

    Ok(ThreadNode {
        created_utc: get_i64(data, "created_utc")?,
        title: Some(get_str(data, "title")?),
        permalink: get_str(data, "permalink")?,
        score: get_i64(data, "score")?,
        content: get_str(data, "selftext")?,
    })
}

fn parse_comment(data: &Value) -> Result<ThreadNode> {
    Ok(ThreadNode {
        created_utc: get_i64(data, "created_utc")?,
        title: None,
        permalink: get_str(data, "permalink")?,
        score: get_i64(data, "score")?,
        content: get_str(data, "body")?,
    })
}

fn get_str(data: &Value, key: &str) -> Result<String> {
    let value = data.get(key).with_context(|| format!("字段 {} 不存在", key))?;
    value
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("字段 {} 不是字符串", key))
}

fn get_i64(data: &Value, key: &str) -> Result<i64> {
    let value = data.get(key).with_context(|| format!("字段 {} 不存在", key))?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .with_context(|| format!("字段 {} 不是数字", key))
}
