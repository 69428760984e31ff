/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use crate::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 读取 `RUST_LOG`，默认 `info`。重复调用不会报错，测试里可以随意调用。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 服务启动 - 对局建议");
    info!("🌐 监听地址: {}", config.listen_addr);
    info!("⏱ 请求期限: {} 秒", config.request_deadline_secs);
    match config.max_concurrent_items {
        Some(limit) => info!("📊 条目并发上限: {}", limit),
        None => info!("📊 条目并发上限: 不限（每个条目一个 worker）"),
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
