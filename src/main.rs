use std::sync::Arc;

use anyhow::Result;
use matchup_advice::utils::logging;
use matchup_advice::{http, Config, Orchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::load()?;
    logging::log_startup(&config);

    // 组装编排器并启动服务
    let orchestrator = Arc::new(Orchestrator::from_config(&config));
    http::serve(&config, orchestrator).await?;

    Ok(())
}
