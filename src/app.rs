//! 应用程序初始化和启动
//!
//! 负责命令行程序的完整启动流程，包括：
//! - 命令行解析和运行配置
//! - 日志系统初始化
//! - 共享 HTTP 客户端（含系统代理）
//! - 异步运行时和命令分发

use anyhow::Result;
use clap::Parser;
use reqwest::Client;
use tracing::{error, info};

use crate::cli::Cli;
use crate::commands;
use crate::config::RuntimeConfig;
use crate::logger;
use crate::utils;

/// 应用程序入口点
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = RuntimeConfig::with_overrides(cli.data_dir.clone(), cli.endpoint.clone());

    // guard 必须活到程序结束，否则文件日志会丢失
    let _guard = logger::init(&config.log_dir, cli.verbose)?;
    info!("启动繁体字拼音相机...");
    info!("数据目录: {:?}", config.data_dir);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let client = build_http_client()?;
        commands::dispatch(cli.command, &config, client).await
    });

    if let Err(e) = &result {
        error!("命令执行失败: {}", e);
    }
    result
}

/// 创建共享的 HTTP 客户端
///
/// 识别请求不设超时，请求一直等到服务端返回
pub fn build_http_client() -> Result<Client> {
    let builder = utils::detect_system_proxy().apply(Client::builder())?;
    Ok(builder.build()?)
}
