// 日志系统 - 控制台（stderr）加按天轮转的日志文件

use std::path::Path;

use anyhow::Result;
use time::macros::format_description;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// 初始化日志系统
///
/// 返回的 guard 需要在整个程序生命周期内保持，否则文件日志会丢失
///
/// # 参数
/// - `log_dir`: 日志目录，不存在时自动创建
/// - `verbose`: 控制台是否输出 DEBUG 及以上日志（默认只输出 WARN 及以上）
pub fn init(log_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    // 配置日志输出到文件（每天轮转）
    let file_appender = tracing_appender::rolling::daily(log_dir, "app.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_level = if verbose { Level::DEBUG } else { Level::WARN };
    let max_level = if verbose { Level::DEBUG } else { Level::INFO };

    // 控制台和文件同时输出，控制台只保留较高级别
    let writer = std::io::stderr
        .with_max_level(console_level)
        .and(non_blocking.with_max_level(max_level));

    // 使用本地时区
    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(writer)
        .with_timer(timer)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    tracing::debug!("日志文件位置: {:?}", log_dir);
    Ok(guard)
}
