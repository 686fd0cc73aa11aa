//! 命令模块
//!
//! 把命令行子命令转换为对 Actor 的调用，按功能分组：
//! - capture: 拍摄识别
//! - settings: API Key 设置
//! - cache: 离线缓存

pub mod cache;
pub mod capture;
pub mod settings;

use anyhow::{bail, Result};
use reqwest::Client;
use tracing::info;

use crate::actors::{AppActor, AppHandle, ResponseSource};
use crate::cli::{CacheCommands, Commands, SettingsCommands};
use crate::config::{self, RuntimeConfig};
use crate::offline;
use crate::AppState;

/// 启动 App Actor
fn spawn_app(state: AppState) -> AppHandle {
    let (actor, handle) = AppActor::new(state);
    tokio::spawn(actor.run());
    handle
}

/// 执行一个子命令
pub async fn dispatch(command: Commands, config: &RuntimeConfig, client: Client) -> Result<()> {
    match command {
        Commands::Capture { image, json } => {
            let state = AppState::new(config, client).await?;
            let mut events = state.event_bus.subscribe();
            let handle = spawn_app(state);
            let cards = capture::capture_image(&handle, &mut events, image).await?;
            println!("{}", capture::render_cards(&cards, json)?);
        }

        Commands::Settings { command } => {
            let handle = spawn_app(AppState::new(config, client).await?);
            match command {
                SettingsCommands::Show { reveal } => {
                    println!("{}", settings::show_api_key(&handle, reveal).await?);
                }
                SettingsCommands::SetKey { key } => {
                    let status = settings::set_api_key(&handle, key).await?;
                    if !status.is_success() {
                        bail!(status.message);
                    }
                    println!("{}", status.message);
                }
            }
        }

        Commands::Cache { origin, command } => {
            let origin = config::resolve_origin(origin.as_deref())?;
            info!("离线缓存来源: {}", origin);
            let handle =
                cache::start_offline_cache(config, origin, offline::default_assets(), client)
                    .await?;
            match command {
                CacheCommands::Install => {
                    let report = handle.install().await?;
                    println!("{}", cache::describe_install(&report));
                }
                CacheCommands::Fetch { url, output } => {
                    let outcome = cache::fetch_asset(&handle, &url, output.as_deref()).await?;
                    let source = match outcome.source {
                        ResponseSource::Cache => "cache",
                        ResponseSource::Network => "network",
                    };
                    eprintln!(
                        "{} {} ({}, {} bytes)",
                        outcome.response.status,
                        outcome.response.url,
                        source,
                        outcome.response.body.len()
                    );
                    if output.is_none() {
                        println!("{}", String::from_utf8_lossy(&outcome.response.body));
                    }
                }
            }
        }
    }

    Ok(())
}
