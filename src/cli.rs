// 命令行参数定义

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pinyin-camera",
    version,
    about = "Photograph Traditional Chinese text and read it back with pinyin"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Data directory (storage file and offline cache)")]
    pub data_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Text recognition endpoint")]
    pub endpoint: Option<String>,
    #[arg(short, long, global = true, help = "Print debug logs to stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recognize an image and print one card per line
    Capture {
        image: PathBuf,
        #[arg(long, help = "Output machine-readable JSON")]
        json: bool,
    },
    /// Show or change the stored API key
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Install or query the offline asset cache
    Cache {
        #[arg(
            long,
            help = "Origin the asset list is resolved against (defaults to the current directory)"
        )]
        origin: Option<String>,
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the stored API key (masked unless --reveal)
    Show {
        #[arg(long, default_value_t = false)]
        reveal: bool,
    },
    /// Save a new API key
    SetKey { key: String },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Pre-fetch the asset list into the offline cache
    Install,
    /// Serve a request cache-first, falling back to the network
    Fetch {
        url: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}
