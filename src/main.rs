//! # 阿莲读经典 - 命令行入口
//!
//! 子命令：
//! - `serve`（默认）- 启动 HTTP 服务
//! - `chapters` - 打印经文目录
//! - `interpret --id N` - 在终端中解读指定段落
//!
//! 核心逻辑位于 `lib.rs` 及其子模块，本文件只负责解析参数和初始化日志。

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use daxue_reader::models::interpretation::display_or_placeholder;
use daxue_reader::models::settings::{AppConfig, DEFAULT_PORT};
use daxue_reader::services::content::{find_paragraph, load_chapters, render_outline};
use daxue_reader::services::generation::HttpGenerationClient;
use daxue_reader::services::interpreter::Interpreter;
use daxue_reader::services::proxy::InterpretProxy;

#[derive(Parser, Debug)]
#[command(name = "daxue-reader", version, about = "阿莲读经典：《大学》阅读与 AI 解读服务")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 启动 HTTP 服务
    Serve {
        /// 监听端口
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// 静态文件根目录
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// 凭证文件
        #[arg(long, default_value = ".env")]
        env_file: PathBuf,

        /// 统计数据文件
        #[arg(long, default_value = "analytics.json")]
        analytics_file: PathBuf,
    },

    /// 打印经文目录
    Chapters {
        /// 原文数据文件
        #[arg(long, default_value = "data.json")]
        data: PathBuf,
    },

    /// 解读指定段落
    Interpret {
        /// 段落 id
        #[arg(long)]
        id: i64,

        /// 原文数据文件
        #[arg(long, default_value = "data.json")]
        data: PathBuf,

        /// 凭证文件
        #[arg(long, default_value = ".env")]
        env_file: PathBuf,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve {
            port: DEFAULT_PORT,
            root: PathBuf::from("."),
            env_file: PathBuf::from(".env"),
            analytics_file: PathBuf::from("analytics.json"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        Command::Serve {
            port,
            root,
            env_file,
            analytics_file,
        } => {
            let config = daxue_reader::load_config(AppConfig {
                port,
                static_root: root,
                env_file,
                analytics_file,
                ..AppConfig::default()
            });
            daxue_reader::run(config)
                .await
                .with_context(|| format!("无法在端口 {} 启动服务", port))?;
        }

        Command::Chapters { data } => {
            let chapters = load_chapters(&data).await.map_err(|e| anyhow!(e))?;
            println!("{}", render_outline(&chapters));
        }

        Command::Interpret { id, data, env_file } => {
            let chapters = load_chapters(&data).await.map_err(|e| anyhow!(e))?;
            let Some((chapter, paragraph)) = find_paragraph(&chapters, id) else {
                bail!("找不到段落 {}", id);
            };

            let config = daxue_reader::load_config(AppConfig {
                env_file,
                ..AppConfig::default()
            });
            let client = Arc::new(HttpGenerationClient::new(config.upstream_base.clone()));
            let interpreter = Interpreter::new(Arc::new(InterpretProxy::new(&config, client)));

            let Some(done) = interpreter.interpret(paragraph).await? else {
                return Ok(());
            };

            println!("【{}】{}\n", chapter.name, chapter.subtitle);
            println!("{}\n", done.original_text);
            let result = &done.result;
            for (title, section) in [
                ("白话文解释", &result.explanation),
                ("家庭教育智慧", &result.principle),
                ("普通家长案例", &result.negative_case),
                ("智慧家长案例", &result.positive_case),
            ] {
                println!("## {}\n{}\n", title, display_or_placeholder(section));
            }
        }
    }

    Ok(())
}
