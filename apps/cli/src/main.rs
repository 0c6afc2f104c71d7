use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use nftjudge_core_sdk::prelude::*;

/**
 * \brief CLI 程序入口：启动裁判服务或在终端里直接发起一次裁决。
 */
#[derive(Parser, Debug)]
#[command(name = "nftjudge", version, about = "NFT battle judge proxy")]
struct Cli {
    /** \brief 强制开启文件日志（logs/nftjudge.log） */
    #[arg(long, global = true, default_value_t = false)]
    telemetry: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /**
     * \brief 启动本地 HTTP 服务并提供前端页面。
     */
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },

    /**
     * \brief 对两个 NFT 发起一次裁决并打印结果。
     * \param history JSON 文件，内容为 [{role, content}] 数组
     */
    Judge {
        #[arg(long)]
        image1: String,
        #[arg(long)]
        image2: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /**
     * \brief 列出当前凭据可用的模型。
     */
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    for file in [".env.local", ".env"] {
        let _ = dotenvy::from_filename(file);
    }
    let config = JudgeConfig::from_env();
    telemetry::set_enabled(cli.telemetry || config.telemetry_enabled);

    match cli.command {
        Commands::Serve { addr } => {
            server::run(&addr, config).await?;
        }
        Commands::Judge {
            image1,
            image2,
            message,
            history,
        } => {
            let backend = connect(&config)?;
            let chat_history = match history {
                Some(path) => Some(load_history(&path)?),
                None => None,
            };
            let request = ChatRequest {
                message: Some(message),
                image_uri1: Some(image1),
                image_uri2: Some(image2),
                chat_history,
            };

            let verdict = judge::judge(&backend, &config.models, &request)
                .await
                .context("judge failed")?;
            println!("{}", verdict.text);
            println!();
            println!(
                "selection: {}",
                verdict.selection.map(|s| s.as_str()).unwrap_or("unknown")
            );
            println!("model: {}", verdict.model);
        }
        Commands::Models => {
            let backend = connect(&config)?;
            let models = backend
                .list_models()
                .await
                .context("list models failed")?;
            for model in models {
                let marker = if config.models.contains(&model) { "*" } else { " " };
                println!("{} {}", marker, model);
            }
        }
    }

    Ok(())
}

fn connect(config: &JudgeConfig) -> Result<GeminiBackend> {
    let api_key = config
        .api_key
        .as_deref()
        .ok_or(JudgeError::MissingCredential)?;
    Ok(GeminiBackend::new(&config.api_base, api_key))
}

fn load_history(path: &Path) -> Result<Vec<ChatTurn>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read history file {} failed", path.display()))?;
    serde_json::from_str(&raw).context("history must be a JSON array of {role, content}")
}
