use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

use supermemory_tools::tools::{AddArgs, SearchArgs};
use supermemory_tools::{AppConfig, ToolBundle};

#[derive(Parser)]
#[command(name = "smtools", about = "Supermemory 记忆工具调试入口", version)]
struct Cli {
    /// 指定配置文件（默认 ~/.supermemory-tools/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 调用 searchMemories
    Search {
        /// 检索内容
        query: String,

        /// 最多返回条数
        #[arg(short, long)]
        limit: Option<u32>,

        /// 只返回片段，不带完整文档
        #[arg(long)]
        excerpts: bool,

        /// [Beta] 时间点过滤（ISO 8601）
        #[arg(long)]
        as_of: Option<String>,

        /// [Beta] 有效期下界（ISO 8601）
        #[arg(long)]
        from: Option<String>,

        /// [Beta] 有效期上界（ISO 8601）
        #[arg(long)]
        to: Option<String>,
    },
    /// 调用 addMemory
    Add {
        /// 要记住的内容
        memory: String,
    },
    /// 输出工具规格（JSON）
    Tools,
    /// 显示当前生效配置（API key 打码）
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Search {
            query,
            limit,
            excerpts,
            as_of,
            from,
            to,
        } => {
            let mut args = SearchArgs::new(query).with_include_full_docs(!excerpts);
            if let Some(limit) = limit {
                args = args.with_limit(limit);
            }
            if let Some(as_of) = as_of {
                args = args.with_as_of(as_of);
            }
            if from.is_some() || to.is_some() {
                args = args.with_time_window(from, to);
            }
            let bundle = build_bundle(&config)?;
            print_json(&bundle.search_memories.search(args).await.into_json())?;
        }
        Commands::Add { memory } => {
            let bundle = build_bundle(&config)?;
            print_json(&bundle.add_memory.add(AddArgs::new(memory)).await.into_json())?;
        }
        Commands::Tools => {
            // 只打印规格，不需要真实 key
            let key = config.api_key.as_deref().unwrap_or("unset");
            let bundle = supermemory_tools::build_tool_bundle(key, Some(&config.tools))
                .wrap_err("创建工具失败")?;
            print_json(&bundle.specs())?;
        }
        Commands::Config => print_json(&config.redacted())?,
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => AppConfig::load_from_path(p),
        None => AppConfig::load_or_init(),
    };
    config.wrap_err("加载配置失败")
}

fn build_bundle(config: &AppConfig) -> Result<ToolBundle> {
    let api_key = config.require_api_key()?;
    supermemory_tools::build_tool_bundle(api_key, Some(&config.tools)).wrap_err("创建工具失败")
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).wrap_err("序列化输出失败")?;
    println!("{}", text);
    Ok(())
}

/// 初始化 tracing: stderr 只输出 warn+，日志文件输出 debug+
fn init_tracing() -> Result<()> {
    let log_dir = AppConfig::log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .wrap_err_with(|| format!("创建日志目录失败: {}", log_dir.display()))?;

    // 文件日志: 按天滚动
    let file_appender = tracing_appender::rolling::daily(&log_dir, "smtools.log");
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("supermemory_tools=debug")),
        );

    // stderr: 只输出 warn+（stdout 留给 JSON 结果）
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}
