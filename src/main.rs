use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use focus_visible_audit::utils::{logging, report_printer};
use focus_visible_audit::{App, ComplianceReport, Config};

/// 检测网页的键盘焦点是否可见（WCAG 2.4.7）
#[derive(Debug, Parser)]
#[command(name = "focus-visible-audit", version, about)]
struct Cli {
    /// 待检测页面的 URL
    url: String,

    /// TOML 配置文件，环境变量优先于文件
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 以 JSON 输出报告
    #[arg(long)]
    json: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ 审计失败: {:#}", e);
            eprintln!("错误: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // 加载配置
    let mut config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    let report = App::new(config).run(&cli.url).await?;
    output(&report, cli.json)
}

fn output(report: &ComplianceReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        report_printer::print_report(report);
    }
    Ok(())
}
