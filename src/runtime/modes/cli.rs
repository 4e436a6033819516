//! CLI mode
//!
//! One-shot commands that read the event store directly and print to stdout.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::analytics::AnalyticsSummary;
use crate::cli::{Commands, ConfigCommands};
use crate::config::{StaticConfig, get_config};
use crate::errors::VisitlogError;
use crate::runtime::lifetime::startup::{build_analytics_service, open_storage};
use crate::storage::{PageViewEvent, PageViewRepository};

/// 文本报告中排行榜的条数
const TOP_ENTRIES: usize = 5;

/// Run a parsed command
pub async fn run_cli(command: Commands) -> Result<()> {
    match command {
        Commands::Serve => super::server::run_server().await,
        Commands::Summary { json } => summary(json).await,
        Commands::Recent { limit } => recent(limit).await,
        Commands::Config {
            action: ConfigCommands::Generate { output },
        } => config_generate(output),
    }
}

/// 命令失败时的终端输出，错误链中有 `VisitlogError` 时使用其彩色格式
pub fn format_cli_error(err: &anyhow::Error) -> String {
    match err
        .chain()
        .find_map(|cause| cause.downcast_ref::<VisitlogError>())
    {
        Some(cause) => format!("{}\n  {}", cause.format_colored(), err.to_string().dimmed()),
        None => format!("{} {:#}", "[ERROR]".red().bold(), err),
    }
}

async fn open_repository() -> Result<Arc<dyn PageViewRepository>> {
    let storage = open_storage().await?;
    Ok(storage)
}

async fn summary(json: bool) -> Result<()> {
    let service = build_analytics_service(open_repository().await?);
    let summary = service
        .summary()
        .await
        .context("Failed to compute analytics")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary)?);
    }
    Ok(())
}

async fn recent(limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or_else(|| get_config().analytics.recent_limit);
    let service = build_analytics_service(open_repository().await?);
    let events = service
        .recent_page_views(limit)
        .await
        .context("Failed to load page views")?;

    if events.is_empty() {
        println!("{} No page views recorded yet", "ℹ".bold().blue());
        return Ok(());
    }
    for event in &events {
        println!("{}", render_event(event));
    }
    Ok(())
}

fn config_generate(output: Option<String>) -> Result<()> {
    match output {
        Some(path) => {
            StaticConfig::default()
                .save_to_file(&path)
                .with_context(|| format!("Failed to write {}", path))?;
            println!(
                "{} {}",
                "Configuration file generated:".green(),
                path.blue()
            );
        }
        None => print!("{}", StaticConfig::generate_sample_config()),
    }
    Ok(())
}

/// 文本格式的统计报告
pub fn render_summary(summary: &AnalyticsSummary) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}", "Page Views".bold().green())?;
    writeln!(out, "  {}:  {}", "Today".cyan(), summary.today_views)?;
    writeln!(out, "  {}:   {}", "7 days".cyan(), summary.week_views)?;
    writeln!(out, "  {}:  {}", "30 days".cyan(), summary.month_views)?;
    writeln!(out, "  {}:  {}", "Total".cyan(), summary.total_views)?;
    writeln!(
        out,
        "  {}: {} ({} today)",
        "Visitors".cyan(),
        summary.unique_visitors,
        summary.unique_visitors_today
    )?;

    writeln!(out, "{}", "Last 7 days".bold().green())?;
    for day in &summary.views_by_day {
        writeln!(out, "  {}  {}", day.date.dimmed(), day.views)?;
    }

    for (title, entries) in [
        ("Top pages", summary.top_pages(TOP_ENTRIES)),
        ("Browsers", summary.top_browsers(TOP_ENTRIES)),
        ("Devices", summary.top_devices(TOP_ENTRIES)),
    ] {
        writeln!(out, "{}", title.bold().green())?;
        if entries.is_empty() {
            writeln!(out, "  {}", "(none)".dimmed())?;
        }
        for entry in entries {
            writeln!(
                out,
                "  {:<32} {:>6} {:>6.1}%",
                entry.name, entry.count, entry.percentage
            )?;
        }
    }
    Ok(out)
}

fn render_event(event: &PageViewEvent) -> String {
    format!(
        "{} {} {} {}",
        event.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
        event.page_path.blue(),
        event.device_type.as_deref().unwrap_or("-"),
        event.browser.as_deref().unwrap_or("-"),
    )
}
