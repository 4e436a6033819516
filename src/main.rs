use clap::Parser;

use visitlog::cli::{Cli, Commands};
use visitlog::config::{get_config, init_config_from};
use visitlog::runtime::modes;
use visitlog::system::{init_cli_logging, init_logging};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(&cli.config);

    let command = cli.command.unwrap_or(Commands::Serve);

    // 保持 guard 存活直到进程退出，确保日志刷盘
    let log_guard = match command {
        Commands::Serve => init_logging(&get_config().logging)?,
        _ => init_cli_logging(&get_config().logging)?,
    };

    if let Err(e) = modes::run_cli(command).await {
        eprintln!("{}", modes::cli::format_cli_error(&e));
        drop(log_guard);
        std::process::exit(1);
    }

    Ok(())
}
