use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;

use commands::cli;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    // The diagnostic log dir comes from config, so resolve that first with
    // a best-effort load; a broken config still gets console logging.
    let log_dir = app::resolve_log_dir(&args);
    let _guard = init_tracing(log_dir.as_deref());

    match app::run(args).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}

fn init_tracing(log_dir: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Some(dir) = log_dir {
        let appender = tracing_appender::rolling::daily(dir, "auto-accept.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        None
    }
}
