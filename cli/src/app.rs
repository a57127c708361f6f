use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::{ColoredString, Colorize};

use auto_accept_core::api::{
    default_config_path, load, reset, save, test_pattern, AuditLogger, AutoAcceptAgent,
    AutoAcceptConfig, HookMode, PromptIo, RiskLevel, TerminalPromptIo,
};

use crate::commands::cli::{self, Commands};

/// Best-effort config probe so tracing can log to the configured dir even
/// before the real load/validation happens.
pub fn resolve_log_dir(args: &cli::Args) -> Option<String> {
    let path = config_path(args);
    load(&path).ok().map(|cfg| cfg.log_dir)
}

fn config_path(args: &cli::Args) -> PathBuf {
    match &args.config {
        Some(p) => PathBuf::from(shellexpand::tilde(p).into_owned()),
        None => default_config_path(),
    }
}

pub async fn run(args: cli::Args) -> anyhow::Result<()> {
    let path = config_path(&args);
    let cfg = load(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;

    // `config` must keep working on a broken file so the operator can
    // inspect and repair it; everything else requires a valid config.
    if let Commands::Config(config_args) = &args.command {
        return handle_config(cfg, &path, config_args.clone()).await;
    }
    cfg.validate()?;

    let audit = AuditLogger::start(&cfg.audit_log_path)
        .await
        .context("failed to open audit log")?;
    let agent = Arc::new(AutoAcceptAgent::new(cfg, audit.clone())?);

    match args.command {
        Commands::On(on_args) => handle_enable(&agent, &path, on_args.force).await,
        Commands::Off => handle_disable(&agent, &path),
        Commands::Status => handle_status(&agent),
        Commands::Logs(logs_args) => handle_logs(&audit, logs_args).await,
        Commands::Test(test_args) => handle_test(&agent, test_args),
        Commands::Config(_) => unreachable!("handled above"),
    }
}

async fn handle_enable(
    agent: &Arc<AutoAcceptAgent>,
    path: &std::path::Path,
    force: bool,
) -> anyhow::Result<()> {
    if !force {
        if !atty::is(atty::Stream::Stdin) {
            bail!("stdin is not a terminal; use --force to enable non-interactively");
        }
        let confirmed = ask_yes_no(
            "Enable auto-accept mode? This will automatically accept certain operations. [y/N]",
        )
        .await?;
        if !confirmed {
            println!("{}", "Auto-accept mode not enabled.".yellow());
            return Ok(());
        }
    }

    agent.enable_auto_accept();
    save(&agent.config_snapshot(), path)?;

    let status = agent.get_session_status();
    println!("{}", "✓ Auto-accept mode enabled".green());
    println!("{} {}", "Session ID:".bold(), status.session_id);
    println!("{} {}", "Max accepts:".bold(), status.remaining_accepts);
    println!(
        "{} {}",
        "Session timeout:".bold(),
        format_duration(status.time_remaining_secs)
    );
    Ok(())
}

fn handle_disable(agent: &Arc<AutoAcceptAgent>, path: &std::path::Path) -> anyhow::Result<()> {
    agent.disable_auto_accept();
    save(&agent.config_snapshot(), path)?;
    println!("{}", "✓ Auto-accept mode disabled".green());
    Ok(())
}

fn handle_status(agent: &Arc<AutoAcceptAgent>) -> anyhow::Result<()> {
    let status = agent.get_session_status();
    let cfg = agent.config_snapshot();

    println!("\n{}", "Auto-Accept Status".bold());
    println!("{}", "─".repeat(50).dimmed());
    println!(
        "{} {}",
        "Mode:".bold(),
        if status.active {
            "ENABLED".green()
        } else {
            "DISABLED".red()
        }
    );
    println!("{} {}", "Session ID:".bold(), status.session_id);
    println!(
        "{} {}/{}",
        "Accepts used:".bold(),
        status.accept_count,
        cfg.max_auto_accepts
    );
    println!(
        "{} {}",
        "Time remaining:".bold(),
        format_duration(status.time_remaining_secs)
    );

    println!("\n{}", "Configuration:".bold());
    println!(
        "{} {}",
        "Allowed operations:".bold(),
        cfg.allowed_operations.join(", ")
    );
    println!(
        "{} {}",
        "Safety checks:".bold(),
        if cfg.safety_checks_enabled {
            "ENABLED".green()
        } else {
            "DISABLED".red()
        }
    );
    println!(
        "{} {}",
        "Hook mode:".bold(),
        match cfg.hook_mode {
            HookMode::Active => "active",
            HookMode::Passive => "passive",
        }
    );
    println!("{} {}", "Audit log:".bold(), cfg.audit_log_path);
    if status.audit_degraded {
        println!(
            "{}",
            "⚠ audit persistence degraded: recent entries may be missing".yellow()
        );
    }
    Ok(())
}

async fn handle_config(
    cfg: AutoAcceptConfig,
    path: &std::path::Path,
    args: cli::ConfigArgs,
) -> anyhow::Result<()> {
    if args.show {
        println!("\n{}", "Configuration".bold());
        println!("{}", "─".repeat(50).dimmed());
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        Ok(())
    } else if args.edit {
        edit_config(cfg, path).await
    } else if args.reset {
        if !ask_yes_no("Reset configuration to defaults? [y/N]").await? {
            return Ok(());
        }
        let fresh = reset()?;
        save(&fresh, path)?;
        println!("{}", "✓ Configuration reset to defaults".green());
        Ok(())
    } else {
        println!(
            "{}",
            "Use --show, --edit, or --reset with the config command".yellow()
        );
        Ok(())
    }
}

async fn edit_config(mut cfg: AutoAcceptConfig, path: &std::path::Path) -> anyhow::Result<()> {
    let io = TerminalPromptIo;

    let timeout = io
        .ask(&format!(
            "Session timeout in seconds [{}]:",
            cfg.session_timeout_secs
        ))
        .await?;
    if !timeout.trim().is_empty() {
        cfg.session_timeout_secs = timeout
            .trim()
            .parse()
            .context("session timeout must be a number")?;
    }

    let max = io
        .ask(&format!(
            "Maximum auto-accepts per session [{}]:",
            cfg.max_auto_accepts
        ))
        .await?;
    if !max.trim().is_empty() {
        cfg.max_auto_accepts = max
            .trim()
            .parse()
            .context("max auto-accepts must be a number")?;
    }

    let ops = io
        .ask(&format!(
            "Allowed operation types, comma-separated [{}]:",
            cfg.allowed_operations.join(",")
        ))
        .await?;
    if !ops.trim().is_empty() {
        cfg.allowed_operations = ops
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    let safety = io.ask("Enable safety checks? [Y/n]").await?;
    if !safety.trim().is_empty() {
        cfg.safety_checks_enabled = matches!(safety.trim().to_lowercase().as_str(), "y" | "yes");
    }

    cfg.validate()?;
    save(&cfg, path)?;
    println!("{}", "✓ Configuration updated".green());
    Ok(())
}

async fn handle_logs(audit: &AuditLogger, args: cli::LogsArgs) -> anyhow::Result<()> {
    if args.clear {
        if !ask_yes_no("Clear all audit logs? [y/N]").await? {
            return Ok(());
        }
        audit.clear_audit_logs()?;
        println!("{}", "✓ Audit logs cleared".green());
        return Ok(());
    }

    let logs = audit.get_audit_logs(args.lines)?;
    if logs.is_empty() {
        println!("{}", "No audit logs found".yellow());
        return Ok(());
    }

    println!("\n{}", format!("Audit Logs (last {} entries)", logs.len()).bold());
    println!("{}", "─".repeat(80).dimmed());
    for log in &logs {
        let timestamp = log
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S");
        let decision = match log.decision {
            auto_accept_core::api::AuditDecision::Accept => "ACCEPT".green(),
            auto_accept_core::api::AuditDecision::Reject => "REJECT".red(),
        };
        println!(
            "{} {} {} {}",
            timestamp.to_string().dimmed(),
            decision,
            format_risk(log.risk_level),
            log.operation.cyan()
        );
        println!(
            "  {} {}",
            "Message:".dimmed(),
            auto_accept_core::api::preview(&log.message, 60)
        );
        println!("  {} {}", "Reason:".dimmed(), log.reason);
        println!();
    }
    Ok(())
}

fn handle_test(agent: &Arc<AutoAcceptAgent>, args: cli::TestArgs) -> anyhow::Result<()> {
    let result = agent.test_operation(&args.operation, &args.message);

    println!("\n{}", "Test Result".bold());
    println!("{}", "─".repeat(50).dimmed());
    println!("{} {}", "Operation:".bold(), args.operation);
    println!("{} {}", "Message:".bold(), args.message);
    println!(
        "{} {}",
        "Would accept:".bold(),
        if result.would_accept {
            "YES".green()
        } else {
            "NO".red()
        }
    );
    println!("{} {}", "Risk level:".bold(), format_risk(result.risk_level));
    println!("{} {}", "Reason:".bold(), result.reason);

    let cfg = agent.config_snapshot();
    let sets = [
        ("danger", &cfg.danger_patterns),
        ("bypass", &cfg.bypass_patterns),
        ("whitelist", &cfg.whitelist_patterns),
    ];
    let mut matched = Vec::new();
    for (kind, patterns) in sets {
        for pattern in patterns {
            if test_pattern(pattern, &args.message).unwrap_or(false) {
                matched.push(format!("{kind}: {pattern}"));
            }
        }
    }
    if !matched.is_empty() {
        println!("\n{}", "Matching patterns:".bold());
        for m in &matched {
            println!("  {m}");
        }
    }
    Ok(())
}

async fn ask_yes_no(prompt: &str) -> anyhow::Result<bool> {
    let answer = TerminalPromptIo.ask(prompt).await?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

fn format_risk(level: RiskLevel) -> ColoredString {
    match level {
        RiskLevel::Low => "LOW".green(),
        RiskLevel::Medium => "MEDIUM".yellow(),
        RiskLevel::High => "HIGH".red(),
    }
}

fn format_duration(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}
