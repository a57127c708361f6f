use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "auto-accept", version, about = "Auto-accept confirmation engine")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file (defaults to ./auto-accept.toml,
    /// then the per-user config dir).
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct OnArgs {
    /// Enable without the interactive confirmation.
    #[arg(short, long)]
    pub force: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ConfigArgs {
    /// Show the current configuration.
    #[arg(short, long)]
    pub show: bool,

    /// Edit the configuration interactively.
    #[arg(short, long)]
    pub edit: bool,

    /// Reset to the default configuration.
    #[arg(short, long)]
    pub reset: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LogsArgs {
    /// Number of audit entries to show.
    #[arg(short = 'n', long, default_value_t = 50)]
    pub lines: usize,

    /// Clear the audit log.
    #[arg(short, long)]
    pub clear: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TestArgs {
    /// Operation to test, e.g. git_commit.
    pub operation: String,

    /// Confirmation message to test.
    pub message: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Enable auto-accept mode
    On(OnArgs),
    /// Disable auto-accept mode
    Off,
    /// Show current auto-accept status
    Status,
    /// Manage configuration
    Config(ConfigArgs),
    /// View audit logs
    Logs(LogsArgs),
    /// Test whether an operation would be auto-accepted
    Test(TestArgs),
}
