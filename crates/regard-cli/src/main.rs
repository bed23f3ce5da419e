#![forbid(unsafe_code)]

mod cmd;
mod executor;
mod output;
mod snapshot;
mod tui;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "regard: engagement reciprocation for your shop feed",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags and TTY detection.
    fn output_mode(&self) -> OutputMode {
        OutputMode::resolve(self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Pipeline",
        about = "Analyze a notification snapshot",
        long_about = "Run the full pipeline over a captured notification snapshot: aggregate, classify, rank, bind comments, and merge the selected batch into the store.",
        after_help = "EXAMPLES:\n    # Analyze a captured snapshot\n    rgd analyze --input snapshot.json\n\n    # Select at most three users this run\n    rgd analyze --input snapshot.json --target 3\n\n    # Emit machine-readable output\n    rgd analyze --input snapshot.json --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Read",
        about = "List engagement records",
        long_about = "List store records with optional category and status filters.",
        after_help = "EXAMPLES:\n    # List everything in the store\n    rgd list\n\n    # Only unposted multi-like users\n    rgd list --category \"multi-like thanks\" --status unposted\n\n    # Emit machine-readable output\n    rgd list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one engagement record",
        long_about = "Show full details for a single store record by user id.",
        after_help = "EXAMPLES:\n    # Show a user\n    rgd show mika123\n\n    # Emit machine-readable output\n    rgd show mika123 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Outreach",
        about = "Dispatch bound comments",
        long_about = "Dispatch bound comments for the given users through the configured outreach command. Status is flipped and persisted before each command runs.",
        after_help = "EXAMPLES:\n    # Post to two users\n    rgd post mika123 hana456\n\n    # Emit machine-readable output\n    rgd post mika123 --json"
    )]
    Post(cmd::post::PostArgs),

    #[command(
        next_help_heading = "Outreach",
        about = "Confirm dispatched posts",
        long_about = "Mark dispatched posts as confirmed after verifying them on the platform.",
        after_help = "EXAMPLES:\n    # Confirm a dispatched post\n    rgd confirm mika123\n\n    # Emit machine-readable output\n    rgd confirm mika123 --json"
    )]
    Confirm(cmd::confirm::ConfirmArgs),

    #[command(
        next_help_heading = "Interactive",
        about = "Open the interactive store console",
        long_about = "Open a full-screen console over the engagement store: browse, filter by category, mark rows, and dispatch outreach.",
        after_help = "EXAMPLES:\n    # Open the console\n    rgd console"
    )]
    Console,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("REGARD_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "regard=debug,info"
        } else {
            "regard=info,warn"
        })
    });

    let format = env::var("REGARD_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Analyze(ref args) => cmd::analyze::run_analyze(args, output, &project_root),
        Commands::List(ref args) => cmd::list::run_list(args, output, &project_root),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &project_root),
        Commands::Post(ref args) => cmd::post::run_post(args, output, &project_root),
        Commands::Confirm(ref args) => cmd::confirm::run_confirm(args, output, &project_root),
        Commands::Console => tui::console::run_console_tui(&project_root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["rgd", "--json", "list"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["rgd", "list", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn quiet_flag_parsed() {
        let cli = Cli::parse_from(["rgd", "-q", "list"]);
        assert!(cli.quiet);
    }

    #[test]
    fn analyze_subcommand_parses() {
        let cli = Cli::parse_from(["rgd", "analyze", "--input", "snap.json"]);
        assert!(matches!(cli.command, Commands::Analyze(_)));
    }

    #[test]
    fn list_subcommand_parses() {
        let cli = Cli::parse_from(["rgd", "list"]);
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn show_subcommand_parses() {
        let cli = Cli::parse_from(["rgd", "show", "mika123"]);
        assert!(matches!(cli.command, Commands::Show(_)));
    }

    #[test]
    fn post_subcommand_parses() {
        let cli = Cli::parse_from(["rgd", "post", "mika123", "hana456"]);
        assert!(matches!(cli.command, Commands::Post(_)));
    }

    #[test]
    fn confirm_subcommand_parses() {
        let cli = Cli::parse_from(["rgd", "confirm", "mika123"]);
        assert!(matches!(cli.command, Commands::Confirm(_)));
    }

    #[test]
    fn console_subcommand_parses() {
        let cli = Cli::parse_from(["rgd", "console"]);
        assert!(matches!(cli.command, Commands::Console));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["rgd", "analyze", "--input", "x.json"],
            vec!["rgd", "list"],
            vec!["rgd", "show", "x"],
            vec!["rgd", "post", "x"],
            vec!["rgd", "confirm", "x"],
            vec!["rgd", "console"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?} — error: {:?}",
                args,
                result.err()
            );
        }
    }

    #[test]
    fn post_requires_at_least_one_user() {
        assert!(Cli::try_parse_from(["rgd", "post"]).is_err());
        assert!(Cli::try_parse_from(["rgd", "confirm"]).is_err());
    }
}
