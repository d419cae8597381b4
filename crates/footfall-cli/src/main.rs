#![forbid(unsafe_code)]

mod cmd;
mod github;
mod settings;

use clap::{CommandFactory, Parser, Subcommand};
use std::env;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "footfall: GitHub repository traffic archiver",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Collection",
        about = "Fetch traffic and update the store file",
        long_about = "Fetch views, clones, stars, forks, and referrers for one \
                      repository, merge them into the store file, and prune \
                      entries past the retention window.",
        after_help = "EXAMPLES:\n    # Collect using the GitHub Actions environment\n    footfall collect\n\n    # Collect a specific repository\n    footfall collect --repo octocat/hello-world --token \"$TRAFFIC_TOKEN\"\n\n    # Ignore daily entries from before June 2024\n    footfall collect --since 2024-06-01\n\n    # Emit machine-readable output\n    footfall collect --json"
    )]
    Collect(cmd::collect::CollectArgs),

    #[command(
        next_help_heading = "Read",
        about = "Summarize the store file",
        long_about = "Summarize the store file: entries, covered day span, and \
                      last update time per series. Never touches the network.",
        after_help = "EXAMPLES:\n    # Summarize the default store file\n    footfall status\n\n    # Summarize a specific file\n    footfall status --file /data/traffic_data.json\n\n    # Emit machine-readable output\n    footfall status --json"
    )]
    Status(cmd::status::StatusArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    footfall completions bash\n\n    # Generate zsh completions\n    footfall completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOOTFALL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "footfall=debug,info"
        } else {
            "footfall=info,warn"
        })
    });

    let format = env::var("FOOTFALL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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

    match cli.command {
        Commands::Collect(ref args) => cmd::collect::run_collect(args),
        Commands::Status(ref args) => cmd::status::run_status(args),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_subcommand_parses() {
        let cli = Cli::parse_from(["footfall", "collect"]);
        assert!(matches!(cli.command, Commands::Collect(_)));
    }

    #[test]
    fn collect_flags_parse() {
        let cli = Cli::parse_from([
            "footfall",
            "collect",
            "--repo",
            "octocat/hello-world",
            "--token",
            "t0ken",
            "--since",
            "2024-06-01",
            "--file",
            "store.json",
            "--api-url",
            "https://ghe.example.com/api/v3",
            "--dry-run",
            "--json",
        ]);
        let Commands::Collect(args) = cli.command else {
            panic!("expected collect");
        };
        assert_eq!(args.repo.as_deref(), Some("octocat/hello-world"));
        assert_eq!(args.token.as_deref(), Some("t0ken"));
        assert_eq!(args.since.as_deref(), Some("2024-06-01"));
        assert!(args.dry_run);
        assert!(args.json);
    }

    #[test]
    fn collect_flags_default_off() {
        let cli = Cli::parse_from(["footfall", "collect"]);
        let Commands::Collect(args) = cli.command else {
            panic!("expected collect");
        };
        assert!(args.repo.is_none());
        assert!(args.token.is_none());
        assert!(args.since.is_none());
        assert!(args.file.is_none());
        assert!(args.api_url.is_none());
        assert!(!args.dry_run);
        assert!(!args.json);
    }

    #[test]
    fn status_subcommand_parses() {
        let cli = Cli::parse_from(["footfall", "status", "--file", "store.json", "--json"]);
        let Commands::Status(args) = cli.command else {
            panic!("expected status");
        };
        assert_eq!(args.file.as_deref(), Some(std::path::Path::new("store.json")));
        assert!(args.json);
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["footfall", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }

    #[test]
    fn all_subcommands_listed() {
        // Verify every subcommand exists by parsing each
        let subcommands = [
            vec!["footfall", "collect"],
            vec!["footfall", "collect", "--dry-run"],
            vec!["footfall", "status"],
            vec!["footfall", "completions", "zsh"],
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
    fn since_is_validated_at_resolve_time_not_parse_time() {
        // clap accepts any string; Settings::resolve rejects bad floors.
        let result = Cli::try_parse_from(["footfall", "collect", "--since", "garbage"]);
        assert!(result.is_ok());
    }
}
