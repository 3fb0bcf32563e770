mod commands;
mod report;
mod source;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use roster_config::{init_tracing, AppConfig};
use roster_matching::Cancelled;

use crate::commands::{CalibrateArgs, ReviewListArgs, ReviewResolveArgs, ScanArgs};

const EXIT_ERROR: u8 = 1;
const EXIT_DEADLINE: u8 = 2;

#[derive(Parser)]
#[command(name = "roster-dedup")]
#[command(about = "Find likely duplicate contacts and queue them for review")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score every contact pair and report likely duplicates
    #[command(after_help = "\
Examples:
  roster-dedup scan --input contacts.csv
  roster-dedup scan --input contacts.csv --format json -o candidates.json
  roster-dedup scan --from-db --since 2026-01-01T00:00:00Z --persist --max-seconds 600")]
    Scan(ScanArgs),

    /// Measure precision and recall against hand-labeled pairs
    Calibrate(CalibrateArgs),

    /// Inspect or resolve queued merge candidates
    #[command(subcommand)]
    Review(ReviewCommand),

    /// Create the review queue table if it does not exist
    Migrate,
}

#[derive(Subcommand)]
enum ReviewCommand {
    /// List queued merge candidates
    List(ReviewListArgs),
    /// Mark a pending candidate as merged or dismissed
    Resolve(ReviewResolveArgs),
}

async fn run(cli: Cli, app: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Command::Scan(args) => commands::scan(&app, args).await,
        Command::Calibrate(args) => commands::calibrate_labels(&app, args),
        Command::Migrate => commands::migrate(&app).await,
        Command::Review(ReviewCommand::List(args)) => commands::review_list(&app, args).await,
        Command::Review(ReviewCommand::Resolve(args)) => commands::review_resolve(&app, args).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    // .env is loaded here, so LOG_LEVEL from it applies to the subscriber
    let app = match AppConfig::from_env() {
        Ok(app) => app,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(err) = init_tracing(&app.log_level) {
        eprintln!("error: {err}");
        return ExitCode::from(EXIT_ERROR);
    }
    tracing::info!(service = "roster-dedup", log_level = %app.log_level, "starting");

    match run(cli, app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(cancelled) = err.downcast_ref::<Cancelled>() {
                tracing::error!(
                    completed = cancelled.completed,
                    total = cancelled.total,
                    "scan exceeded --max-seconds"
                );
                eprintln!("error: {err:#}");
                return ExitCode::from(EXIT_DEADLINE);
            }
            tracing::error!(error = %format!("{err:#}"), "roster-dedup failed");
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scan_requires_a_source() {
        assert!(Cli::try_parse_from(["roster-dedup", "scan"]).is_err());
        assert!(Cli::try_parse_from(["roster-dedup", "scan", "--input", "c.csv"]).is_ok());
        assert!(Cli::try_parse_from(["roster-dedup", "scan", "--from-db"]).is_ok());
        assert!(
            Cli::try_parse_from(["roster-dedup", "scan", "--input", "c.csv", "--from-db"]).is_err()
        );
    }

    #[test]
    fn snapshot_filters_need_database_source() {
        let since = ["roster-dedup", "scan", "--input", "c.csv", "--since", "2026-01-01T00:00:00Z"];
        assert!(Cli::try_parse_from(since).is_err());
        let limit = ["roster-dedup", "scan", "--input", "c.csv", "--limit", "10"];
        assert!(Cli::try_parse_from(limit).is_err());
        let db = ["roster-dedup", "scan", "--from-db", "--since", "2026-01-01T00:00:00Z", "--limit", "10"];
        assert!(Cli::try_parse_from(db).is_ok());
    }

    #[test]
    fn migrate_takes_no_arguments() {
        assert!(Cli::try_parse_from(["roster-dedup", "migrate"]).is_ok());
        assert!(Cli::try_parse_from(["roster-dedup", "migrate", "--force"]).is_err());
    }

    #[test]
    fn resolve_rejects_pending() {
        let id = "7d444840-9dc0-11d1-b245-5ffdce74fad2";
        let ok = ["roster-dedup", "review", "resolve", id, "--status", "merged", "--reviewer", "kim"];
        assert!(Cli::try_parse_from(ok).is_ok());
        let bad = ["roster-dedup", "review", "resolve", id, "--status", "pending", "--reviewer", "kim"];
        assert!(Cli::try_parse_from(bad).is_err());
    }
}
