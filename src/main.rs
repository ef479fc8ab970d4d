use clap::{Parser, Subcommand};
use anyhow::Result;
use dotenvy::dotenv;

mod api;
mod config;
mod export;
mod import;
mod output;
mod telemetry;

use config::MigrateConfig;

#[derive(Parser)]
#[command(name = "cms-migrate", version, about = "Move CMS content between instances over the REST API")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Export(export::ExportCmd),
    Import(import::ImportCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and CMS_LOG_FORMAT
    telemetry::config::init_tracing();
    let cfg = MigrateConfig::from_env();

    match cli.command {
        Commands::Export(args) => export::run(cfg, args).await?,
        Commands::Import(args) => import::run(cfg, args).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_import_flags() {
        let cli = Cli::parse_from(["cms-migrate", "--json", "import", "--batch-size", "5", "--batch-delay-ms", "0", "--in-dir", "out"]);
        assert!(cli.json);
        let Commands::Import(args) = cli.command else { panic!("expected import") };
        assert_eq!(args.batch_size, Some(5));
        assert_eq!(args.batch_delay_ms, Some(0));
        assert_eq!(args.in_dir.as_deref(), Some(std::path::Path::new("out")));
    }

    #[test]
    fn parses_comma_separated_export_types() {
        let cli = Cli::parse_from(["cms-migrate", "export", "--types", "attraction,healthcare", "--dry-run"]);
        let Commands::Export(args) = cli.command else { panic!("expected export") };
        assert_eq!(args.types, vec!["attraction".to_string(), "healthcare".to_string()]);
        assert!(args.dry_run);
    }
}
