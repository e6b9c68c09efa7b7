mod catalog;
mod config;
mod finder;
mod geoloc;
mod net;
mod observe;
mod plot;
mod report;
mod resolve;
mod thumbnails;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::Env;

use crate::config::Config;
use crate::finder::{FindArgs, FindSettings};
use crate::resolve::ResolveSettings;
use crate::thumbnails::ThumbnailSettings;

#[derive(Parser)]
#[command(name = "amastro")]
#[command(about = "Plan deep-sky observations of Messier and Caldwell objects")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Catalog CSV with resolved RA/DEC
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Directory of thumbnails and finder charts
    #[arg(long, global = true)]
    figs: Option<PathBuf>,
    /// Print miscellaneous information
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find observable targets and write the HTML table and altitude plot
    Find(FindArgs),
    /// Resolve catalog coordinates and download DSS finder charts
    Resolve {
        /// Catalog CSV without coordinates
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Download Messier and Caldwell thumbnails from Wikipedia
    Thumbnails,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(catalog) = cli.catalog {
        config.paths.catalog = catalog;
    }
    if let Some(figs) = cli.figs {
        config.paths.figs = figs;
    }

    match cli.command {
        Commands::Find(args) => find(&config, &args, cli.verbose),
        Commands::Resolve { input } => resolve(&config, input),
        Commands::Thumbnails => thumbnails(&config),
    }
}

fn find(config: &Config, args: &FindArgs, verbose: bool) -> ExitCode {
    if verbose {
        println!("{:?}", args);
    }
    let settings = match FindSettings::new(config, args, verbose) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid arguments: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match finder::run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn resolve(config: &Config, input: Option<PathBuf>) -> ExitCode {
    let timeout = match config.network.timeout() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let settings = ResolveSettings {
        input: input.unwrap_or_else(|| config.paths.raw_catalog.clone()),
        output: config.paths.catalog.clone(),
        figs: config.paths.figs.clone(),
        timeout,
    };

    match resolve::run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn thumbnails(config: &Config) -> ExitCode {
    let (timeout, delay) = match (config.network.timeout(), config.network.download_delay()) {
        (Ok(t), Ok(d)) => (t, d),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let settings = ThumbnailSettings {
        figs: config.paths.figs.clone(),
        timeout,
        delay,
    };

    match thumbnails::run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn find_flags_parse() {
        let cli = Cli::try_parse_from([
            "amastro", "-v", "find", "2024", "10", "5", "22", "-l", "-70.73", "-30.24", "-z",
            "America/Santiago", "-M", "-t", "C80", "C106",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Find(args) = cli.command else {
            panic!("expected find");
        };
        assert_eq!(args.datetime, vec![2024, 10, 5, 22]);
        assert_eq!(args.location, Some(vec![-70.73, -30.24]));
        assert!(args.no_messier);
        assert_eq!(
            args.targets,
            Some(vec!["C80".to_string(), "C106".to_string()])
        );
    }

    #[test]
    fn global_paths_after_subcommand() {
        let cli =
            Cli::try_parse_from(["amastro", "resolve", "--figs", "/tmp/figs", "-i", "raw.csv"])
                .unwrap();
        assert_eq!(cli.figs, Some(PathBuf::from("/tmp/figs")));
        assert!(matches!(cli.command, Commands::Resolve { input: Some(_) }));
    }
}
