mod commands;
mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pnrquote",
    version,
    about = "Parse airline reservation quotes and compute commission-adjusted prices"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a PNR / quote e-mail into structured options (without pricing)
    Parse {
        /// Path to a text file, or "-" for stdin
        input: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Print the merged single-PNR view instead of one entry per option
        #[arg(long)]
        simple: bool,

        /// Print which rule claimed each line, plus parse warnings
        #[arg(long)]
        trace: bool,
    },
    /// Parse and price every option of a quote
    Quote {
        /// Path to a text file, or "-" for stdin
        input: PathBuf,

        /// Custom JSON pricing policy
        #[arg(long, value_name = "FILE", conflicts_with = "preset")]
        policy: Option<PathBuf>,

        /// Predefined policy: padrao (default), net
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// RAV percent for every option, replacing declared and policy values
        #[arg(long, value_name = "PERCENT")]
        rav: Option<Decimal>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Check flight chronology and airport resolution for every option
    Validate {
        /// Path to a text file, or "-" for stdin
        input: PathBuf,

        /// Reference date for year inference, YYYY-MM-DD (default: today)
        #[arg(long, value_name = "DATE")]
        today: Option<NaiveDate>,

        /// Extra airport/airline names (JSON), merged over the built-in table
        #[arg(long, value_name = "FILE")]
        directory: Option<PathBuf>,

        /// Also list the decoded flights (resolved dates and names)
        #[arg(long)]
        flights: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Manage and inspect pricing policies
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },
}

#[derive(Subcommand)]
enum PolicyAction {
    /// List predefined policies
    List,
    /// Show a predefined policy
    Show {
        /// Preset name (e.g., "padrao")
        name: String,
    },
    /// Validate a custom policy file
    Validate {
        /// Path to JSON policy file
        file: PathBuf,
    },
    /// Print the policy file format with an example
    Schema,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Parse {
            input,
            output,
            out,
            simple,
            trace,
        } => commands::parse::run(&input, &output, out, simple, trace),
        Commands::Quote {
            input,
            policy,
            preset,
            rav,
            output,
        } => commands::quote::run(&input, policy, preset, rav, &output),
        Commands::Validate {
            input,
            today,
            directory,
            flights,
            output,
        } => commands::validate::run(&input, today, directory, flights, &output),
        Commands::Policy { action } => match action {
            PolicyAction::List => commands::policy::list(),
            PolicyAction::Show { name } => commands::policy::show(&name),
            PolicyAction::Validate { file } => commands::policy::validate(&file),
            PolicyAction::Schema => commands::policy::schema(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
