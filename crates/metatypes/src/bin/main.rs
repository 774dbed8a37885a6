//! metatypes command-line interface

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use metatypes::cli::output::{self, OutputFormat};
use metatypes::cli::values::{Operation, ValuesConfig};
use metatypes::cli::{network, values, versions};
use std::path::PathBuf;

/// Metamodel data type tool
#[derive(Parser)]
#[command(name = "metatypes")]
#[command(author, version, about = "Cast, parse and format values of metamodel data types", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by the value commands
#[derive(Args)]
struct ValueArgs {
    /// Data type alias, e.g. Date or List
    #[arg(short = 't', long = "type")]
    type_alias: String,

    /// Type configuration as a JSON object
    #[arg(short, long)]
    config: Option<String>,

    /// Session locale, e.g. de_DE
    #[arg(short, long)]
    locale: Option<String>,

    /// File holding installation variables (encryption secret)
    #[arg(long)]
    secrets: Option<PathBuf>,

    /// Values to process
    #[arg(required = true)]
    values: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize values without instance constraints
    Cast(ValueArgs),

    /// Normalize and validate values against the configured type
    Parse(ValueArgs),

    /// Render values for display
    Format(ValueArgs),

    /// Check whether an IP address lies in any of the given ranges
    IpInRange {
        /// IPv4 or IPv6 address
        address: String,

        /// Ranges: CIDR, start-end, wildcard or single addresses
        #[arg(required = true)]
        ranges: Vec<String>,
    },

    /// Pick the highest version satisfying a constraint
    SemverBest {
        /// Constraint, e.g. "^1.2 || ~2.0"
        constraint: String,

        /// Candidate versions
        #[arg(required = true)]
        versions: Vec<String>,

        /// Print every satisfying version instead of the best one
        #[arg(short, long)]
        all: bool,
    },
}

fn run_values(operation: Operation, args: ValueArgs, cli_json: bool, verbose: bool) -> Result<()> {
    values::run(ValuesConfig {
        operation,
        type_alias: args.type_alias,
        uxon: args.config,
        values: args.values,
        locale: args.locale,
        secrets: args.secrets,
        format: OutputFormat::from_flag(cli_json),
        verbose,
    })
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);

    let result = match cli.command {
        Commands::Cast(args) => run_values(Operation::Cast, args, cli.json, cli.verbose),
        Commands::Parse(args) => run_values(Operation::Parse, args, cli.json, cli.verbose),
        Commands::Format(args) => run_values(Operation::Format, args, cli.json, cli.verbose),
        Commands::IpInRange { address, ranges } => {
            network::run(network::IpRangeConfig { address, ranges })
        }
        Commands::SemverBest {
            constraint,
            versions: candidates,
            all,
        } => versions::run(versions::SemverConfig {
            constraint,
            versions: candidates,
            all,
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
