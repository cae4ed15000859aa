//! CLI for conjugacy — does y fall or rise as x grows?

mod commands;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "conjugacy")]
#[command(about = "conjugacy — rank-based monotonic association of paired samples")]
#[command(version = conjugacy_core::VERSION)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute delta, sigma and conjugacy for one two-column file
    Compute {
        /// Input file: two numeric columns (x y), no header
        #[arg(long)]
        input: String,

        /// Output file for "delta sigma conjugacy"
        #[arg(long)]
        output: String,

        /// Column delimiter: ws (default), tab, comma, semicolon, or any single character
        #[arg(long, default_value = "ws")]
        delimiter: String,

        /// Ordering of rows with equal x before ranking
        #[arg(long, default_value = "input-order", value_parser = ["input-order", "ascending-y"])]
        tie_break: String,

        /// Output format
        #[arg(long, default_value = "plain", value_parser = ["plain", "json"])]
        format: String,
    },

    /// Compute many files independently; one failure never stops the rest
    Batch {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Directory for per-file `<stem>.out` results
        #[arg(long)]
        output_dir: Option<String>,

        /// Write a JSON report of every outcome
        #[arg(long)]
        report: Option<String>,

        /// Worker threads (0 = one per core)
        #[arg(long, default_value = "0")]
        workers: usize,

        /// Column delimiter: ws (default), tab, comma, semicolon, or any single character
        #[arg(long, default_value = "ws")]
        delimiter: String,

        /// Ordering of rows with equal x before ranking
        #[arg(long, default_value = "input-order", value_parser = ["input-order", "ascending-y"])]
        tie_break: String,
    },

    /// Start an HTTP conjugacy server
    Server {
        /// Port to listen on
        #[arg(long, default_value = "8043")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Default ordering of rows with equal x (requests may override)
        #[arg(long, default_value = "input-order", value_parser = ["input-order", "ascending-y"])]
        tie_break: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compute {
            input,
            output,
            delimiter,
            tie_break,
            format,
        } => commands::compute::run(commands::compute::ComputeCommandConfig {
            input: &input,
            output: &output,
            delimiter: &delimiter,
            tie_break: &tie_break,
            format: &format,
        }),
        Commands::Batch {
            inputs,
            output_dir,
            report,
            workers,
            delimiter,
            tie_break,
        } => commands::batch::run(commands::batch::BatchCommandConfig {
            inputs: &inputs,
            output_dir: output_dir.as_deref(),
            report_path: report.as_deref(),
            workers,
            delimiter: &delimiter,
            tie_break: &tie_break,
        }),
        Commands::Server {
            port,
            host,
            tie_break,
        } => commands::server::run(&host, port, &tie_break),
    }
}
