use actions_wait::commands::{open, wait};
use actions_wait::logging;
use actions_wait::monitor::DEFAULT_FAILED_OUTPUT_LINES;
use actions_wait::validation::{clap_duration_parser, clap_line_count_parser};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "actions-wait")]
#[command(about = "Wait for GitHub Actions runs on a commit to finish", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait for the workflow runs of a commit to complete
    Wait {
        /// Branch, tag or commit to watch (default: the current branch)
        #[arg(value_name = "REF")]
        reference: Option<String>,

        /// Git remote pointing at the GitHub repository
        #[arg(long, default_value = "origin")]
        remote: String,

        /// Number of log lines to show from the failed job
        #[arg(long, default_value_t = DEFAULT_FAILED_OUTPUT_LINES, value_parser = clap_line_count_parser)]
        failed_output_lines: usize,

        /// Give up after this long (e.g. 90s, 30m, 1h30m)
        #[arg(long, default_value = "1h", value_parser = clap_duration_parser)]
        timeout: Duration,

        /// Do not send a desktop notification when the build finishes
        #[arg(long)]
        no_notify: bool,
    },

    /// Open the latest workflow run of a commit in the browser
    Open {
        /// Branch, tag or commit (default: the current branch)
        #[arg(value_name = "REF")]
        reference: Option<String>,

        /// Git remote pointing at the GitHub repository
        #[arg(long, default_value = "origin")]
        remote: String,
    },

    /// Print the version and exit
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    match cli.command {
        Commands::Wait {
            reference,
            remote,
            failed_output_lines,
            timeout,
            no_notify,
        } => wait::execute(wait::WaitOptions {
            reference,
            remote,
            failed_output_lines,
            timeout,
            notify: !no_notify,
        }),
        Commands::Open { reference, remote } => open::execute(reference, remote),
        Commands::Version => {
            println!("actions-wait version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
