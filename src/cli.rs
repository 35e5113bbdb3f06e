//! CLI subcommand dispatcher (spec §6). Generalized from the teacher's
//! clap-derive `Cli`/`Commands` shape down to the four input modes
//! spec.md's external interface fixes: `test`, `json`, `rawjson`, `help`.

use clap::Parser;

#[derive(clap::Parser, Debug)]
#[command(author, version, about = "API Hunter - web API security scanner", long_about = None)]
pub struct Cli {
    /// `None` when no input-mode keyword was given at all — clap's own
    /// unrecognized-subcommand path still short-circuits into its own exit,
    /// but the no-subcommand case is funneled through `ScanError` code 201
    /// (spec §4.C) instead of clap's usage error.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable detailed debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run a scan against a single target.
    Test {
        #[arg(long)]
        target: String,

        #[arg(long, num_args = 1..)]
        tests: Vec<String>,

        #[arg(long)]
        user_agent: Option<String>,

        #[arg(long)]
        anti_bot_detection: bool,

        #[arg(long)]
        task_id: Option<String>,
    },
    /// Load a parameter document from a file.
    Json {
        path: String,
    },
    /// Load a parameter document from standard input.
    Rawjson,
    /// Print general or per-parameter help.
    Help {
        names: Vec<String>,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
