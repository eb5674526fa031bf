use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "regmirror",
    about = "Query an open register through a verified local mirror",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Register name, e.g. `country`
    #[arg(short, long, global = true)]
    pub register: Option<String>,

    #[arg(short, long, global = true, default_value = "beta")]
    pub environment: String,

    /// Register base URL, overriding name and environment
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// TOML client configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List current records
    Records(RecordsArgs),
    /// Show the current record for a key
    Record(KeyArgs),
    /// Show every record ever asserted for a key
    History(KeyArgs),
    /// List user entries
    Entries(EntriesArgs),
    /// Show an item by hash
    Item(ItemArgs),
    /// Show field definitions in declared order
    Fields,
    /// Show the register definition
    Register,
    /// Show the register custodian
    Custodian,
    /// Refresh again and report the verified root hash
    Verify,
}

#[derive(Args)]
pub struct RecordsArgs {
    /// Only records without an end date
    #[arg(long, conflicts_with = "expired")]
    pub current: bool,
    /// Only records with an end date
    #[arg(long)]
    pub expired: bool,
    #[arg(long, default_value = "1")]
    pub page: usize,
    /// Keep records whose values contain this text
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct KeyArgs {
    pub key: String,
}

#[derive(Args)]
pub struct EntriesArgs {
    /// Only entries numbered after this one
    #[arg(long, default_value = "0")]
    pub since: u64,
    #[arg(long, default_value = "1")]
    pub page: usize,
}

#[derive(Args)]
pub struct ItemArgs {
    pub hash: String,
}
