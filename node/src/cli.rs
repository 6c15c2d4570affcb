//! # CLI Interface
//!
//! Defines the command-line argument structure for `dealmarket-node` using
//! `clap` derive. Subcommands: `resolve`, `transfer-host`, `check-ask` and
//! `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Storage deal market operator tool.
///
/// Inspects deal transfer addresses and asks offline: resolves multiaddrs to
/// URLs, shows which host a deal's data transfer will contact, and checks
/// proposals against an ask.
#[derive(Parser, Debug)]
#[command(
    name = "dealmarket-node",
    about = "Storage deal market operator tool",
    version,
    propagate_version = true
)]
pub struct DealMarketCli {
    /// Log at debug level.
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Log output format.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "DEALMARKET_LOG_FORMAT",
        default_value = "pretty"
    )]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a multiaddr to the URL a fetcher would dial.
    Resolve(ResolveArgs),
    /// Print the host a deal's data transfer will contact.
    TransferHost(TransferHostArgs),
    /// Check a deal proposal against a storage ask.
    CheckAsk(CheckAskArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `resolve` subcommand.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Multiaddr, e.g. `/dns/example.com/tcp/443/https`.
    pub multiaddr: String,
}

/// Arguments for the `transfer-host` subcommand.
#[derive(Parser, Debug)]
pub struct TransferHostArgs {
    /// Deal params (JSON) to read; `-` for stdin.
    ///
    /// A bare transfer object is accepted as well.
    pub input: PathBuf,
}

/// Arguments for the `check-ask` subcommand.
#[derive(Parser, Debug)]
pub struct CheckAskArgs {
    /// Storage ask (JSON); a signed ask is accepted as well.
    #[arg(long)]
    pub ask: PathBuf,

    /// Deal proposal (JSON); full deal params are accepted as well.
    #[arg(long)]
    pub proposal: PathBuf,
}
