// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Deal Market Operator Tool
//!
//! Entry point for the `dealmarket-node` binary. Parses CLI arguments,
//! initializes logging and runs one offline inspection command:
//!
//! - `resolve`  multiaddr → canonical URL
//! - `transfer-host`  deal params → host the data transfer will contact
//! - `check-ask`  ask + proposal → `DealResponse` JSON
//! - `version`  print build and protocol version information
//!
//! Nothing here touches the network.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use dealmarket_protocol::address::AddressStack;
use dealmarket_protocol::config;
use dealmarket_protocol::deal::{
    ClientDealProposal, DealParams, DealProposal, DealResponse, SignedStorageAsk, StorageAsk,
};
use dealmarket_protocol::transfer::Transfer;

use cli::{Commands, DealMarketCli};

fn main() -> Result<()> {
    let cli = DealMarketCli::parse();
    logging::init_logging(logging::default_directives(cli.very_verbose), cli.log_format)?;

    match cli.command {
        Commands::Resolve(args) => {
            println!("{}", resolve_multiaddr(&args.multiaddr)?);
        }
        Commands::TransferHost(args) => {
            let input = read_input(&args.input)?;
            println!("{}", transfer_host(&input)?);
        }
        Commands::CheckAsk(args) => {
            let ask = read_input(&args.ask)?;
            let proposal = read_input(&args.proposal)?;
            let response = check_ask(&ask, &proposal)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Version => print_version(),
    }
    Ok(())
}

/// Parse a JSON document, failing with `what` as context.
fn parse_document(json: &str, what: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(json).with_context(|| format!("expected {}: not JSON", what))?;
    anyhow::ensure!(value.is_object(), "expected {}: not a JSON object", what);
    Ok(value)
}

/// Decode `value` as `T`, naming the document shape on failure.
fn decode<T: DeserializeOwned>(value: Value, shape: &str) -> Result<T> {
    serde_json::from_value(value).with_context(|| format!("invalid {}", shape))
}

/// Deal params (has `deal_uuid`) or a bare transfer.
fn transfer_from(value: Value) -> Result<Transfer> {
    if value.get("deal_uuid").is_none() {
        return decode(value, "transfer");
    }
    let params: DealParams = decode(value, "deal params")?;
    if params.is_offline {
        anyhow::bail!("deal {} is offline and has no transfer", params.deal_uuid);
    }
    Ok(params.transfer)
}

/// A signed ask (has `ask`) or a bare one.
fn ask_from(value: Value) -> Result<StorageAsk> {
    if value.get("ask").is_some() {
        let signed: SignedStorageAsk = decode(value, "signed storage ask")?;
        return Ok(signed.ask);
    }
    decode(value, "storage ask")
}

/// Deal params, a signed proposal (has `proposal`) or a bare proposal.
fn proposal_from(value: Value) -> Result<DealProposal> {
    if value.get("client_deal_proposal").is_some() {
        let params: DealParams = decode(value, "deal params")?;
        return Ok(params.client_deal_proposal.proposal);
    }
    if value.get("proposal").is_some() {
        let signed: ClientDealProposal = decode(value, "client deal proposal")?;
        return Ok(signed.proposal);
    }
    decode(value, "deal proposal")
}

fn resolve_multiaddr(raw: &str) -> Result<String> {
    let stack: AddressStack = raw
        .parse()
        .with_context(|| format!("invalid multiaddr: {}", raw))?;
    let resolved = stack
        .to_url()
        .with_context(|| format!("cannot resolve {}", raw))?;
    tracing::debug!(multiaddr = %stack, url = %resolved, "resolved");
    Ok(resolved.to_string())
}

fn transfer_host(json: &str) -> Result<String> {
    let transfer = transfer_from(parse_document(json, "deal params or a transfer")?)?;
    Ok(transfer.host()?)
}

/// Validate the ask, then match the proposal against it. A mismatch is a
/// rejection, not an error; a broken ask is an error.
fn check_ask(ask_json: &str, proposal_json: &str) -> Result<DealResponse> {
    let ask = ask_from(parse_document(ask_json, "a storage ask")?)?;
    ask.validate().context("ask is invalid")?;

    let proposal = proposal_from(parse_document(proposal_json, "a deal proposal")?)?;
    if let Err(e) = proposal.validate() {
        return Ok(DealResponse::reject(e.to_string()));
    }
    Ok(ask.check_proposal(&proposal).into())
}

/// Reads a whole file, or stdin for `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Prints version information to stdout.
fn print_version() {
    println!("dealmarket-node {}", env!("CARGO_PKG_VERSION"));
    println!(
        "deal protocols  {}, {}",
        config::DEAL_PROTOCOL_V120_ID,
        config::DEAL_PROTOCOL_V121_ID
    );
    println!("status protocol {}", config::DEAL_STATUS_V12_PROTOCOL_ID);
    println!("rustc           {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
