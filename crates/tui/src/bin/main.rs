// TraceLens - Ethereum Call Trace Inspector
// Copyright (C) 2025 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! TraceLens - interactive Ethereum call-trace inspector
//!
//! Fetches the call trace of a mined transaction, resolves the contracts it
//! touches, and renders the decoded trace as a collapsible tree.

use alloy_primitives::{Address, TxHash};
use clap::Parser;
use eyre::{eyre, Result};
use std::{collections::BTreeSet, sync::Arc};
use tokio::sync::oneshot;
use tracelens_common::{logging, ResolutionCache};
use tracelens_engine::{fetch_call_trace, ContractResolver};
use tracelens_tui::Tui;
use tracing::{error, info};

/// TraceLens terminal interface
#[derive(Debug, Parser)]
#[command(name = "tracelens")]
#[command(about = "Interactive Ethereum call-trace inspector", version)]
struct Args {
    /// Hash of the mined transaction to inspect
    tx_hash: String,

    /// RPC endpoint URL; must expose debug_traceTransaction
    #[arg(long, default_value = "http://localhost:8545")]
    rpc_url: String,

    /// Etherscan-compatible API key for contract metadata lookups
    /// (falls back to the ETHERSCAN_API_KEY environment variable)
    #[arg(long)]
    etherscan_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // File-only logging keeps the terminal clean for the TUI.
    let log_file_path = logging::init_file_only_logging("tracelens")?;
    eprintln!("TraceLens logs: {}", log_file_path.display());

    let tx_hash: TxHash = args
        .tx_hash
        .parse()
        .map_err(|_| eyre!("invalid transaction hash: {}", args.tx_hash))?;

    let trace = fetch_call_trace(&args.rpc_url, tx_hash).await?;
    let addresses: BTreeSet<Address> = trace.collect_addresses().into_iter().collect();
    info!(frames = trace.node_count(), contracts = addresses.len(), "call trace fetched");

    let api_key =
        args.etherscan_api_key.or_else(|| std::env::var("ETHERSCAN_API_KEY").ok());
    let cache = Arc::new(ResolutionCache::new());
    let (result_tx, result_rx) = oneshot::channel();

    let rpc_url = args.rpc_url.clone();
    tokio::spawn(async move {
        // Chain-id discovery gates the whole batch; if it never succeeds the
        // UI keeps showing the loading screen and the failure lands in the log.
        match ContractResolver::connect(&rpc_url, api_key, cache).await {
            Ok(resolver) => {
                let book = resolver.resolve_all(&addresses).await;
                let _ = result_tx.send(book);
            }
            Err(err) => error!(%err, "resolver session failed to start"),
        }
    });

    let tui = Tui::new(trace)?;
    tui.run(result_rx).await
}
