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

//! Call-trace fetching over the JSON-RPC debug API.

use alloy_primitives::{Address, TxHash};
use alloy_provider::{ext::DebugApi, Provider, ProviderBuilder};
use alloy_rpc_types_trace::geth::{
    CallFrame, GethDebugBuiltInTracerType, GethDebugTracerType, GethDebugTracingOptions, GethTrace,
};
use eyre::{eyre, Result};
use tracelens_common::{CallKind, CallTraceNode};
use tracing::info;

/// Queries the chain id of an RPC endpoint.
pub async fn get_chain_id(rpc_url: &str) -> Result<u64> {
    let provider = ProviderBuilder::new().connect(rpc_url).await?;
    let chain_id = provider.get_chain_id().await?;
    Ok(chain_id)
}

/// Fetches the call trace of a mined transaction via `debug_traceTransaction`
/// with the built-in call tracer.
pub async fn fetch_call_trace(rpc_url: &str, tx_hash: TxHash) -> Result<CallTraceNode> {
    info!(%tx_hash, rpc_url, "fetching call trace");

    let provider = ProviderBuilder::new().connect(rpc_url).await?;
    let options = GethDebugTracingOptions::default()
        .with_tracer(GethDebugTracerType::BuiltInTracer(GethDebugBuiltInTracerType::CallTracer));

    match provider.debug_trace_transaction(tx_hash, options).await? {
        GethTrace::CallTracer(frame) => convert_frame(frame),
        other => Err(eyre!("node returned an unexpected tracer payload: {other:?}")),
    }
}

/// Converts a geth call frame (and its subtree) into the internal trace tree.
pub fn convert_frame(frame: CallFrame) -> Result<CallTraceNode> {
    let kind: CallKind = frame.typ.parse()?;
    let calls = frame.calls.into_iter().map(convert_frame).collect::<Result<Vec<_>>>()?;
    Ok(CallTraceNode {
        kind,
        from: frame.from,
        // CREATE frames report the deployed address here; a missing target
        // only occurs on malformed tracer output.
        to: frame.to.unwrap_or(Address::ZERO),
        value: frame.value.unwrap_or_default(),
        gas_used: frame.gas_used,
        input: frame.input,
        output: frame.output,
        calls,
    })
}
