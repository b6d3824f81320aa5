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

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};

/// Kind of a call frame, as reported by the geth `callTracer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallKind {
    /// Regular message call
    #[serde(alias = "call")]
    Call,
    /// CALLCODE (legacy, superseded by DELEGATECALL)
    #[serde(alias = "callcode")]
    CallCode,
    /// Read-only call
    #[serde(alias = "staticcall")]
    StaticCall,
    /// Call executing foreign code in the caller's context
    #[serde(alias = "delegatecall")]
    DelegateCall,
    /// Contract creation via CREATE
    #[serde(alias = "create")]
    Create,
    /// Contract creation via CREATE2
    #[serde(alias = "create2")]
    Create2,
    /// SELFDESTRUCT frame emitted by the tracer
    #[serde(alias = "selfdestruct")]
    SelfDestruct,
}

impl CallKind {
    /// Uppercase wire representation of this call kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::CallCode => "CALLCODE",
            Self::StaticCall => "STATICCALL",
            Self::DelegateCall => "DELEGATECALL",
            Self::Create => "CREATE",
            Self::Create2 => "CREATE2",
            Self::SelfDestruct => "SELFDESTRUCT",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallKind {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_uppercase().as_str() {
            "CALL" => Self::Call,
            "CALLCODE" => Self::CallCode,
            "STATICCALL" => Self::StaticCall,
            "DELEGATECALL" => Self::DelegateCall,
            "CREATE" => Self::Create,
            "CREATE2" => Self::Create2,
            "SELFDESTRUCT" => Self::SelfDestruct,
            other => eyre::bail!("unknown call kind: {other}"),
        };
        Ok(kind)
    }
}

/// One frame of an EVM call trace, mirroring the geth `callTracer` output.
///
/// The tree is rooted at the top-level transaction call. Depth is bounded by
/// the EVM call-depth limit in practice, but nothing here relies on that:
/// traversals use an explicit work stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTraceNode {
    /// Kind of this call frame
    #[serde(rename = "type")]
    pub kind: CallKind,
    /// Caller address
    pub from: Address,
    /// Call target (the created address for CREATE frames)
    pub to: Address,
    /// Wei transferred by this frame; absent means zero
    #[serde(default)]
    pub value: U256,
    /// Gas consumed by this frame
    #[serde(default)]
    pub gas_used: U256,
    /// ABI-encoded calldata; the first four bytes are the function selector
    #[serde(default)]
    pub input: Bytes,
    /// ABI-encoded return data, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Bytes>,
    /// Sub-calls made by this frame, in execution order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<CallTraceNode>,
}

impl CallTraceNode {
    /// Whether this frame made any sub-calls.
    pub fn has_children(&self) -> bool {
        !self.calls.is_empty()
    }

    /// Collects the set of unique call targets in this subtree, including
    /// the root's own `to`.
    pub fn collect_addresses(&self) -> HashSet<Address> {
        let mut addresses = HashSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            addresses.insert(node.to);
            stack.extend(node.calls.iter());
        }
        addresses
    }

    /// Total number of frames in this subtree, the root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.calls.iter());
        }
        count
    }
}
