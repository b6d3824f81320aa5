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

//! TraceLens engine - trace acquisition and contract resolution
//!
//! This crate talks to the outside world: it fetches call traces over
//! JSON-RPC and resolves contract names and ABIs through a block-explorer
//! metadata source. Everything here is async and never blocks rendering.

/// Contract name/ABI resolution against a block-explorer source
pub mod resolver;
/// Call-trace fetching over the JSON-RPC debug API
pub mod trace;

pub use resolver::*;
pub use trace::*;
