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

//! TraceLens common - shared functionality for TraceLens components
//!
//! This crate holds the call-trace data model and the pure decoding logic
//! that both the resolution engine and the terminal UI build on.

/// Core types: call-trace tree, resolved contracts, and value formatting
pub mod types;

/// Session-scoped cache for contract resolution batches
pub mod cache;
/// Function-call decoding against a contract ABI
pub mod decode;
/// Logging setup shared by TraceLens binaries
pub mod logging;

pub use cache::*;
pub use decode::*;
pub use types::*;
