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

//! Session-scoped cache for contract resolution batches.
//!
//! The cache is owned by the calling context and injected into the resolver,
//! so lifecycle and invalidation stay explicit. Entries are keyed by the full
//! query tuple (sorted addresses, endpoint, chain id): changing the endpoint
//! or chain changes the key, which implicitly invalidates older entries.

use crate::types::AddressBook;
use alloy_primitives::Address;
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tracing::trace;

/// Key identifying one resolution batch.
///
/// Two keys built from the same addresses compare equal regardless of the
/// order the addresses were supplied in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    addresses: Vec<Address>,
    endpoint: String,
    chain_id: u64,
}

impl QueryKey {
    /// Builds a key from the batch's addresses, the RPC endpoint they were
    /// discovered through, and the endpoint's chain id.
    pub fn new(
        addresses: impl IntoIterator<Item = Address>,
        endpoint: impl Into<String>,
        chain_id: u64,
    ) -> Self {
        let mut addresses: Vec<Address> = addresses.into_iter().collect();
        addresses.sort_unstable();
        addresses.dedup();
        Self { addresses, endpoint: endpoint.into(), chain_id }
    }

    /// Addresses covered by this batch, sorted and deduplicated.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The RPC endpoint this batch was resolved against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The chain id this batch was resolved for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

/// In-memory cache of completed resolution batches.
///
/// A monotonically increasing generation counter tracks resolver sessions.
/// Every session (one endpoint + chain combination) registers itself via
/// [`Self::begin_session`]; a batch finishing after a newer session has
/// started is dropped instead of overwriting fresher data.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    generation: AtomicU64,
    entries: RwLock<HashMap<QueryKey, Arc<AddressBook>>>,
}

impl ResolutionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The generation of the most recent resolver session.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Registers a new resolver session and returns its generation.
    pub fn begin_session(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns the cached batch for a key, if present.
    pub fn get(&self, key: &QueryKey) -> Option<Arc<AddressBook>> {
        self.entries.read().get(key).cloned()
    }

    /// Stores a completed batch. Returns `false` (and stores nothing) when
    /// the batch belongs to a session that has since been superseded.
    pub fn insert(&self, session: u64, key: QueryKey, book: Arc<AddressBook>) -> bool {
        if session < self.generation() {
            trace!(session, generation = self.generation(), "dropping stale resolution batch");
            return false;
        }
        self.entries.write().insert(key, book);
        true
    }

    /// Number of cached batches.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no batches.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
