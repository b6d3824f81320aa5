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

//! Contract name/ABI resolution against a block-explorer metadata source.
//!
//! A resolver session is bound to one endpoint + chain combination. The
//! chain id is fetched from the transport before anything else; resolution
//! cannot start without it. Individual lookups degrade on failure so a
//! single unverified contract never sinks a whole batch.

use alloy_chains::Chain;
use alloy_json_abi::JsonAbi;
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use eyre::{eyre, Result};
use foundry_block_explorers::Client as ExplorerClient;
use futures::future::join_all;
use std::{collections::BTreeSet, sync::Arc};
use tracelens_common::{AddressBook, QueryKey, ResolutionCache, ResolvedContract};
use tracing::{debug, info, warn};

/// Resolves contract names and ABIs for the call targets of a trace.
pub struct ContractResolver {
    endpoint: String,
    chain_id: u64,
    explorer: ExplorerClient,
    cache: Arc<ResolutionCache>,
    session: u64,
}

impl ContractResolver {
    /// Connects a resolver session to an RPC endpoint.
    ///
    /// The chain id is fetched from the transport first and gates the rest
    /// of the session: without it no metadata source can be configured.
    /// Starting a session supersedes any still-running batch from an earlier
    /// endpoint or chain.
    pub async fn connect(
        endpoint: &str,
        api_key: Option<String>,
        cache: Arc<ResolutionCache>,
    ) -> Result<Self> {
        let provider = ProviderBuilder::new().connect(endpoint).await?;
        let chain_id = provider.get_chain_id().await?;
        info!(endpoint, chain_id, "resolver session connected");

        let mut builder = ExplorerClient::builder().chain(Chain::from_id(chain_id))?;
        if let Some(key) = api_key {
            builder = builder.with_api_key(key);
        }
        let explorer = builder.build()?;

        let session = cache.begin_session();
        Ok(Self { endpoint: endpoint.to_string(), chain_id, explorer, cache, session })
    }

    /// The chain id this session resolves against.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Resolves every address in one parallel batch.
    ///
    /// An identical batch (same addresses, endpoint, and chain) is served
    /// from the cache without network traffic. Per-address failures are
    /// caught individually and degrade to an empty ABI with the address as
    /// the display name.
    pub async fn resolve_all(&self, addresses: &BTreeSet<Address>) -> Arc<AddressBook> {
        let key = QueryKey::new(addresses.iter().copied(), &self.endpoint, self.chain_id);
        if let Some(book) = self.cache.get(&key) {
            debug!(count = addresses.len(), "resolution batch served from cache");
            return book;
        }

        let lookups = addresses.iter().map(|address| self.resolve_one(*address));
        let resolved = join_all(lookups).await;

        let mut book = AddressBook::default();
        for contract in resolved {
            book.insert(contract);
        }
        let book = Arc::new(book);

        if !self.cache.insert(self.session, key, book.clone()) {
            debug!("resolution batch finished after its session was superseded");
        }
        book
    }

    /// Resolves a single address; never fails.
    async fn resolve_one(&self, address: Address) -> ResolvedContract {
        match self.lookup(address).await {
            Ok(contract) => contract,
            Err(err) => {
                warn!(%address, %err, "contract resolution failed");
                ResolvedContract::unresolved(address)
            }
        }
    }

    /// Fetches verified metadata for an address, following one level of
    /// proxy indirection for the ABI.
    async fn lookup(&self, address: Address) -> Result<ResolvedContract> {
        let metadata = self.explorer.contract_source_code(address).await?;
        let item = metadata
            .items
            .first()
            .ok_or_else(|| eyre!("no verified source for {address}"))?;

        let mut abi: JsonAbi = serde_json::from_str(&item.abi)?;
        let name = if item.contract_name.is_empty() {
            address.to_string()
        } else {
            item.contract_name.clone()
        };

        // Proxies delegate to an implementation; its ABI is the one callers
        // actually hit. Keep the proxy's name either way.
        if item.proxy == 1 {
            if let Some(implementation) = item.implementation {
                match self.explorer.contract_abi(implementation).await {
                    Ok(impl_abi) => abi = impl_abi,
                    Err(err) => {
                        debug!(%address, %implementation, %err, "proxy implementation lookup failed")
                    }
                }
            }
        }

        Ok(ResolvedContract::new(address, abi, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    // Exercises the full resolution path against live endpoints; run with
    // `cargo test -- --ignored` and a reachable mainnet RPC in ETH_RPC_URL.
    #[tokio::test]
    #[ignore = "hits live RPC and explorer endpoints"]
    async fn resolves_mainnet_weth() -> Result<()> {
        let endpoint =
            std::env::var("ETH_RPC_URL").unwrap_or_else(|_| "https://eth.llamarpc.com".to_string());
        let api_key = std::env::var("ETHERSCAN_API_KEY").ok();

        let cache = Arc::new(ResolutionCache::new());
        let resolver = ContractResolver::connect(&endpoint, api_key, cache.clone()).await?;
        assert_eq!(resolver.chain_id(), 1);

        let weth = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
        let book = resolver.resolve_all(&BTreeSet::from([weth])).await;

        let contract = book.get(&weth).expect("weth must be present");
        assert!(contract.is_resolved());
        assert_eq!(contract.name, "WETH9");

        // The identical batch must come out of the cache.
        assert_eq!(cache.len(), 1);
        let again = resolver.resolve_all(&BTreeSet::from([weth])).await;
        assert_eq!(again.name_of(weth), "WETH9");
        Ok(())
    }
}
