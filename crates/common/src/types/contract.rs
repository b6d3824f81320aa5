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

use alloy_json_abi::JsonAbi;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolution result for a single contract address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedContract {
    /// The resolved address
    pub address: Address,
    /// The contract's ABI; empty when resolution found nothing
    pub abi: JsonAbi,
    /// Human-readable contract name; the checksummed address when unknown
    pub name: String,
}

impl ResolvedContract {
    /// Creates a resolution result.
    pub fn new(address: Address, abi: JsonAbi, name: String) -> Self {
        Self { address, abi, name }
    }

    /// Creates the degraded result used when resolution fails: an empty ABI
    /// and the address itself as the display name.
    pub fn unresolved(address: Address) -> Self {
        Self { address, abi: JsonAbi::default(), name: address.to_string() }
    }

    /// Whether resolution produced any ABI entries for this address.
    pub fn is_resolved(&self) -> bool {
        !self.abi.is_empty()
    }
}

/// Mapping from call targets to their resolution results.
///
/// Read-only at render time. Lookups for addresses that never resolved (or
/// whose resolution is still in flight) degrade instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressBook {
    contracts: HashMap<Address, ResolvedContract>,
}

impl AddressBook {
    /// Inserts a resolution result, replacing any previous one for the
    /// same address.
    pub fn insert(&mut self, contract: ResolvedContract) {
        self.contracts.insert(contract.address, contract);
    }

    /// Looks up the full resolution result for an address.
    pub fn get(&self, address: &Address) -> Option<&ResolvedContract> {
        self.contracts.get(address)
    }

    /// The ABI resolved for an address, if any.
    pub fn abi_of(&self, address: Address) -> Option<&JsonAbi> {
        self.contracts.get(&address).map(|c| &c.abi)
    }

    /// The display name for an address, falling back to the checksummed
    /// address itself.
    pub fn name_of(&self, address: Address) -> String {
        match self.contracts.get(&address) {
            Some(contract) => contract.name.clone(),
            None => address.to_string(),
        }
    }

    /// Number of resolved addresses.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether the book holds no entries.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn name_falls_back_to_checksummed_address() {
        let book = AddressBook::default();
        let addr = address!("dac17f958d2ee523a2206206994597c13d831ec7");
        assert_eq!(book.name_of(addr), addr.to_string());
        assert!(book.abi_of(addr).is_none());
    }

    #[test]
    fn unresolved_contract_is_marked_as_such() {
        let addr = address!("dac17f958d2ee523a2206206994597c13d831ec7");
        let contract = ResolvedContract::unresolved(addr);
        assert!(!contract.is_resolved());
        assert_eq!(contract.name, addr.to_string());

        let named = ResolvedContract::new(
            addr,
            JsonAbi::parse(["function totalSupply() returns (uint256)"]).unwrap(),
            "TetherToken".to_string(),
        );
        assert!(named.is_resolved());

        let mut book = AddressBook::default();
        book.insert(contract);
        book.insert(named);
        assert_eq!(book.len(), 1);
        assert_eq!(book.name_of(addr), "TetherToken");
    }
}
