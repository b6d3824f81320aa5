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

//! Display formatting for decoded Solidity values.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{hex, U256};

/// Rendered values longer than this are elided.
pub const TRUNCATE_THRESHOLD: usize = 68;

const TRUNCATE_HEAD: usize = 64;
const TRUNCATE_TAIL: usize = 4;

/// Elides the middle of an over-long rendering, keeping the first 64 and the
/// last 4 characters. Values at or under [`TRUNCATE_THRESHOLD`] pass through
/// untouched.
pub fn truncate_display(text: &str) -> String {
    let len = text.chars().count();
    if len <= TRUNCATE_THRESHOLD {
        return text.to_string();
    }
    let head: String = text.chars().take(TRUNCATE_HEAD).collect();
    let tail: String = text.chars().skip(len - TRUNCATE_TAIL).collect();
    format!("{head}...{tail}")
}

/// Formats a decoded value for display in a trace line, one rule per variant:
/// numbers as decimal, addresses checksummed, byte values as `0x`-prefixed
/// hex, composites recursively.
pub fn format_sol_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(n, _) => n.to_string(),
        DynSolValue::Uint(n, _) => n.to_string(),
        DynSolValue::Address(addr) => addr.to_string(),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::FixedBytes(bytes, size) => format!("0x{}", hex::encode(&bytes[..*size])),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Array(values) | DynSolValue::FixedArray(values) => {
            let items: Vec<String> = values.iter().map(format_sol_value).collect();
            format!("[{}]", items.join(", "))
        }
        DynSolValue::Tuple(values) => {
            let items: Vec<String> = values.iter().map(format_sol_value).collect();
            format!("({})", items.join(", "))
        }
        DynSolValue::CustomStruct { prop_names, tuple, .. } => {
            if prop_names.len() == tuple.len() {
                let fields: Vec<String> = prop_names
                    .iter()
                    .zip(tuple.iter())
                    .map(|(name, value)| format!("{name}: {}", format_sol_value(value)))
                    .collect();
                format!("{{ {} }}", fields.join(", "))
            } else {
                let items: Vec<String> = tuple.iter().map(format_sol_value).collect();
                format!("({})", items.join(", "))
            }
        }
    }
}

/// Formats a decoded argument value, eliding over-long renderings.
pub fn format_arg_value(value: &DynSolValue) -> String {
    truncate_display(&format_sol_value(value))
}

/// Formats a wei amount as ether, trimming insignificant zeros.
pub fn format_ether(value: U256) -> String {
    let wei = value.to_string();
    if wei.len() <= 18 {
        // Below 1 ETH, keep at most six significant decimals.
        let padded = format!("{wei:0>18}");
        let trimmed = padded.trim_end_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            format!("0.{}", &trimmed[..trimmed.len().min(6)])
        }
    } else {
        let (whole, decimal) = wei.split_at(wei.len() - 18);
        let decimal_trimmed = decimal[..4.min(decimal.len())].trim_end_matches('0');
        if decimal_trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{decimal_trimmed}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Address};

    #[test]
    fn truncates_only_over_the_threshold() {
        let at_limit = "a".repeat(TRUNCATE_THRESHOLD);
        assert_eq!(truncate_display(&at_limit), at_limit);

        let over = format!("{}{}", "b".repeat(TRUNCATE_THRESHOLD), "tail");
        let truncated = truncate_display(&over);
        assert_eq!(truncated, format!("{}...{}", "b".repeat(64), "tail"));
        assert_eq!(truncated.len(), 64 + 3 + 4);
    }

    #[test]
    fn formats_scalars() {
        assert_eq!(format_sol_value(&DynSolValue::Bool(true)), "true");
        assert_eq!(
            format_sol_value(&DynSolValue::Uint(U256::from(1_000_000u64), 256)),
            "1000000"
        );

        let addr = address!("dac17f958d2ee523a2206206994597c13d831ec7");
        let formatted = format_sol_value(&DynSolValue::Address(addr));
        assert_eq!(formatted, addr.to_string());
        // Addresses are 42 characters and never elided.
        assert_eq!(format_arg_value(&DynSolValue::Address(addr)), formatted);
    }

    #[test]
    fn elides_huge_numbers_and_byte_strings() {
        let huge = format_arg_value(&DynSolValue::Uint(U256::MAX, 256));
        assert!(huge.contains("..."));

        let blob = format_arg_value(&DynSolValue::Bytes(vec![0xab; 64]));
        assert!(blob.starts_with("0xabab"));
        assert!(blob.contains("..."));
    }

    #[test]
    fn formats_composites() {
        let tuple = DynSolValue::Tuple(vec![
            DynSolValue::Bool(false),
            DynSolValue::Address(Address::ZERO),
        ]);
        let formatted = format_sol_value(&tuple);
        assert!(formatted.starts_with('('));
        assert!(formatted.contains("false"));
    }

    #[test]
    fn formats_ether_amounts() {
        assert_eq!(format_ether(U256::from(0u64)), "0");
        // 1 ETH
        assert_eq!(format_ether(U256::from(10u64).pow(U256::from(18u64))), "1");
        // 1.5 ETH
        assert_eq!(format_ether(U256::from(1_500_000_000_000_000_000u64)), "1.5");
        // 0.5 ETH
        assert_eq!(format_ether(U256::from(500_000_000_000_000_000u64)), "0.5");
    }
}
