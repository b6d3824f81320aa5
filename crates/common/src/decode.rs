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

//! Function-call decoding against a contract ABI.
//!
//! Decoding never fails: any problem (unknown selector, malformed calldata,
//! arity mismatch) degrades to a raw selector plus truncated hex display.

use crate::types::{format_arg_value, truncate_display};
use alloy_dyn_abi::{FunctionExt, JsonAbiExt};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{hex, Selector};
use tracing::debug;

/// One decoded argument of a call frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArg {
    /// Parameter name, or `arg{i}` when the ABI leaves it unnamed
    pub name: String,
    /// Display-formatted value
    pub value: String,
}

/// Decode result for one call frame, derived at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall {
    /// Resolved function name, or the `0x`-prefixed selector when unresolved
    pub function_name: String,
    /// Decoded arguments in declaration order
    pub args: Vec<DecodedArg>,
    /// Decoded or raw return value
    pub output: String,
}

impl DecodedCall {
    /// Comma-joined `name=value` rendering of the argument list.
    pub fn args_display(&self) -> String {
        let parts: Vec<String> =
            self.args.iter().map(|arg| format!("{}={}", arg.name, arg.value)).collect();
        parts.join(", ")
    }

    /// Full `name(args) => (output)` rendering of the call.
    pub fn display(&self) -> String {
        format!("{}({}) => ({})", self.function_name, self.args_display(), self.output)
    }
}

/// Decodes a call frame's input and output against a contract ABI.
///
/// Side-effect free and deterministic apart from logging; identical inputs
/// yield structurally identical results.
pub fn decode_call(abi: &JsonAbi, input: &[u8], output: Option<&[u8]>) -> DecodedCall {
    if input.len() >= 4 {
        let selector = Selector::from_slice(&input[..4]);
        if let Some(function) = abi.functions().find(|f| f.selector() == selector) {
            match function.abi_decode_input(&input[4..]) {
                Ok(values) => {
                    let args = values
                        .iter()
                        .enumerate()
                        .map(|(i, value)| DecodedArg {
                            name: function
                                .inputs
                                .get(i)
                                .map(|param| param.name.clone())
                                .filter(|name| !name.is_empty())
                                .unwrap_or_else(|| format!("arg{i}")),
                            value: format_arg_value(value),
                        })
                        .collect();
                    return DecodedCall {
                        function_name: function.name.clone(),
                        args,
                        output: decode_output(function, output),
                    };
                }
                Err(err) => {
                    debug!(function = %function.name, %err, "calldata decode failed");
                }
            }
        }
    }
    degraded(input, output)
}

/// Best-effort decode of return data; falls back to raw hex.
fn decode_output(function: &Function, output: Option<&[u8]>) -> String {
    let Some(out) = output.filter(|out| !out.is_empty()) else {
        return String::new();
    };
    match function.abi_decode_output(out) {
        Ok(values) => {
            let parts: Vec<String> = values.iter().map(format_arg_value).collect();
            parts.join(", ")
        }
        Err(err) => {
            debug!(function = %function.name, %err, "return data decode failed");
            truncate_display(&format!("0x{}", hex::encode(out)))
        }
    }
}

/// Degraded display: the raw selector named as the function, with the
/// remaining calldata exposed as a single `call_data` argument.
fn degraded(input: &[u8], output: Option<&[u8]>) -> DecodedCall {
    let split = input.len().min(4);
    let call_data = hex::encode(&input[split..]);
    let output = match output {
        Some(out) if !out.is_empty() => truncate_display(&format!("0x{}", hex::encode(out))),
        _ => "void".to_string(),
    };
    DecodedCall {
        function_name: format!("0x{}", hex::encode(&input[..split])),
        args: vec![DecodedArg {
            name: "call_data".to_string(),
            value: truncate_display(&call_data),
        }],
        output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Address, U256};

    fn erc20_abi() -> JsonAbi {
        JsonAbi::parse([
            "function transfer(address to, uint256 amount) returns (bool)",
            "function approve(address, uint256) returns (bool)",
        ])
        .unwrap()
    }

    fn transfer_input(to: Address, amount: U256) -> Vec<u8> {
        let mut input = hex::decode("a9059cbb").unwrap();
        input.extend_from_slice(&[0u8; 12]);
        input.extend_from_slice(to.as_slice());
        input.extend_from_slice(&amount.to_be_bytes::<32>());
        input
    }

    #[test]
    fn decodes_known_function_with_named_args() {
        let to = address!("1111111111111111111111111111111111111111");
        let input = transfer_input(to, U256::from(1000u64));

        let decoded = decode_call(&erc20_abi(), &input, None);
        assert_eq!(decoded.function_name, "transfer");
        assert_eq!(decoded.args.len(), 2);
        assert_eq!(decoded.args[0].name, "to");
        assert_eq!(decoded.args[0].value, to.to_string());
        assert_eq!(decoded.args[1].name, "amount");
        assert_eq!(decoded.args[1].value, "1000");
        assert_eq!(decoded.output, "");
        assert_eq!(decoded.display(), format!("transfer(to={to}, amount=1000) => ()"));
    }

    #[test]
    fn falls_back_to_positional_names() {
        let mut input = hex::decode("095ea7b3").unwrap();
        input.extend_from_slice(&[0u8; 12]);
        input.extend_from_slice(Address::ZERO.as_slice());
        input.extend_from_slice(&U256::from(1u64).to_be_bytes::<32>());

        let decoded = decode_call(&erc20_abi(), &input, None);
        assert_eq!(decoded.function_name, "approve");
        assert_eq!(decoded.args[0].name, "arg0");
        assert_eq!(decoded.args[1].name, "arg1");
    }

    #[test]
    fn unknown_selector_degrades_to_raw_selector() {
        let mut input = hex::decode("70a08231").unwrap();
        input.extend_from_slice(&[0u8; 32]);

        let decoded = decode_call(&erc20_abi(), &input, None);
        assert_eq!(decoded.function_name, "0x70a08231");
        assert_eq!(decoded.args.len(), 1);
        assert_eq!(decoded.args[0].name, "call_data");
        assert_eq!(decoded.args[0].value, "0".repeat(64));
        assert_eq!(decoded.output, "void");
    }

    #[test]
    fn short_input_never_panics() {
        for input in [&[][..], &[0xa9][..], &[0xa9, 0x05, 0x9c][..]] {
            let decoded = decode_call(&erc20_abi(), input, None);
            assert_eq!(decoded.function_name, format!("0x{}", hex::encode(input)));
            assert_eq!(decoded.args[0].name, "call_data");
        }
    }

    #[test]
    fn arity_mismatch_degrades() {
        // Valid transfer selector with half the expected payload.
        let mut input = hex::decode("a9059cbb").unwrap();
        input.extend_from_slice(&[0u8; 32]);

        let decoded = decode_call(&erc20_abi(), &input, None);
        assert_eq!(decoded.function_name, "0xa9059cbb");
    }

    #[test]
    fn decode_is_idempotent() {
        let input = transfer_input(Address::ZERO, U256::from(42u64));
        let first = decode_call(&erc20_abi(), &input, Some(&[0u8; 32]));
        let second = decode_call(&erc20_abi(), &input, Some(&[0u8; 32]));
        assert_eq!(first, second);
    }

    #[test]
    fn decodes_boolean_return_value() {
        let input = transfer_input(Address::ZERO, U256::from(1u64));
        let output = U256::from(1u64).to_be_bytes::<32>();

        let decoded = decode_call(&erc20_abi(), &input, Some(&output));
        assert_eq!(decoded.output, "true");
    }

    #[test]
    fn long_call_data_is_truncated() {
        let mut input = hex::decode("deadbeef").unwrap();
        input.extend_from_slice(&[0x11u8; 100]);

        let decoded = decode_call(&JsonAbi::default(), &input, None);
        let value = &decoded.args[0].value;
        assert!(value.contains("..."));
        assert_eq!(value.len(), 64 + 3 + 4);
        assert!(value.starts_with(&"1".repeat(64)));
    }
}
