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

//! Pure rendering of a call-trace tree into display lines.
//!
//! Everything in this module is a function of (trace, address book,
//! collapsed set): given identical inputs, identical lines come out. Nodes
//! are keyed by their structural path (`root`, `root-0`, `root-2-0`, ...),
//! which is what the collapsed set stores.

use crate::theme::Theme;
use alloy_json_abi::JsonAbi;
use alloy_primitives::U256;
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use std::collections::HashSet;
use tracelens_common::{decode_call, format_ether, AddressBook, CallTraceNode};

/// Structural path of the top-level frame.
pub const ROOT_PATH: &str = "root";

/// Frames shallower than this start expanded; everything deeper starts
/// collapsed.
pub const DEFAULT_EXPAND_DEPTH: usize = 2;

/// Path of the `index`-th child of the frame at `parent`.
pub fn child_path(parent: &str, index: usize) -> String {
    format!("{parent}-{index}")
}

/// One visible row of the rendered tree.
#[derive(Debug, Clone)]
pub struct VisibleRow<'a> {
    /// The frame rendered on this row
    pub node: &'a CallTraceNode,
    /// Structural path of the frame
    pub path: String,
    /// Nesting depth (root = 0)
    pub depth: usize,
    /// Whether the frame's children are currently shown
    pub expanded: bool,
}

/// The paths collapsed by default for a freshly loaded trace: every frame
/// with children at [`DEFAULT_EXPAND_DEPTH`] or deeper.
pub fn default_collapsed(root: &CallTraceNode) -> HashSet<String> {
    let mut collapsed = HashSet::new();
    let mut stack = vec![(root, ROOT_PATH.to_string(), 0usize)];
    while let Some((node, path, depth)) = stack.pop() {
        if depth >= DEFAULT_EXPAND_DEPTH && node.has_children() {
            collapsed.insert(path.clone());
        }
        for (i, child) in node.calls.iter().enumerate() {
            stack.push((child, child_path(&path, i), depth + 1));
        }
    }
    collapsed
}

/// Flips the collapse state of a single path, leaving all others untouched.
pub fn toggle(collapsed: &mut HashSet<String>, path: &str) {
    if !collapsed.remove(path) {
        collapsed.insert(path.to_string());
    }
}

/// Walks the tree in display order, descending only into expanded frames.
pub fn visible_rows<'a>(
    root: &'a CallTraceNode,
    collapsed: &HashSet<String>,
) -> Vec<VisibleRow<'a>> {
    let mut rows = Vec::new();
    let mut stack = vec![(root, ROOT_PATH.to_string(), 0usize)];
    while let Some((node, path, depth)) = stack.pop() {
        let expanded = !collapsed.contains(&path);
        if expanded {
            // Reverse push keeps children in execution order on the stack.
            for (i, child) in node.calls.iter().enumerate().rev() {
                stack.push((child, child_path(&path, i), depth + 1));
            }
        }
        rows.push(VisibleRow { node, path, depth, expanded });
    }
    rows
}

/// Renders one frame as a styled line.
///
/// Segment order is fixed: call-type tag, gas used, ETH value (only when
/// nonzero), contract name, function name, argument list, return value.
/// Frames whose address has no ABI in the book degrade to the raw selector.
pub fn frame_line(row: &VisibleRow<'_>, book: &AddressBook, theme: &Theme) -> Line<'static> {
    let node = row.node;
    let indent = "│ ".repeat(row.depth);
    let indicator = if node.has_children() {
        if row.expanded {
            "▼ "
        } else {
            "▶ "
        }
    } else {
        "  "
    };

    let empty = JsonAbi::default();
    let abi = book.abi_of(node.to).unwrap_or(&empty);
    let decoded = decode_call(abi, &node.input, node.output.as_deref().map(|v| &**v));
    let args = decoded.args_display();

    let mut spans = vec![
        Span::styled(format!("{indent}{indicator}"), Style::default().fg(theme.tree)),
        Span::styled(
            format!("[{}] ", node.kind),
            Style::default().fg(theme.call_kind_color(node.kind)),
        ),
        Span::styled(format!("[{}]: ", node.gas_used), Style::default().fg(theme.gas)),
    ];
    if node.value != U256::ZERO {
        spans.push(Span::styled(
            format!("ETH {} ", format_ether(node.value)),
            Style::default().fg(theme.value),
        ));
    }
    spans.push(Span::styled(
        format!("({}).", book.name_of(node.to)),
        Style::default().fg(theme.contract),
    ));
    spans.push(Span::styled(decoded.function_name, Style::default().fg(theme.function)));
    spans.push(Span::raw("("));
    spans.push(Span::styled(args, Style::default().fg(theme.args)));
    spans.push(Span::raw(") => ("));
    spans.push(Span::styled(decoded.output, Style::default().fg(theme.output)));
    spans.push(Span::raw(")"));
    Line::from(spans)
}

/// Plain-text projection of a rendered line.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex, Address, Bytes};
    use tracelens_common::{CallKind, ResolvedContract};

    fn frame(to: Address, input: Vec<u8>, calls: Vec<CallTraceNode>) -> CallTraceNode {
        CallTraceNode {
            kind: CallKind::Call,
            from: Address::ZERO,
            to,
            value: U256::ZERO,
            gas_used: U256::from(21000u64),
            input: Bytes::from(input),
            output: None,
            calls,
        }
    }

    fn token_address() -> Address {
        address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
    }

    fn unknown_address() -> Address {
        address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb")
    }

    /// Two-level trace: an ERC-20 transfer whose target makes one
    /// unresolvable sub-call.
    fn sample_trace() -> CallTraceNode {
        let mut transfer_input = hex::decode("a9059cbb").unwrap();
        transfer_input.extend_from_slice(&[0u8; 12]);
        transfer_input.extend_from_slice(unknown_address().as_slice());
        transfer_input.extend_from_slice(&U256::from(1000u64).to_be_bytes::<32>());

        let mut balance_input = hex::decode("70a08231").unwrap();
        balance_input.extend_from_slice(&[0u8; 32]);

        let child = frame(unknown_address(), balance_input, vec![]);
        frame(token_address(), transfer_input, vec![child])
    }

    fn sample_book() -> AddressBook {
        let mut book = AddressBook::default();
        book.insert(ResolvedContract::new(
            token_address(),
            JsonAbi::parse(["function transfer(address to, uint256 amount) returns (bool)"])
                .unwrap(),
            "Token".to_string(),
        ));
        book
    }

    fn render_texts(trace: &CallTraceNode, book: &AddressBook) -> Vec<String> {
        let theme = Theme::default();
        visible_rows(trace, &HashSet::new())
            .iter()
            .map(|row| line_text(&frame_line(row, book, &theme)))
            .collect()
    }

    #[test]
    fn resolved_and_degraded_frames_render_side_by_side() {
        let texts = render_texts(&sample_trace(), &sample_book());
        assert_eq!(texts.len(), 2);

        let root = &texts[0];
        assert!(root.contains("(Token).transfer("));
        assert!(root.contains(&format!("to={}", unknown_address())));
        assert!(root.contains("amount=1000"));

        let child = &texts[1];
        assert!(child.contains("0x70a08231(call_data="));
        assert!(child.contains(") => (void)"));
        // The unresolved address itself names the contract.
        assert!(child.contains(&format!("({}).", unknown_address())));
    }

    #[test]
    fn segments_keep_their_order() {
        let mut trace = sample_trace();
        trace.value = U256::from(10u64).pow(U256::from(18u64));
        let text = &render_texts(&trace, &sample_book())[0];

        let positions = [
            text.find("[CALL] ").unwrap(),
            text.find("[21000]: ").unwrap(),
            text.find("ETH 1 ").unwrap(),
            text.find("(Token).").unwrap(),
            text.find("transfer(").unwrap(),
            text.find(") => (").unwrap(),
        ];
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn zero_value_renders_no_ether_segment() {
        let texts = render_texts(&sample_trace(), &sample_book());
        assert!(!texts[0].contains("ETH "));
    }

    #[test]
    fn rendering_is_deterministic() {
        let trace = sample_trace();
        let book = sample_book();
        assert_eq!(render_texts(&trace, &book), render_texts(&trace, &book));
    }

    #[test]
    fn default_collapse_spares_the_first_two_levels() {
        // depth 0 -> 1 -> 2 -> 3, every level with one child
        let deep = frame(
            token_address(),
            vec![],
            vec![frame(
                token_address(),
                vec![],
                vec![frame(token_address(), vec![], vec![frame(token_address(), vec![], vec![])])],
            )],
        );

        let collapsed = default_collapsed(&deep);
        assert!(!collapsed.contains(ROOT_PATH));
        assert!(!collapsed.contains("root-0"));
        assert!(collapsed.contains("root-0-0"));

        // Depths 0..=2 visible, depth 3 hidden behind the collapsed frame.
        let rows = visible_rows(&deep, &collapsed);
        assert_eq!(rows.len(), 3);
        assert!(!rows.iter().any(|row| row.depth > 2));
    }

    #[test]
    fn toggle_flips_only_the_given_path() {
        let mut collapsed = HashSet::from(["root-1".to_string()]);
        toggle(&mut collapsed, "root-0");
        assert!(collapsed.contains("root-0"));
        assert!(collapsed.contains("root-1"));

        toggle(&mut collapsed, "root-0");
        assert!(!collapsed.contains("root-0"));
        assert!(collapsed.contains("root-1"));
    }

    #[test]
    fn collapsed_frames_hide_their_subtree() {
        let trace = sample_trace();
        let mut collapsed = HashSet::new();
        toggle(&mut collapsed, ROOT_PATH);

        let rows = visible_rows(&trace, &collapsed);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].expanded);

        let theme = Theme::default();
        let text = line_text(&frame_line(&rows[0], &sample_book(), &theme));
        assert!(text.starts_with("▶ "));
    }

    #[test]
    fn sibling_paths_follow_execution_order() {
        let mut trace = sample_trace();
        trace.calls.push(frame(unknown_address(), vec![], vec![]));

        let rows = visible_rows(&trace, &HashSet::new());
        let paths: Vec<&str> = rows.iter().map(|row| row.path.as_str()).collect();
        assert_eq!(paths, ["root", "root-0", "root-1"]);
        assert_eq!(rows[1].depth, 1);
    }
}
