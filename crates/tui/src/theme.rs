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

//! Color scheme for the trace panel.

use ratatui::style::Color;
use tracelens_common::CallKind;

/// Colors for the individual segments of a trace line.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Tree indentation and expand/collapse indicators
    pub tree: Color,
    /// Gas-used segment
    pub gas: Color,
    /// ETH value segment
    pub value: Color,
    /// Contract name segment
    pub contract: Color,
    /// Function name segment
    pub function: Color,
    /// Argument list segment
    pub args: Color,
    /// Return value segment
    pub output: Color,
    /// Panel border
    pub border: Color,
    /// Help line at the bottom
    pub help: Color,
    /// Background of the selected line
    pub selection_bg: Color,
    call: Color,
    staticcall: Color,
    delegatecall: Color,
    create: Color,
    create2: Color,
    other_kind: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            tree: Color::DarkGray,
            gas: Color::Gray,
            value: Color::Yellow,
            contract: Color::Cyan,
            function: Color::Magenta,
            args: Color::LightCyan,
            output: Color::LightGreen,
            border: Color::DarkGray,
            help: Color::DarkGray,
            selection_bg: Color::Rgb(60, 60, 80),
            call: Color::Blue,
            staticcall: Color::Green,
            delegatecall: Color::LightMagenta,
            create: Color::Red,
            create2: Color::LightRed,
            other_kind: Color::Gray,
        }
    }
}

impl Theme {
    /// Color of the call-type tag for a given kind.
    pub fn call_kind_color(&self, kind: CallKind) -> Color {
        match kind {
            CallKind::Call | CallKind::CallCode => self.call,
            CallKind::StaticCall => self.staticcall,
            CallKind::DelegateCall => self.delegatecall,
            CallKind::Create => self.create,
            CallKind::Create2 => self.create2,
            CallKind::SelfDestruct => self.other_kind,
        }
    }
}
