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

//! Trace panel: selection, scrolling, and expand/collapse state.

use crate::{
    theme::Theme,
    tree::{self, VisibleRow},
};
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use std::collections::HashSet;
use tracelens_common::{AddressBook, CallTraceNode};

/// Stateful widget displaying one call trace as a collapsible tree.
///
/// The panel owns the collapsed set exclusively; it is seeded from the
/// default expand depth on every trace load and reset with the panel.
#[derive(Debug)]
pub struct TracePanel {
    trace: CallTraceNode,
    collapsed: HashSet<String>,
    selected_index: usize,
    scroll_offset: usize,
    viewport_height: usize,
}

impl TracePanel {
    /// Creates a panel for a freshly loaded trace.
    pub fn new(trace: CallTraceNode) -> Self {
        let collapsed = tree::default_collapsed(&trace);
        Self { trace, collapsed, selected_index: 0, scroll_offset: 0, viewport_height: 0 }
    }

    /// Total number of frames in the trace.
    pub fn frame_count(&self) -> usize {
        self.trace.node_count()
    }

    /// Number of currently visible rows.
    pub fn visible_count(&self) -> usize {
        tree::visible_rows(&self.trace, &self.collapsed).len()
    }

    /// Structural path of the selected row.
    pub fn selected_path(&self) -> Option<String> {
        tree::visible_rows(&self.trace, &self.collapsed)
            .get(self.selected_index)
            .map(|row| row.path.clone())
    }

    /// Whether the given path is currently collapsed.
    pub fn is_collapsed(&self, path: &str) -> bool {
        self.collapsed.contains(path)
    }

    /// Moves the selection one row up.
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            if self.selected_index < self.scroll_offset {
                self.scroll_offset = self.selected_index;
            }
        }
    }

    /// Moves the selection one row down.
    pub fn move_down(&mut self) {
        let max = self.visible_count().saturating_sub(1);
        if self.selected_index < max {
            self.selected_index += 1;
            if self.viewport_height > 0
                && self.selected_index >= self.scroll_offset + self.viewport_height
            {
                self.scroll_offset =
                    (self.selected_index + 1).saturating_sub(self.viewport_height);
            }
        }
    }

    /// Toggles expansion of the selected frame. Leaf frames are left alone,
    /// and no other path's state changes.
    pub fn toggle_selected(&mut self) {
        let rows = tree::visible_rows(&self.trace, &self.collapsed);
        let Some(row) = rows.get(self.selected_index) else { return };
        if !row.node.has_children() {
            return;
        }
        let path = row.path.clone();
        tree::toggle(&mut self.collapsed, &path);

        // Collapsing can shrink the list above the selection.
        let visible = self.visible_count();
        if self.selected_index >= visible {
            self.selected_index = visible.saturating_sub(1);
        }
    }

    /// Renders the tree into the given area.
    pub fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        book: &AddressBook,
        theme: &Theme,
    ) {
        self.viewport_height = area.height.saturating_sub(2) as usize;

        let rows_len = tree::visible_rows(&self.trace, &self.collapsed).len();
        self.clamp_viewport(rows_len);

        let rows = tree::visible_rows(&self.trace, &self.collapsed);
        let items: Vec<ListItem<'_>> = rows
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(self.viewport_height)
            .map(|(index, row)| {
                let line = tree::frame_line(row, book, theme);
                let style = if index == self.selected_index {
                    Style::default().bg(theme.selection_bg)
                } else {
                    Style::default()
                };
                ListItem::new(line).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(self.title(&rows)),
        );
        frame.render_widget(list, area);
    }

    fn title(&self, rows: &[VisibleRow<'_>]) -> String {
        format!("Transaction Trace ({} visible, {} frames)", rows.len(), self.frame_count())
    }

    fn clamp_viewport(&mut self, visible: usize) {
        if self.selected_index >= visible {
            self.selected_index = visible.saturating_sub(1);
        }
        if self.viewport_height > 0 {
            if self.selected_index < self.scroll_offset {
                self.scroll_offset = self.selected_index;
            } else if self.selected_index >= self.scroll_offset + self.viewport_height {
                self.scroll_offset =
                    (self.selected_index + 1).saturating_sub(self.viewport_height);
            }
        }
    }
}
