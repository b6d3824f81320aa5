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

//! Application state and key handling.

use crate::{panel::TracePanel, theme::Theme};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use eyre::Result;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::sync::Arc;
use tracelens_common::{AddressBook, CallTraceNode};
use tracing::debug;

/// Response from key-event handling.
#[derive(Debug)]
pub enum EventResponse {
    /// Event was handled, no further action needed
    Handled,
    /// Event was not handled, pass to next handler
    NotHandled,
    /// Request application exit
    Exit,
}

/// Top-level application state: the trace panel plus the resolution result
/// it is waiting on.
#[derive(Debug)]
pub struct App {
    panel: TracePanel,
    book: Option<Arc<AddressBook>>,
    theme: Theme,
    should_exit: bool,
}

impl App {
    /// Creates the application for a fetched trace. The tree stays behind a
    /// loading screen until the address book arrives.
    pub fn new(trace: CallTraceNode) -> Self {
        Self {
            panel: TracePanel::new(trace),
            book: None,
            theme: Theme::default(),
            should_exit: false,
        }
    }

    /// Hands the completed resolution batch to the UI.
    pub fn set_address_book(&mut self, book: Arc<AddressBook>) {
        debug!(contracts = book.len(), "address book ready");
        self.book = Some(book);
    }

    /// Whether contract resolution has completed.
    pub fn is_resolved(&self) -> bool {
        self.book.is_some()
    }

    /// Whether the user asked to quit.
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Renders the whole screen: the tree (or the loading placeholder) plus
    /// a one-line help footer.
    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let [main, help] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

        match self.book.clone() {
            Some(book) => self.panel.render(frame, main, &book, &self.theme),
            None => self.render_loading(frame, main),
        }

        let help_text = if self.book.is_some() {
            "↑/↓: Navigate • Enter: Toggle expand/collapse • q: Quit"
        } else {
            "q: Quit"
        };
        frame.render_widget(
            Paragraph::new(help_text).style(Style::default().fg(self.theme.help)),
            help,
        );
    }

    fn render_loading(&self, frame: &mut Frame<'_>, area: Rect) {
        let placeholder = Paragraph::new("Loading...").block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border))
                .title("Transaction Trace"),
        );
        frame.render_widget(placeholder, area);
    }

    /// Handles a key event.
    pub fn handle_key_event(&mut self, event: KeyEvent) -> Result<EventResponse> {
        if event.kind != KeyEventKind::Press {
            return Ok(EventResponse::NotHandled);
        }

        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_exit = true;
                Ok(EventResponse::Exit)
            }
            // Navigation only makes sense once the tree is on screen.
            KeyCode::Up if self.book.is_some() => {
                self.panel.move_up();
                Ok(EventResponse::Handled)
            }
            KeyCode::Down if self.book.is_some() => {
                self.panel.move_down();
                Ok(EventResponse::Handled)
            }
            KeyCode::Enter if self.book.is_some() => {
                self.panel.toggle_selected();
                Ok(EventResponse::Handled)
            }
            _ => Ok(EventResponse::NotHandled),
        }
    }
}
