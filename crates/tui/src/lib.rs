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

//! Terminal User Interface for TraceLens
//!
//! Renders a call trace as an interactive, collapsible tree. Contract
//! resolution runs on a background task; the UI stays responsive and shows
//! a loading screen until the address book arrives.

mod app;
mod panel;
mod theme;
/// Pure tree-to-lines rendering, shared by the panel and its tests
pub mod tree;

pub use app::{App, EventResponse};
pub use panel::TracePanel;
pub use theme::Theme;

use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::Result;
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc, time::Duration};
use tokio::{select, sync::oneshot, time::interval};
use tracing::{debug, info, warn};
use tracelens_common::{AddressBook, CallTraceNode};

/// Terminal refresh interval.
const REFRESH_INTERVAL: Duration = Duration::from_millis(50);

/// Main TUI runner managing the terminal and the event loop.
pub struct Tui {
    app: App,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    /// Sets up the terminal and creates the application for a fetched trace.
    pub fn new(trace: CallTraceNode) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { app: App::new(trace), terminal })
    }

    /// Runs the event loop until the user quits.
    ///
    /// `resolution` delivers the address book once the background batch
    /// settles. If the sender is dropped without a result the UI stays on
    /// the loading screen; quitting remains available throughout.
    pub async fn run(mut self, resolution: oneshot::Receiver<Arc<AddressBook>>) -> Result<()> {
        info!("starting TUI event loop");

        let mut resolution = Some(resolution);
        let mut event_stream = EventStream::new();
        let mut ticker = interval(REFRESH_INTERVAL);

        loop {
            let app = &mut self.app;
            self.terminal.draw(|frame| app.render(frame))?;

            select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(Event::Key(key_event))) = maybe_event {
                        match self.app.handle_key_event(key_event)? {
                            EventResponse::Exit => break,
                            EventResponse::Handled => {}
                            EventResponse::NotHandled => {
                                debug!("unhandled key event: {key_event:?}");
                            }
                        }
                    }
                }
                _ = ticker.tick() => {
                    if let Some(rx) = resolution.as_mut() {
                        match rx.try_recv() {
                            Ok(book) => {
                                self.app.set_address_book(book);
                                resolution = None;
                            }
                            Err(oneshot::error::TryRecvError::Empty) => {}
                            Err(oneshot::error::TryRecvError::Closed) => {
                                warn!("resolution task ended without delivering a result");
                                resolution = None;
                            }
                        }
                    }
                }
            }

            if self.app.should_exit() {
                break;
            }
        }

        info!("TUI event loop ended");
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
