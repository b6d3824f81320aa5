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

//! Logging setup shared by TraceLens binaries.

use eyre::{eyre, Result};
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

/// Initializes file-only logging under `~/.tracelens/logs`, keeping the
/// terminal free for the UI. Returns the path of the log file.
///
/// The filter honors `RUST_LOG` and defaults to `info`.
pub fn init_file_only_logging(name: &str) -> Result<PathBuf> {
    let log_dir = dirs_next::home_dir()
        .ok_or_else(|| eyre!("could not determine home directory"))?
        .join(".tracelens")
        .join("logs");
    fs::create_dir_all(&log_dir)?;

    let file_name = format!("{name}.log");
    let appender = tracing_appender::rolling::never(&log_dir, &file_name);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(appender)
        .with_ansi(false)
        .init();

    Ok(log_dir.join(file_name))
}
