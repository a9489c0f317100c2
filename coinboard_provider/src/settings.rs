//! Tracked-item configuration.
//!
//! The settings file holds the user's list as a JSON array of `{"name": "..."}` entries,
//! e.g. `[{"name":"btc"},{"name":"eth"}]`. Names are upper-cased, blanks dropped and the
//! list truncated to [`MAX_SLOTS`]. A missing file reads as an empty list; the provider
//! then falls back to the fetcher's top items.
//!
//! [`SettingsWatcher`] polls the file and reports when the parsed list changes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use coinboard_common::net::MAX_SLOTS;
use coinboard_common::{Result, TrackedItem};
use log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SettingsEntry {
    name: String,
}

/// Parse the settings JSON into slot bindings.
pub fn parse_tracked(bytes: &[u8]) -> Result<Vec<TrackedItem>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let entries: Vec<SettingsEntry> = serde_json::from_slice(bytes)?;
    let ids: Vec<String> = entries
        .into_iter()
        .map(|entry| entry.name.trim().to_uppercase())
        .filter(|name| !name.is_empty())
        .collect();
    if ids.len() > MAX_SLOTS {
        warn!("{} items configured; only the first {} are tracked", ids.len(), MAX_SLOTS);
    }
    Ok(TrackedItem::from_ids(ids.iter().take(MAX_SLOTS)))
}

/// Read the tracked list from `path`. A missing file is an empty list.
pub fn load_tracked(path: &Path) -> Result<Vec<TrackedItem>> {
    match fs::read(path) {
        Ok(bytes) => parse_tracked(&bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Polls the settings file for changes to the tracked list.
pub struct SettingsWatcher {
    path: PathBuf,
    last: Option<Vec<TrackedItem>>,
}

impl SettingsWatcher {
    /// Watch `path`. The first successful read becomes the baseline.
    pub fn new(path: &Path) -> Self {
        let last = load_tracked(path).ok();
        Self {
            path: path.to_path_buf(),
            last,
        }
    }

    /// Path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current tracked list, as last read.
    pub fn current(&self) -> Vec<TrackedItem> {
        self.last.clone().unwrap_or_default()
    }

    /// Re-read the file. Returns the new list if it differs from the previous read.
    ///
    /// Unreadable or invalid contents are logged and ignored so a half-written file does
    /// not wipe the list.
    pub fn poll(&mut self) -> Option<Vec<TrackedItem>> {
        match load_tracked(&self.path) {
            Ok(items) => {
                if self.last.as_ref() == Some(&items) {
                    return None;
                }
                info!("Settings changed: {} tracked items", items.len());
                self.last = Some(items.clone());
                Some(items)
            }
            Err(e) => {
                warn!("Ignoring unreadable settings {}: {}", self.path.display(), e);
                None
            }
        }
    }
}
