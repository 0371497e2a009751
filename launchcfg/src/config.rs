// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;

use log::debug;

use crate::buttons::Buttons;

/// One selectable boot target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEntry {
    payload: String,
    offset: usize,
    buttons: Buttons,
}

impl ConfigEntry {
    pub fn new(payload: impl Into<String>, offset: usize, buttons: Buttons) -> Self {
        Self {
            payload: payload.into(),
            offset,
            buttons,
        }
    }

    /// Path of the payload binary, as written in `location`.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Byte offset into the payload to start loading from.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Buttons that must be held, and only those, to pick this entry.
    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    pub(crate) fn set_payload(&mut self, payload: String) {
        self.payload = payload;
    }

    pub(crate) fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub(crate) fn add_buttons(&mut self, buttons: Buttons) {
        self.buttons |= buttons;
    }
}

/// Parsed configuration: entries in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    entries: Vec<ConfigEntry>,
}

impl Config {
    /// Allocates `count` default entries up front.
    pub(crate) fn with_entries(count: usize) -> Self {
        let mut entries = Vec::with_capacity(count);
        entries.resize_with(count, ConfigEntry::default);
        Self { entries }
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [ConfigEntry] {
        &mut self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.entry_count()`.
    pub fn entry_at(&self, index: usize) -> &ConfigEntry {
        assert!(
            index < self.entries.len(),
            "entry index {} out of range for {} entries",
            index,
            self.entries.len()
        );
        &self.entries[index]
    }

    pub fn get(&self, index: usize) -> Option<&ConfigEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, ConfigEntry> {
        self.entries.iter()
    }

    /// First entry whose button mask equals `held` exactly.
    pub fn select(&self, held: Buttons) -> Option<&ConfigEntry> {
        let found = self.entries.iter().position(|e| e.buttons == held);
        match found {
            Some(index) => debug!("buttons {} select entry {}", held, index),
            None => debug!("no entry for buttons {}", held),
        }
        found.map(|index| &self.entries[index])
    }

    /// Releases every entry. The config is empty afterwards and may be
    /// destroyed again.
    pub fn destroy(&mut self) {
        self.entries = Vec::new();
    }
}

impl<'a> IntoIterator for &'a Config {
    type Item = &'a ConfigEntry;
    type IntoIter = core::slice::Iter<'a, ConfigEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
