// SPDX-License-Identifier: Apache-2.0

//! Builds a [`Config`] from a token list that has already passed
//! [`crate::schema::check`].

use alloc::string::String;

use flattok::{Kind, Token};
use log::{debug, warn};

use crate::buttons::decode_button_with;
use crate::config::{Config, ConfigEntry};
use crate::cursor::Cursor;
use crate::int_parser::parse_offset;
use crate::options::ParseOptions;
use crate::parse_error::{ParseError, SchemaError, SemanticError};
use crate::schema::{missing_key, Key, SeenKeys, ENTRIES_TOKEN};

/// Extracts `entry_count` entries.
///
/// Token kinds are still checked where reading a value depends on them, so
/// an unchecked token list yields an error rather than garbage. Nothing is
/// returned unless every entry converts.
pub fn extract(
    source: &[u8],
    tokens: &[Token],
    entry_count: usize,
    options: &ParseOptions,
) -> Result<Config, ParseError> {
    // Every entry needs at least its own object token
    let available = tokens.len().saturating_sub(ENTRIES_TOKEN + 1);
    if entry_count > available {
        return Err(SchemaError::UnexpectedEnd {
            index: tokens.len(),
        }
        .into());
    }
    let mut config = Config::with_entries(entry_count);
    let mut cursor = Cursor::new(source, tokens);
    cursor.advance(ENTRIES_TOKEN + 1)?;

    for (index, entry) in config.entries_mut().iter_mut().enumerate() {
        extract_entry(&mut cursor, index, entry, options)?;
    }
    debug!("extracted {} entries", entry_count);
    Ok(config)
}

fn extract_entry(
    cursor: &mut Cursor<'_>,
    entry: usize,
    target: &mut ConfigEntry,
    options: &ParseOptions,
) -> Result<(), ParseError> {
    let pairs = cursor
        .expect(Kind::Object, SchemaError::EntryNotObject { entry })?
        .child_count;

    let mut seen = SeenKeys::default();
    for _ in 0..pairs {
        let key_token = cursor.expect(Kind::String, SchemaError::KeyNotString { entry })?;
        let key = Key::from_text(cursor.text(key_token))
            .ok_or(SchemaError::UnknownKey { entry })?;
        seen[key.index()] = true;
        match key {
            Key::Name => cursor.advance(1)?,
            Key::Location => {
                let value = cursor.expect(Kind::String, SchemaError::WrongValueKind { entry, key })?;
                target.set_payload(decode_location(cursor.text(value), entry)?);
            }
            Key::Offset => {
                let value =
                    cursor.expect(Kind::Primitive, SchemaError::WrongValueKind { entry, key })?;
                let text = cursor.text(value);
                let offset = parse_offset(text).map_err(|reason| {
                    warn!("entry {}: rejected offset {:?}: {}", entry, Utf8Lossy(text), reason);
                    SemanticError::InvalidOffset { entry, reason }
                })?;
                target.set_offset(offset);
            }
            Key::Buttons => {
                let list = cursor.expect(Kind::Array, SchemaError::WrongValueKind { entry, key })?;
                for index in 0..list.child_count {
                    let button = cursor.expect(Kind::String, SchemaError::ButtonNotString { entry })?;
                    let text = cursor.text(button);
                    let flag = decode_button_with(text, options.button_match).ok_or_else(|| {
                        warn!("entry {}: unknown button {:?}", entry, Utf8Lossy(text));
                        SemanticError::UnknownButton { entry, index }
                    })?;
                    target.add_buttons(flag);
                }
            }
        }
    }

    if let Some(key) = missing_key(&seen) {
        return Err(SchemaError::MissingKey { entry, key }.into());
    }
    Ok(())
}

/// Copies the `location` span as-is. Escape sequences are not decoded.
fn decode_location(text: &[u8], entry: usize) -> Result<String, SemanticError> {
    if text.is_empty() {
        return Err(SemanticError::EmptyLocation { entry });
    }
    let text =
        core::str::from_utf8(text).map_err(|error| SemanticError::InvalidUtf8 { entry, error })?;
    Ok(String::from(text))
}

struct Utf8Lossy<'a>(&'a [u8]);

impl core::fmt::Debug for Utf8Lossy<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match core::str::from_utf8(self.0) {
            Ok(s) => write!(f, "{s:?}"),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}
