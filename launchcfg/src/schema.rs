// SPDX-License-Identifier: Apache-2.0

//! Structural validation of a tokenized configuration document.
//!
//! The accepted shape is fixed:
//!
//! ```text
//! { "configuration": [
//!     { "name": <string>, "location": <string>, "offset": <primitive>?, "buttons": [<string>, ...] },
//!     ...
//! ] }
//! ```
//!
//! Keys may appear in any order, must not repeat, and all but `offset` are
//! mandatory. Only token kinds are checked here; what the values mean is
//! left to [`crate::extract`].

use flattok::{Kind, Token};
use log::{debug, warn};

use crate::cursor::Cursor;
use crate::parse_error::SchemaError;

/// The only key of the root object.
pub const ROOT_KEY: &str = "configuration";

/// Index of the entries array in a valid document.
pub(crate) const ENTRIES_TOKEN: usize = 2;

/// A key of an entry object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Name,
    Location,
    Offset,
    Buttons,
}

#[derive(Clone, Copy)]
struct KeySpec {
    key: Key,
    name: &'static str,
    mandatory: bool,
    value: Kind,
}

const KEYS: [KeySpec; 4] = [
    KeySpec {
        key: Key::Name,
        name: "name",
        mandatory: true,
        value: Kind::String,
    },
    KeySpec {
        key: Key::Location,
        name: "location",
        mandatory: true,
        value: Kind::String,
    },
    KeySpec {
        key: Key::Offset,
        name: "offset",
        mandatory: false,
        value: Kind::Primitive,
    },
    KeySpec {
        key: Key::Buttons,
        name: "buttons",
        mandatory: true,
        value: Kind::Array,
    },
];

const fn mandatory_keys() -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < KEYS.len() {
        if KEYS[i].mandatory {
            count += 1;
        }
        i += 1;
    }
    count
}

/// Fewest key/value pairs an entry object can have.
pub const MANDATORY_KEYS: usize = mandatory_keys();

/// Per-entry record of which keys have been read, indexed by key.
pub(crate) type SeenKeys = [bool; KEYS.len()];

/// First mandatory key not marked in `seen`.
pub(crate) fn missing_key(seen: &SeenKeys) -> Option<Key> {
    KEYS.iter()
        .find(|spec| spec.mandatory && !seen[spec.key.index()])
        .map(|spec| spec.key)
}

impl Key {
    /// Looks up a key by its exact spelling.
    pub fn from_text(text: &[u8]) -> Option<Key> {
        KEYS.iter()
            .find(|spec| spec.name.as_bytes() == text)
            .map(|spec| spec.key)
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn is_mandatory(self) -> bool {
        self.spec().mandatory
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    fn spec(self) -> KeySpec {
        KEYS[self.index()]
    }
}

impl core::fmt::Display for Key {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns true if the tokens form a valid configuration document.
pub fn validate(source: &[u8], tokens: &[Token]) -> bool {
    check(source, tokens).is_ok()
}

/// Validates the document shape, returning the number of entries.
pub fn check(source: &[u8], tokens: &[Token]) -> Result<usize, SchemaError> {
    let mut cursor = Cursor::new(source, tokens);

    let root = cursor.expect(Kind::Object, SchemaError::InvalidRoot)?;
    if root.child_count != 1 {
        return Err(SchemaError::InvalidRoot);
    }
    let root_key = cursor.expect(Kind::String, SchemaError::MissingConfiguration)?;
    if cursor.text(root_key) != ROOT_KEY.as_bytes() {
        return Err(SchemaError::MissingConfiguration);
    }
    let entries = cursor
        .expect(Kind::Array, SchemaError::EntriesNotArray)?
        .child_count;

    for entry in 0..entries {
        check_entry(&mut cursor, entry)?;
    }

    if !cursor.is_at_end() {
        return Err(SchemaError::TrailingTokens {
            index: cursor.position(),
        });
    }
    debug!("schema accepted {} entries in {} tokens", entries, tokens.len());
    Ok(entries)
}

fn check_entry(cursor: &mut Cursor<'_>, entry: usize) -> Result<(), SchemaError> {
    let object = cursor.expect(Kind::Object, SchemaError::EntryNotObject { entry })?;
    if object.child_count < MANDATORY_KEYS {
        return Err(SchemaError::TooFewKeys {
            entry,
            found: object.child_count,
        });
    }

    let mut seen: SeenKeys = [false; KEYS.len()];
    for _ in 0..object.child_count {
        let key_token = cursor.expect(Kind::String, SchemaError::KeyNotString { entry })?;
        let text = cursor.text(key_token);
        let Some(key) = Key::from_text(text) else {
            warn!(
                "entry {}: unknown key {:?}",
                entry,
                core::str::from_utf8(text).unwrap_or("<non-utf8>")
            );
            return Err(SchemaError::UnknownKey { entry });
        };
        if core::mem::replace(&mut seen[key.index()], true) {
            return Err(SchemaError::DuplicateKey { entry, key });
        }

        let value = cursor.expect(key.spec().value, SchemaError::WrongValueKind { entry, key })?;
        if key == Key::Buttons {
            for _ in 0..value.child_count {
                cursor.expect(Kind::String, SchemaError::ButtonNotString { entry })?;
            }
        }
    }

    if let Some(key) = missing_key(&seen) {
        return Err(SchemaError::MissingKey { entry, key });
    }
    Ok(())
}
