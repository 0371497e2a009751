// SPDX-License-Identifier: Apache-2.0

use crate::int_parser::OffsetError;
use crate::schema::Key;

/// Errors that can occur while parsing a configuration document.
#[derive(Debug, PartialEq, Clone)]
pub enum ParseError {
    /// The bytes are not well-formed JSON.
    TokenizerError(flattok::Error),
    /// Well-formed JSON that does not have the configuration shape.
    Schema(SchemaError),
    /// The shape is right but a value is unusable.
    Semantic(SemanticError),
}

/// Coarse classification of a [`ParseError`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    Tokenize,
    Schema,
    Semantic,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::TokenizerError(_) => ErrorKind::Tokenize,
            ParseError::Schema(_) => ErrorKind::Schema,
            ParseError::Semantic(_) => ErrorKind::Semantic,
        }
    }
}

/// Structural violations. `entry` is the zero-based index into the
/// `configuration` array.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SchemaError {
    /// The token list ended early. `index` is where a token was expected.
    UnexpectedEnd { index: usize },
    /// The root is not an object with exactly one member.
    InvalidRoot,
    /// The root member is not named `configuration`.
    MissingConfiguration,
    EntriesNotArray,
    EntryNotObject { entry: usize },
    TooFewKeys { entry: usize, found: usize },
    KeyNotString { entry: usize },
    UnknownKey { entry: usize },
    DuplicateKey { entry: usize, key: Key },
    WrongValueKind { entry: usize, key: Key },
    ButtonNotString { entry: usize },
    MissingKey { entry: usize, key: Key },
    /// Tokens remain after the last entry.
    TrailingTokens { index: usize },
}

/// Value-level failures found during extraction.
#[derive(Debug, PartialEq, Clone)]
pub enum SemanticError {
    InvalidOffset { entry: usize, reason: OffsetError },
    /// `index` is the position inside the entry's `buttons` array.
    UnknownButton { entry: usize, index: usize },
    EmptyLocation { entry: usize },
    InvalidUtf8 {
        entry: usize,
        error: core::str::Utf8Error,
    },
}

impl From<flattok::Error> for ParseError {
    fn from(err: flattok::Error) -> Self {
        ParseError::TokenizerError(err)
    }
}

impl From<SchemaError> for ParseError {
    fn from(err: SchemaError) -> Self {
        ParseError::Schema(err)
    }
}

impl From<SemanticError> for ParseError {
    fn from(err: SemanticError) -> Self {
        ParseError::Semantic(err)
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::TokenizerError(e) => write!(f, "malformed JSON: {e}"),
            ParseError::Schema(e) => write!(f, "invalid configuration: {e}"),
            ParseError::Semantic(e) => write!(f, "invalid value: {e}"),
        }
    }
}

impl core::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SchemaError::UnexpectedEnd { index } => {
                write!(f, "token list ended at token {index}")
            }
            SchemaError::InvalidRoot => f.write_str("root must be an object with one member"),
            SchemaError::MissingConfiguration => {
                f.write_str("root member must be named \"configuration\"")
            }
            SchemaError::EntriesNotArray => f.write_str("\"configuration\" must be an array"),
            SchemaError::EntryNotObject { entry } => write!(f, "entry {entry} is not an object"),
            SchemaError::TooFewKeys { entry, found } => {
                write!(f, "entry {entry} has {found} keys, at least 3 required")
            }
            SchemaError::KeyNotString { entry } => write!(f, "entry {entry} has a non-string key"),
            SchemaError::UnknownKey { entry } => write!(f, "entry {entry} has an unknown key"),
            SchemaError::DuplicateKey { entry, key } => {
                write!(f, "entry {entry} repeats \"{key}\"")
            }
            SchemaError::WrongValueKind { entry, key } => {
                write!(f, "entry {entry} has the wrong value type for \"{key}\"")
            }
            SchemaError::ButtonNotString { entry } => {
                write!(f, "entry {entry} has a non-string button")
            }
            SchemaError::MissingKey { entry, key } => write!(f, "entry {entry} lacks \"{key}\""),
            SchemaError::TrailingTokens { index } => {
                write!(f, "unexpected token {index} after the last entry")
            }
        }
    }
}

impl core::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SemanticError::InvalidOffset { entry, reason } => {
                write!(f, "entry {entry} offset: {reason}")
            }
            SemanticError::UnknownButton { entry, index } => {
                write!(f, "entry {entry} button {index} is not a known button")
            }
            SemanticError::EmptyLocation { entry } => write!(f, "entry {entry} location is empty"),
            SemanticError::InvalidUtf8 { entry, error } => {
                write!(f, "entry {entry} location: {error}")
            }
        }
    }
}
