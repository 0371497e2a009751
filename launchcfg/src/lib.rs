// SPDX-License-Identifier: Apache-2.0

//! Boot payload selection from a small JSON configuration file.
//!
//! A chain loader reads a document like
//!
//! ```json
//! { "configuration": [
//!     { "name": "default", "location": "sd:/boot.bin", "buttons": [] },
//!     { "name": "recovery", "location": "sd:/recovery.bin", "offset": 0x1A, "buttons": ["R", "Start"] }
//! ] }
//! ```
//!
//! and boots the first entry whose button set equals the buttons held at
//! power-on. Parsing is strict and all-or-nothing: any malformed, unknown,
//! repeated or missing key rejects the whole file.
//!
//! ```
//! use launchcfg::{parse_config, Buttons, LaunchArgs};
//!
//! let config = parse_config(r#"{"configuration": [
//!     {"name": "recovery", "location": "sd:/recovery.bin", "offset": 0x1A, "buttons": ["R", "Start"]}
//! ]}"#).unwrap();
//!
//! let entry = config.select(Buttons::R | Buttons::START).unwrap();
//! let args = LaunchArgs::new(entry).unwrap();
//! assert_eq!(args.payload(), "sd:/recovery.bin");
//! assert_eq!(args.offset(), "26");
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod buttons;
pub use buttons::{decode_button, decode_button_with, ButtonMatch, Buttons, BUTTON_NAMES};

mod config;
pub use config::{Config, ConfigEntry};

mod cursor;

pub mod extract;

mod int_parser;
pub use int_parser::{parse_offset, OffsetError};

mod launch_args;
pub use launch_args::{LaunchArgs, LaunchError, ARG_CAPACITY};

mod options;
pub use options::ParseOptions;

mod parse_error;
pub use parse_error::{ErrorKind, ParseError, SchemaError, SemanticError};

pub mod schema;
pub use schema::Key;

use log::debug;

/// Parses a configuration document with default options.
pub fn parse_config(raw_text: &str) -> Result<Config, ParseError> {
    parse_config_from_slice_with(raw_text.as_bytes(), ParseOptions::default())
}

/// Parses a configuration document given as raw bytes, with default options.
pub fn parse_config_from_slice(input: &[u8]) -> Result<Config, ParseError> {
    parse_config_from_slice_with(input, ParseOptions::default())
}

/// Parses a configuration document with the given options.
pub fn parse_config_with(raw_text: &str, options: ParseOptions) -> Result<Config, ParseError> {
    parse_config_from_slice_with(raw_text.as_bytes(), options)
}

/// Tokenizes, validates and extracts `input`.
///
/// The input is only borrowed for the duration of the call; the returned
/// [`Config`] owns all of its strings.
pub fn parse_config_from_slice_with(
    input: &[u8],
    options: ParseOptions,
) -> Result<Config, ParseError> {
    let tokens = flattok::tokenize(input)?;
    debug!("{} bytes produced {} tokens", input.len(), tokens.len());
    let entries = schema::check(input, &tokens)?;
    extract::extract(input, &tokens, entries, &options)
}
