// SPDX-License-Identifier: Apache-2.0

//! A small JSON tokenizer producing a flat, span-based token list.
//!
//! Tokens do not own any text, they point back into the input. Containers
//! carry the number of their direct children, which is enough to walk the
//! document with a single index and no recursion.
//!
//! ```
//! use flattok::{tokenize, Kind};
//!
//! let src = br#"{"buttons": ["A", "B"]}"#;
//! let tokens = tokenize(src).unwrap();
//! assert_eq!(tokens[0].kind, Kind::Object);
//! assert_eq!(tokens[2].child_count, 2);
//! assert_eq!(tokens[3].text(src), b"A");
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod bitstack;
pub use bitstack::BitStack;

mod token;
mod tokenizer;

pub use token::{tokenize, tokenize_with, Kind, Token};
pub use tokenizer::{ErrKind, Error, Event, EventToken, Tokenizer};
