// SPDX-License-Identifier: Apache-2.0

//! Flat token list built from tokenizer events.
//!
//! Each token records its kind, a byte span into the source and, for
//! containers, the number of direct children. Tokens are stored in document
//! order so the tree can be walked with a plain index.

use alloc::vec::Vec;
use core::ops::Range;

use log::debug;

use crate::bitstack::BitStack;
use crate::tokenizer::{Error, Event, EventToken, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Object,
    Array,
    String,
    Primitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: Kind,
    /// First byte of the span. For strings this is just past the opening quote.
    pub start: usize,
    /// One past the last byte of the span. For strings this is the closing quote.
    pub end: usize,
    /// Key/value pairs for objects, elements for arrays, zero otherwise.
    pub child_count: usize,
}

impl Token {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Bytes covered by this token, or an empty slice if the span does not
    /// fit `source`.
    pub fn text<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        source.get(self.span()).unwrap_or(&[])
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, Kind::Object | Kind::Array)
    }
}

/// Turns the event stream into tokens, tracking open containers so child
/// counts can be bumped as their members appear.
#[derive(Default)]
struct Collector {
    tokens: Vec<Token>,
    open: Vec<usize>,
    scalar: Option<usize>,
}

impl Collector {
    fn push(&mut self, kind: Kind, start: usize) -> usize {
        self.tokens.push(Token {
            kind,
            start,
            end: start,
            child_count: 0,
        });
        self.tokens.len() - 1
    }

    /// Object members are counted on their key, array members on their value.
    fn count_member(&mut self, key: bool) {
        if let Some(&parent) = self.open.last() {
            let parent = &mut self.tokens[parent];
            if key == (parent.kind == Kind::Object) {
                parent.child_count += 1;
            }
        }
    }

    fn on_event(&mut self, event: Event, pos: usize) {
        match event {
            Event::ObjectStart | Event::ArrayStart => {
                self.count_member(false);
                let kind = if event == Event::ObjectStart {
                    Kind::Object
                } else {
                    Kind::Array
                };
                let index = self.push(kind, pos);
                self.open.push(index);
            }
            Event::ObjectEnd | Event::ArrayEnd => {
                if let Some(index) = self.open.pop() {
                    self.tokens[index].end = pos + 1;
                }
            }
            Event::Begin(EventToken::Key) => {
                self.count_member(true);
                self.scalar = Some(self.push(Kind::String, pos + 1));
            }
            Event::Begin(EventToken::String) => {
                self.count_member(false);
                self.scalar = Some(self.push(Kind::String, pos + 1));
            }
            Event::Begin(EventToken::Primitive) => {
                self.count_member(false);
                self.scalar = Some(self.push(Kind::Primitive, pos));
            }
            Event::End(_) => {
                if let Some(index) = self.scalar.take() {
                    self.tokens[index].end = pos;
                }
            }
        }
    }
}

/// Tokenizes a complete document with the default nesting capacity.
pub fn tokenize(data: &[u8]) -> Result<Vec<Token>, Error> {
    tokenize_with::<u32>(data)
}

/// Tokenizes a complete document, nesting capacity given by the bit-stack type.
pub fn tokenize_with<T: BitStack>(data: &[u8]) -> Result<Vec<Token>, Error> {
    let mut collector = Collector::default();
    Tokenizer::<T>::new().parse_full(data, &mut |event, pos| collector.on_event(event, pos))?;
    debug!(
        "tokenized {} bytes into {} tokens",
        data.len(),
        collector.tokens.len()
    );
    Ok(collector.tokens)
}
