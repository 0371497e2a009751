// SPDX-License-Identifier: Apache-2.0

use crate::bitstack::BitStack;

use log::{debug, trace};

#[derive(Debug, Clone)]
struct ParseContext<T: BitStack> {
    /// Number of containers currently open
    depth: u8,
    /// One bit per open container, `true` for objects
    stack: T,
}

impl<T: BitStack> ParseContext<T> {
    fn new() -> Self {
        ParseContext {
            depth: 0,
            stack: T::default(),
        }
    }
    fn enter(&mut self, object: bool, data: u8, pos: usize) -> Result<(), Error> {
        if self.depth == T::CAPACITY {
            return Error::new(ErrKind::MaxDepthReached, data, pos);
        }
        self.stack.push(object);
        self.depth += 1;
        Ok(())
    }
    fn exit_object(&mut self, pos: usize) -> Result<(), Error> {
        if !self.is_object() {
            return Error::new(ErrKind::UnopenedObject, b'}', pos);
        }
        self.stack.pop();
        self.depth -= 1;
        Ok(())
    }
    fn exit_array(&mut self, pos: usize) -> Result<(), Error> {
        if !self.is_array() {
            return Error::new(ErrKind::UnopenedArray, b']', pos);
        }
        self.stack.pop();
        self.depth -= 1;
        Ok(())
    }
    fn is_object(&self) -> bool {
        self.depth != 0 && self.stack.top()
    }
    fn is_array(&self) -> bool {
        self.depth != 0 && !self.stack.top()
    }
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    String { state: Str, key: bool },
    Primitive,
    Object { expect: Object },
    Array { expect: Array },
    Finished,
}

#[derive(Debug, Clone)]
enum Str {
    Normal,
    Escaping,
    /// Number of hex digits of a `\u` escape seen so far
    Unicode(u8),
}

#[derive(Debug, Clone, PartialEq)]
enum Object {
    /// Right after `{`: a key or an immediate close
    KeyOrEnd,
    /// Right after `,`: a key is mandatory
    Key,
    Colon,
    Value,
    CommaOrEnd,
}

#[derive(Debug, Clone, PartialEq)]
enum Array {
    ItemOrEnd,
    Item,
    CommaOrEnd,
}

/// The scalar a `Begin`/`End` event pair brackets.
#[derive(Debug, Clone, PartialEq)]
pub enum EventToken {
    Key,
    String,
    /// Any unquoted value: numbers, `true`, `false`, `null`, and the
    /// loosely formed literals (`0x1A`) that embedded configs like to use.
    Primitive,
}

/// Positional events emitted while tokenizing.
///
/// Positions are absolute byte offsets. `Begin`/`End` of strings and keys
/// point at the quote characters, `End(Primitive)` points at the first byte
/// after the primitive, container events point at their bracket.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Begin(EventToken),
    End(EventToken),
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
}

pub struct Tokenizer<T: BitStack = u32> {
    state: State,
    total_consumed: usize,
    context: ParseContext<T>,
}

#[derive(PartialEq, Clone)]
pub struct Error {
    kind: ErrKind,
    character: u8,
    position: usize,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ErrKind {
    EmptyStream,
    UnfinishedStream,
    InvalidRoot,
    InvalidToken,
    UnescapedControlCharacter,
    TrailingComma,
    ContentEnded,
    UnopenedArray,
    UnopenedObject,
    MaxDepthReached,
    InvalidUnicodeEscape,
    InvalidStringEscape,
    ExpectedObjectKey,
    ExpectedObjectValue,
    ExpectedColon,
    ExpectedArrayItem,
    ExpectedCommaOrEnd,
}

impl Error {
    pub fn new<T>(kind: ErrKind, character: u8, position: usize) -> Result<T, Self> {
        Err(Self {
            kind,
            character,
            position,
        })
    }
    pub fn kind(&self) -> ErrKind {
        self.kind
    }
    /// The offending byte, or a space when the input simply ran out.
    pub fn character(&self) -> u8 {
        self.character
    }
    pub fn position(&self) -> usize {
        self.position
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:?}({}) at {}",
            self.kind, self.character as char, self.position
        )
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:?} at byte {} ({:?})",
            self.kind, self.position, self.character as char
        )
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_whitespace(data: u8) -> bool {
    matches!(data, b' ' | b'\t' | b'\n' | b'\r')
}

/// Bytes that end a primitive without being part of it.
fn ends_primitive(data: u8) -> bool {
    is_whitespace(data) || matches!(data, b',' | b']' | b'}')
}

impl<T: BitStack> Tokenizer<T> {
    pub fn new() -> Self {
        Tokenizer {
            state: State::Idle,
            total_consumed: 0,
            context: ParseContext::new(),
        }
    }

    /// Tokenizes a complete document in one go.
    pub fn parse_full(
        &mut self,
        data: &[u8],
        callback: &mut dyn FnMut(Event, usize),
    ) -> Result<usize, Error> {
        self.parse_chunk(data, callback)?;
        self.finish(callback)
    }

    /// Signals end of input. Fails unless exactly one complete root value
    /// was seen.
    pub fn finish<F>(&mut self, callback: &mut F) -> Result<usize, Error>
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        debug!("--finished-- {}", self.total_consumed);
        match &self.state {
            State::Finished => Ok(self.total_consumed),
            State::Primitive if self.context.depth == 0 => {
                callback(Event::End(EventToken::Primitive), self.total_consumed);
                Ok(self.total_consumed)
            }
            State::Idle => Error::new(ErrKind::EmptyStream, b' ', self.total_consumed),
            _ => Error::new(ErrKind::UnfinishedStream, b' ', self.total_consumed),
        }
    }

    /// Feeds the next chunk of input. Positions reported to `callback` are
    /// relative to the start of the whole stream.
    pub fn parse_chunk<F>(&mut self, data: &[u8], callback: &mut F) -> Result<usize, Error>
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        let consumed = self.parse_chunk_inner(data, callback)?;
        self.total_consumed += consumed;
        Ok(self.total_consumed)
    }

    fn maybe_exit_level(&self) -> State {
        if self.context.is_object() {
            State::Object {
                expect: Object::CommaOrEnd,
            }
        } else if self.context.is_array() {
            State::Array {
                expect: Array::CommaOrEnd,
            }
        } else {
            State::Finished
        }
    }

    fn begin_value<F>(
        &mut self,
        data: u8,
        pos: usize,
        otherwise: ErrKind,
        callback: &mut F,
    ) -> Result<State, Error>
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        match data {
            b'{' => {
                self.context.enter(true, data, pos)?;
                callback(Event::ObjectStart, pos);
                Ok(State::Object {
                    expect: Object::KeyOrEnd,
                })
            }
            b'[' => {
                self.context.enter(false, data, pos)?;
                callback(Event::ArrayStart, pos);
                Ok(State::Array {
                    expect: Array::ItemOrEnd,
                })
            }
            b'"' => {
                callback(Event::Begin(EventToken::String), pos);
                Ok(State::String {
                    state: Str::Normal,
                    key: false,
                })
            }
            b'-' | b'0'..=b'9' | b't' | b'f' | b'n' => {
                callback(Event::Begin(EventToken::Primitive), pos);
                Ok(State::Primitive)
            }
            _ => Error::new(otherwise, data, pos),
        }
    }

    fn close_object<F>(&mut self, pos: usize, callback: &mut F) -> Result<State, Error>
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        self.context.exit_object(pos)?;
        callback(Event::ObjectEnd, pos);
        Ok(self.maybe_exit_level())
    }

    fn close_array<F>(&mut self, pos: usize, callback: &mut F) -> Result<State, Error>
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        self.context.exit_array(pos)?;
        callback(Event::ArrayEnd, pos);
        Ok(self.maybe_exit_level())
    }

    fn parse_chunk_inner<F>(&mut self, data: &[u8], callback: &mut F) -> Result<usize, Error>
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        for (offset, &byte) in data.iter().enumerate() {
            let pos = self.total_consumed + offset;
            trace!(
                "Pos: {}, Byte: {:?}, State: {:?}, Depth: {}",
                pos,
                byte as char,
                self.state,
                self.context.depth
            );

            // A primitive has no closing character of its own, the delimiter
            // that ends it still has to be handled by the enclosing container.
            if let State::Primitive = self.state {
                if ends_primitive(byte) {
                    callback(Event::End(EventToken::Primitive), pos);
                    self.state = self.maybe_exit_level();
                }
            }

            self.state = match (&self.state, byte) {
                (State::Primitive, b'"' | b'{' | b'[' | b':') => {
                    return Error::new(ErrKind::InvalidToken, byte, pos);
                }
                (State::Primitive, 0x21..=0x7e) => State::Primitive,
                (State::Primitive, _) => return Error::new(ErrKind::InvalidToken, byte, pos),

                (
                    State::String {
                        state: Str::Normal,
                        key,
                    },
                    b'"',
                ) => {
                    if *key {
                        callback(Event::End(EventToken::Key), pos);
                        State::Object {
                            expect: Object::Colon,
                        }
                    } else {
                        callback(Event::End(EventToken::String), pos);
                        self.maybe_exit_level()
                    }
                }
                (
                    State::String {
                        state: Str::Normal,
                        key,
                    },
                    b'\\',
                ) => State::String {
                    state: Str::Escaping,
                    key: *key,
                },
                (
                    State::String {
                        state: Str::Normal,
                        ..
                    },
                    b'\x00'..=b'\x1F',
                ) => return Error::new(ErrKind::UnescapedControlCharacter, byte, pos),
                (
                    State::String {
                        state: Str::Normal,
                        ..
                    },
                    _,
                ) => continue,
                (
                    State::String {
                        state: Str::Escaping,
                        key,
                    },
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't',
                ) => State::String {
                    state: Str::Normal,
                    key: *key,
                },
                (
                    State::String {
                        state: Str::Escaping,
                        key,
                    },
                    b'u',
                ) => State::String {
                    state: Str::Unicode(0),
                    key: *key,
                },
                (
                    State::String {
                        state: Str::Escaping,
                        ..
                    },
                    _,
                ) => return Error::new(ErrKind::InvalidStringEscape, byte, pos),
                (
                    State::String {
                        state: Str::Unicode(seen),
                        key,
                    },
                    b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F',
                ) => State::String {
                    state: if *seen == 3 {
                        Str::Normal
                    } else {
                        Str::Unicode(*seen + 1)
                    },
                    key: *key,
                },
                (
                    State::String {
                        state: Str::Unicode(_),
                        ..
                    },
                    _,
                ) => return Error::new(ErrKind::InvalidUnicodeEscape, byte, pos),

                (
                    State::Idle | State::Object { .. } | State::Array { .. } | State::Finished,
                    b' ' | b'\t' | b'\n' | b'\r',
                ) => continue,

                (State::Idle, _) => self.begin_value(byte, pos, ErrKind::InvalidRoot, callback)?,
                (State::Finished, _) => return Error::new(ErrKind::ContentEnded, byte, pos),

                (
                    State::Object {
                        expect: Object::KeyOrEnd,
                    },
                    b'}',
                ) => self.close_object(pos, callback)?,
                (
                    State::Object {
                        expect: Object::Key,
                    },
                    b'}',
                ) => return Error::new(ErrKind::TrailingComma, byte, pos),
                (
                    State::Object {
                        expect: Object::KeyOrEnd | Object::Key,
                    },
                    b'"',
                ) => {
                    callback(Event::Begin(EventToken::Key), pos);
                    State::String {
                        state: Str::Normal,
                        key: true,
                    }
                }
                (
                    State::Object {
                        expect: Object::KeyOrEnd | Object::Key,
                    },
                    _,
                ) => return Error::new(ErrKind::ExpectedObjectKey, byte, pos),
                (
                    State::Object {
                        expect: Object::Colon,
                    },
                    b':',
                ) => State::Object {
                    expect: Object::Value,
                },
                (
                    State::Object {
                        expect: Object::Colon,
                    },
                    _,
                ) => return Error::new(ErrKind::ExpectedColon, byte, pos),
                (
                    State::Object {
                        expect: Object::Value,
                    },
                    _,
                ) => self.begin_value(byte, pos, ErrKind::ExpectedObjectValue, callback)?,
                (
                    State::Object {
                        expect: Object::CommaOrEnd,
                    },
                    b',',
                ) => State::Object {
                    expect: Object::Key,
                },
                (
                    State::Object {
                        expect: Object::CommaOrEnd,
                    },
                    b'}',
                ) => self.close_object(pos, callback)?,
                (
                    State::Object {
                        expect: Object::CommaOrEnd,
                    },
                    _,
                ) => return Error::new(ErrKind::ExpectedCommaOrEnd, byte, pos),

                (
                    State::Array {
                        expect: Array::ItemOrEnd,
                    },
                    b']',
                ) => self.close_array(pos, callback)?,
                (
                    State::Array {
                        expect: Array::Item,
                    },
                    b']',
                ) => return Error::new(ErrKind::TrailingComma, byte, pos),
                (
                    State::Array {
                        expect: Array::ItemOrEnd | Array::Item,
                    },
                    _,
                ) => self.begin_value(byte, pos, ErrKind::ExpectedArrayItem, callback)?,
                (
                    State::Array {
                        expect: Array::CommaOrEnd,
                    },
                    b',',
                ) => State::Array {
                    expect: Array::Item,
                },
                (
                    State::Array {
                        expect: Array::CommaOrEnd,
                    },
                    b']',
                ) => self.close_array(pos, callback)?,
                (
                    State::Array {
                        expect: Array::CommaOrEnd,
                    },
                    _,
                ) => return Error::new(ErrKind::ExpectedCommaOrEnd, byte, pos),
            };
        }
        debug!("Consumed: {}", data.len());
        Ok(data.len())
    }
}
