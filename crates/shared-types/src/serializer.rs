//! # Deterministic Value Serializer
//!
//! Encodes a [`Value`] as a flat, pre-order token stream and hands the stream
//! to `bincode` with fixed-width integers and little-endian byte order.
//!
//! ## Format
//!
//! ```text
//! Map[("UserID", 10)]  ->  MapStart(1) Key("UserID") Int(10)
//! Seq[Null, "a"]       ->  SeqStart(2) Null Str("a")
//! ```
//!
//! ## Properties
//!
//! - **Deterministic**: one logical value, one byte string. Mappings are
//!   encoded in their stored order, never re-sorted or hashed.
//! - **Bounded**: nesting depth and encoded size are capped. Decoding rebuilds
//!   the tree with an explicit stack, so hostile input cannot exhaust the
//!   call stack.

use bincode::Options;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::errors::SerializationError;
use crate::value::Value;

/// Default maximum container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum encoded size (1 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;

/// Serializer boundary used by the envelope codec.
pub trait ValueSerializer: Send + Sync {
    /// Encode a value. Identical values must produce identical bytes.
    fn serialize(&self, value: &Value) -> Result<Vec<u8>, SerializationError>;

    /// Decode bytes produced by [`ValueSerializer::serialize`].
    fn deserialize(&self, bytes: &[u8]) -> Result<Value, SerializationError>;
}

#[derive(Debug, Serialize, Deserialize)]
enum Token<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Cow<'a, str>),
    SeqStart(u32),
    MapStart(u32),
    Key(Cow<'a, str>),
}

/// Token-stream serializer backed by `bincode`.
#[derive(Debug, Clone, Copy)]
pub struct TokenSerializer {
    max_depth: usize,
    max_bytes: u64,
}

impl Default for TokenSerializer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl TokenSerializer {
    /// Create a serializer with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a serializer with custom limits.
    pub fn with_limits(max_depth: usize, max_bytes: u64) -> Self {
        Self {
            max_depth,
            max_bytes,
        }
    }

    /// Maximum container nesting accepted in either direction.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Maximum encoded size in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    fn options(&self) -> impl Options {
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .with_little_endian()
            .reject_trailing_bytes()
            .with_limit(self.max_bytes)
    }

    fn flatten<'a>(
        &self,
        value: &'a Value,
        depth: usize,
        out: &mut Vec<Token<'a>>,
    ) -> Result<(), SerializationError> {
        match value {
            Value::Null => out.push(Token::Null),
            Value::Bool(b) => out.push(Token::Bool(*b)),
            Value::Int(i) => out.push(Token::Int(*i)),
            Value::Float(x) => {
                if !x.is_finite() {
                    return Err(SerializationError::NonFiniteFloat);
                }
                out.push(Token::Float(*x));
            }
            Value::Str(s) => out.push(Token::Str(Cow::Borrowed(s))),
            Value::Seq(items) => {
                self.enter(depth)?;
                out.push(Token::SeqStart(container_len(items.len())?));
                for item in items {
                    self.flatten(item, depth + 1, out)?;
                }
            }
            Value::Map(entries) => {
                self.enter(depth)?;
                out.push(Token::MapStart(container_len(entries.len())?));
                for (key, item) in entries {
                    out.push(Token::Key(Cow::Borrowed(key)));
                    self.flatten(item, depth + 1, out)?;
                }
            }
        }
        Ok(())
    }

    fn enter(&self, depth: usize) -> Result<(), SerializationError> {
        if depth + 1 > self.max_depth {
            return Err(SerializationError::DepthExceeded {
                max: self.max_depth,
            });
        }
        Ok(())
    }

    fn rebuild(&self, tokens: Vec<Token<'static>>) -> Result<Value, SerializationError> {
        let total = tokens.len();
        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Option<Value> = None;

        for (position, token) in tokens.into_iter().enumerate() {
            if root.is_some() {
                return Err(SerializationError::UnexpectedToken { position });
            }

            // Inside a mapping every value is preceded by exactly one key.
            if let Some(Frame::Map { key, .. }) = stack.last_mut() {
                match (key.is_none(), token) {
                    (true, Token::Key(k)) => {
                        *key = Some(k.into_owned());
                        continue;
                    }
                    (true, _) => return Err(SerializationError::UnexpectedToken { position }),
                    (false, Token::Key(_)) => {
                        return Err(SerializationError::UnexpectedToken { position })
                    }
                    (false, token) => {
                        self.accept(token, position, total, &mut stack, &mut root)?;
                        continue;
                    }
                }
            }

            if matches!(token, Token::Key(_)) {
                return Err(SerializationError::UnexpectedToken { position });
            }
            self.accept(token, position, total, &mut stack, &mut root)?;
        }

        match root {
            Some(value) if stack.is_empty() => Ok(value),
            _ => Err(SerializationError::Truncated),
        }
    }

    fn accept(
        &self,
        token: Token<'static>,
        position: usize,
        total: usize,
        stack: &mut Vec<Frame>,
        root: &mut Option<Value>,
    ) -> Result<(), SerializationError> {
        // Never trust a declared length for preallocation beyond what the
        // remaining tokens could possibly fill.
        let room = total - position - 1;
        let value = match token {
            Token::Null => Value::Null,
            Token::Bool(b) => Value::Bool(b),
            Token::Int(i) => Value::Int(i),
            Token::Float(x) if x.is_finite() => Value::Float(x),
            Token::Float(_) => return Err(SerializationError::NonFiniteFloat),
            Token::Str(s) => Value::Str(s.into_owned()),
            Token::SeqStart(n) => {
                self.enter(stack.len())?;
                if n == 0 {
                    Value::Seq(Vec::new())
                } else {
                    stack.push(Frame::Seq {
                        remaining: n as usize,
                        items: Vec::with_capacity((n as usize).min(room)),
                    });
                    return Ok(());
                }
            }
            Token::MapStart(n) => {
                self.enter(stack.len())?;
                if n == 0 {
                    Value::Map(Vec::new())
                } else {
                    stack.push(Frame::Map {
                        remaining: n as usize,
                        entries: Vec::with_capacity((n as usize).min(room / 2)),
                        key: None,
                    });
                    return Ok(());
                }
            }
            Token::Key(_) => return Err(SerializationError::UnexpectedToken { position }),
        };
        complete(value, stack, root);
        Ok(())
    }
}

impl ValueSerializer for TokenSerializer {
    fn serialize(&self, value: &Value) -> Result<Vec<u8>, SerializationError> {
        let mut tokens = Vec::new();
        self.flatten(value, 0, &mut tokens)?;

        self.options().serialize(&tokens).map_err(|e| match *e {
            bincode::ErrorKind::SizeLimit => SerializationError::SizeLimitExceeded {
                limit: self.max_bytes,
            },
            other => SerializationError::Encoding(other.to_string()),
        })
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value, SerializationError> {
        let tokens: Vec<Token<'static>> = self.options().deserialize(bytes).map_err(|e| match *e {
            bincode::ErrorKind::SizeLimit => SerializationError::SizeLimitExceeded {
                limit: self.max_bytes,
            },
            other => SerializationError::Decoding(other.to_string()),
        })?;

        self.rebuild(tokens)
    }
}

enum Frame {
    Seq {
        remaining: usize,
        items: Vec<Value>,
    },
    Map {
        remaining: usize,
        entries: Vec<(String, Value)>,
        key: Option<String>,
    },
}

/// Attach a finished value to its parent, closing every container it fills.
fn complete(mut value: Value, stack: &mut Vec<Frame>, root: &mut Option<Value>) {
    loop {
        let done = match stack.last_mut() {
            None => {
                *root = Some(value);
                return;
            }
            Some(Frame::Seq { remaining, items }) => {
                items.push(value);
                *remaining -= 1;
                *remaining == 0
            }
            Some(Frame::Map {
                remaining,
                entries,
                key,
            }) => {
                entries.push((key.take().unwrap_or_default(), value));
                *remaining -= 1;
                *remaining == 0
            }
        };
        if !done {
            return;
        }
        value = match stack.pop() {
            Some(Frame::Seq { items, .. }) => Value::Seq(items),
            Some(Frame::Map { entries, .. }) => Value::Map(entries),
            None => return,
        };
    }
}

fn container_len(len: usize) -> Result<u32, SerializationError> {
    u32::try_from(len)
        .map_err(|_| SerializationError::Encoding(format!("container of {len} items is too large")))
}
