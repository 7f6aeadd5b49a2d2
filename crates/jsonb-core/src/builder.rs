//! Stack-based document builder.
//!
//! The builder is the write side of the token protocol: callers push the same
//! events that [`TokenIter`] produces and get back a finished [`Jsonb`] when the
//! root container closes. Object frames are canonicalized on close, so callers
//! may push keys in any order (and may push a key twice; the last value wins).
//!
//! Every mutation in this crate is expressed as "walk the input, push a slightly
//! different stream into a fresh builder". The builder lives for one call.

use crate::error::{JsonbError, Result};
use crate::iter::{Token, TokenIter};
use crate::value::{canonicalize_pairs, Jsonb};

#[derive(Debug)]
enum OpenFrame {
    Array {
        elems: Vec<Jsonb>,
        raw_scalar: bool,
    },
    Object {
        pairs: Vec<(String, Jsonb)>,
        pending_key: Option<String>,
    },
}

/// Decision returned by a [`Builder::fold`] substitution closure.
#[derive(Debug, Clone, PartialEq)]
pub enum Substitution {
    /// Push the token unchanged.
    Keep,
    /// Skip this key, value, or element.
    Drop,
    /// Skip an object key together with the value that follows it.
    DropPair,
    /// Push this value in place of the current value or element. On a key
    /// token the replacement must be a string and renames the key.
    Replace(Jsonb),
}

/// Incremental document builder (the "parse state" of a rewrite).
#[derive(Debug, Default)]
pub struct Builder {
    stack: Vec<OpenFrame>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open containers.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Open an array. A `raw_scalar` frame must receive exactly one scalar and
    /// closes back into that bare scalar.
    pub fn begin_array(&mut self, raw_scalar: bool) {
        self.stack.push(OpenFrame::Array {
            elems: Vec::new(),
            raw_scalar,
        });
    }

    pub fn begin_object(&mut self) {
        self.stack.push(OpenFrame::Object {
            pairs: Vec::new(),
            pending_key: None,
        });
    }

    /// Push an object key. The next [`Builder::value`] (or nested container)
    /// becomes its value.
    pub fn key(&mut self, key: impl Into<String>) -> Result<()> {
        match self.stack.last_mut() {
            Some(OpenFrame::Object { pending_key, .. }) if pending_key.is_none() => {
                *pending_key = Some(key.into());
                Ok(())
            }
            _ => Err(JsonbError::UnexpectedToken(
                "key outside an object or after another key".to_string(),
            )),
        }
    }

    /// Push the value for the pending object key.
    pub fn value(&mut self, value: Jsonb) -> Result<()> {
        match self.stack.last_mut() {
            Some(OpenFrame::Object { pairs, pending_key }) => match pending_key.take() {
                Some(key) => {
                    pairs.push((key, value));
                    Ok(())
                }
                None => Err(JsonbError::UnexpectedToken(
                    "object value without a key".to_string(),
                )),
            },
            _ => Err(JsonbError::UnexpectedToken(
                "object value outside an object".to_string(),
            )),
        }
    }

    /// Push an array element.
    pub fn elem(&mut self, value: Jsonb) -> Result<()> {
        match self.stack.last_mut() {
            Some(OpenFrame::Array { elems, .. }) => {
                elems.push(value);
                Ok(())
            }
            _ => Err(JsonbError::UnexpectedToken(
                "array element outside an array".to_string(),
            )),
        }
    }

    /// Close the innermost array. Returns the finished document if this closed
    /// the root.
    pub fn end_array(&mut self) -> Result<Option<Jsonb>> {
        match self.stack.pop() {
            Some(OpenFrame::Array { elems, raw_scalar }) => {
                let finished = if raw_scalar {
                    let mut elems = elems.into_iter();
                    match (elems.next(), elems.next()) {
                        (Some(scalar), None) if scalar.is_scalar() => scalar,
                        _ => {
                            return Err(JsonbError::UnexpectedToken(
                                "raw scalar frame must hold exactly one scalar".to_string(),
                            ))
                        }
                    }
                } else {
                    Jsonb::Array(elems)
                };
                self.attach(finished)
            }
            Some(frame @ OpenFrame::Object { .. }) => {
                self.stack.push(frame);
                Err(JsonbError::UnexpectedToken(
                    "end-array while an object is open".to_string(),
                ))
            }
            None => Err(JsonbError::UnexpectedToken(
                "end-array with no open container".to_string(),
            )),
        }
    }

    /// Close the innermost object, sorting its keys canonically. Returns the
    /// finished document if this closed the root.
    pub fn end_object(&mut self) -> Result<Option<Jsonb>> {
        match self.stack.pop() {
            Some(OpenFrame::Object {
                mut pairs,
                pending_key: None,
            }) => {
                canonicalize_pairs(&mut pairs);
                self.attach(Jsonb::Object(pairs))
            }
            Some(OpenFrame::Object {
                pending_key: Some(key),
                ..
            }) => Err(JsonbError::UnexpectedToken(format!(
                "end-object while key \"{}\" has no value",
                key
            ))),
            Some(frame @ OpenFrame::Array { .. }) => {
                self.stack.push(frame);
                Err(JsonbError::UnexpectedToken(
                    "end-object while an array is open".to_string(),
                ))
            }
            None => Err(JsonbError::UnexpectedToken(
                "end-object with no open container".to_string(),
            )),
        }
    }

    /// Hand a closed container to its parent frame, or return it as the result.
    fn attach(&mut self, finished: Jsonb) -> Result<Option<Jsonb>> {
        match self.stack.last() {
            None => Ok(Some(finished)),
            Some(OpenFrame::Array { .. }) => self.elem(finished).map(|_| None),
            Some(OpenFrame::Object { .. }) => self.value(finished).map(|_| None),
        }
    }

    /// Push one token as produced by a [`TokenIter`], cloning its payload.
    pub fn push(&mut self, token: Token<'_>) -> Result<Option<Jsonb>> {
        match token {
            Token::BeginArray { raw_scalar, .. } => {
                self.begin_array(raw_scalar);
                Ok(None)
            }
            Token::BeginObject { .. } => {
                self.begin_object();
                Ok(None)
            }
            Token::Key(key) => self.key(key).map(|_| None),
            Token::Value(value) => self.value(value.clone()).map(|_| None),
            Token::Elem(value) => self.elem(value.clone()).map(|_| None),
            Token::EndArray => self.end_array(),
            Token::EndObject => self.end_object(),
        }
    }

    /// Rebuild a document from a token stream, letting `substitute` keep, drop,
    /// or replace each key, value, and element. Structural tokens are always
    /// kept. With `skip_nested`, only the root's direct members are offered to
    /// `substitute`; nested containers travel as whole values.
    pub fn fold<'a, F>(mut iter: TokenIter<'a>, skip_nested: bool, mut substitute: F) -> Result<Jsonb>
    where
        F: FnMut(&Token<'a>) -> Substitution,
    {
        let mut builder = Builder::new();
        let mut result = None;
        while let Some(token) = iter.next_token(skip_nested) {
            let decision = match token {
                Token::Key(_) | Token::Value(_) | Token::Elem(_) => substitute(&token),
                _ => Substitution::Keep,
            };
            result = match (decision, token) {
                (Substitution::Keep, token) => builder.push(token)?,
                (Substitution::Drop, _) => None,
                (Substitution::DropPair, Token::Key(_)) => {
                    // The paired value is skipped whole, nested or not.
                    iter.next_token(true);
                    None
                }
                (Substitution::DropPair, other) => {
                    return Err(JsonbError::UnexpectedToken(format!(
                        "cannot drop a pair at a {} token",
                        other.name()
                    )))
                }
                (Substitution::Replace(Jsonb::String(name)), Token::Key(_)) => {
                    builder.key(name)?;
                    None
                }
                (Substitution::Replace(value), Token::Value(_)) => {
                    builder.value(value)?;
                    None
                }
                (Substitution::Replace(value), Token::Elem(_)) => {
                    builder.elem(value)?;
                    None
                }
                (Substitution::Replace(value), other) => {
                    return Err(JsonbError::InvalidArgument(format!(
                        "cannot replace a {} token with a {}",
                        other.name(),
                        value.kind()
                    )))
                }
            };
        }
        result.ok_or_else(|| {
            JsonbError::UnexpectedToken("token stream ended before the root closed".to_string())
        })
    }
}
