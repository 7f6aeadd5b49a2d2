//! Depth-first token walk over a [`Jsonb`] document.
//!
//! The walker never copies or mutates the document; it hands out borrowed
//! tokens in document order:
//!
//! ```text
//! {"a":[1,2]}  =>  BeginObject{1} Key("a") BeginArray{2} Elem(1) Elem(2) EndArray EndObject
//! ```
//!
//! A scalar root is reported as a one-element array flagged `raw_scalar`, so
//! callers only ever have to handle the object and array cases at the root.
//!
//! With `skip_nested` set, a nested container is reported as a single
//! `Value`/`Elem` token instead of being opened. The root is always opened.

use crate::value::Jsonb;

/// One event of a depth-first document walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    BeginArray { len: usize, raw_scalar: bool },
    BeginObject { len: usize },
    Key(&'a str),
    /// An object member value.
    Value(&'a Jsonb),
    /// An array element.
    Elem(&'a Jsonb),
    EndArray,
    EndObject,
}

impl Token<'_> {
    /// Short name used in protocol error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Token::BeginArray { .. } => "begin-array",
            Token::BeginObject { .. } => "begin-object",
            Token::Key(_) => "key",
            Token::Value(_) => "value",
            Token::Elem(_) => "element",
            Token::EndArray => "end-array",
            Token::EndObject => "end-object",
        }
    }
}

#[derive(Debug, Clone)]
enum Frame<'a> {
    Array {
        items: &'a [Jsonb],
        pos: usize,
    },
    Object {
        pairs: &'a [(String, Jsonb)],
        pos: usize,
        value_pending: bool,
    },
}

/// What the top frame produced, computed before the frame borrow ends.
enum Step<'a> {
    Close(Token<'a>),
    Emit(Token<'a>),
    Member { doc: &'a Jsonb, is_value: bool },
}

/// Borrowing token stream over a document. Cloning restarts nothing; it forks
/// the walk at the current position. Use [`Jsonb::iter`] for a fresh walk.
#[derive(Debug, Clone)]
pub struct TokenIter<'a> {
    root: Option<&'a Jsonb>,
    stack: Vec<Frame<'a>>,
}

impl<'a> TokenIter<'a> {
    pub fn new(doc: &'a Jsonb) -> Self {
        Self {
            root: Some(doc),
            stack: Vec::new(),
        }
    }

    /// Current container depth (0 before the root is opened and after it closes).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Produce the next token, or `None` once the root container has closed.
    pub fn next_token(&mut self, skip_nested: bool) -> Option<Token<'a>> {
        if let Some(root) = self.root.take() {
            return Some(self.open(root));
        }

        let step = match self.stack.last_mut()? {
            Frame::Array { items, pos } => {
                let items: &'a [Jsonb] = *items;
                match items.get(*pos) {
                    None => Step::Close(Token::EndArray),
                    Some(doc) => {
                        *pos += 1;
                        Step::Member {
                            doc,
                            is_value: false,
                        }
                    }
                }
            }
            Frame::Object {
                pairs,
                pos,
                value_pending,
            } => {
                let pairs: &'a [(String, Jsonb)] = *pairs;
                match pairs.get(*pos) {
                    None => Step::Close(Token::EndObject),
                    Some((_, doc)) if *value_pending => {
                        *pos += 1;
                        *value_pending = false;
                        Step::Member {
                            doc,
                            is_value: true,
                        }
                    }
                    Some((key, _)) => {
                        *value_pending = true;
                        Step::Emit(Token::Key(key))
                    }
                }
            }
        };

        match step {
            Step::Close(token) => {
                self.stack.pop();
                Some(token)
            }
            Step::Emit(token) => Some(token),
            Step::Member { doc, .. } if !skip_nested && !doc.is_scalar() => Some(self.open(doc)),
            Step::Member { doc, is_value: true } => Some(Token::Value(doc)),
            Step::Member { doc, .. } => Some(Token::Elem(doc)),
        }
    }

    fn open(&mut self, doc: &'a Jsonb) -> Token<'a> {
        match doc {
            Jsonb::Array(items) => {
                self.stack.push(Frame::Array { items, pos: 0 });
                Token::BeginArray {
                    len: items.len(),
                    raw_scalar: false,
                }
            }
            Jsonb::Object(pairs) => {
                self.stack.push(Frame::Object {
                    pairs,
                    pos: 0,
                    value_pending: false,
                });
                Token::BeginObject { len: pairs.len() }
            }
            scalar => {
                self.stack.push(Frame::Array {
                    items: std::slice::from_ref(scalar),
                    pos: 0,
                });
                Token::BeginArray {
                    len: 1,
                    raw_scalar: true,
                }
            }
        }
    }
}

/// Full walk, opening every nested container.
impl<'a> Iterator for TokenIter<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token(false)
    }
}
