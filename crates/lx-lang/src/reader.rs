use crate::lexer::{atom, is_number, string_literal, ws};
use lx_core::ast::{Node, NodeKind, NumberLiteral};
use lx_core::span::{FileId, Span};
use lx_core::{Error, Result};
use winnow::error::ErrMode;
use winnow::ModalResult;

/// State of one parse: file id, the stack of forms being read and the last
/// complete form, both used for diagnostics.
///
/// Create one per parse call; nothing is shared between sessions.
#[derive(Debug)]
pub struct ReaderSession {
    file: FileId,
    source_len: usize,
    context: Vec<(&'static str, usize)>,
    last_read: Option<Node>,
    failure: Option<(String, usize)>,
}

impl ReaderSession {
    pub fn new(file: FileId) -> Self {
        Self {
            file,
            source_len: 0,
            context: vec![],
            last_read: None,
            failure: None,
        }
    }

    pub fn last_read(&self) -> Option<&Node> {
        self.last_read.as_ref()
    }

    /// Reads every top-level form in `source`.
    pub fn read_all(&mut self, source: &str) -> Result<Vec<Node>> {
        self.source_len = source.len();
        self.context.clear();
        self.failure = None;
        let mut input = source;
        let mut forms = vec![];
        loop {
            self.skip_ws(&mut input);
            if input.is_empty() {
                break;
            }
            match self.form(&mut input) {
                Ok(node) => {
                    self.last_read = Some(node.clone());
                    forms.push(node);
                }
                Err(_) => return Err(self.error(input)),
            }
        }
        tracing::trace!("read {} forms from file {}", forms.len(), self.file);
        Ok(forms)
    }

    fn offset(&self, input: &str) -> u32 {
        (self.source_len - input.len()) as u32
    }

    fn span_from(&self, start: u32, input: &str) -> Span {
        Span::new(self.file, start, self.offset(input))
    }

    fn skip_ws(&self, input: &mut &str) {
        // `ws` only fails on malformed comments, which it cannot produce.
        let _ = ws(input);
    }

    fn fail<T>(&mut self, message: impl Into<String>, input: &str) -> ModalResult<T> {
        self.failure = Some((message.into(), self.source_len - input.len()));
        Err(ErrMode::Cut(winnow::error::ContextError::new()))
    }

    fn error(&self, input: &str) -> Error {
        let (message, at) = self
            .failure
            .clone()
            .unwrap_or_else(|| ("unexpected input".to_string(), self.source_len - input.len()));
        let mut message = message;
        if let Some((form, start)) = self.context.last() {
            message.push_str(&format!(" while reading {} opened at {}", form, start));
        }
        if let Some(last) = &self.last_read {
            message.push_str(&format!(" (after {})", last));
        }
        Error::syntax(message, Span::new(self.file, at as u32, at as u32 + 1))
    }

    fn form(&mut self, input: &mut &str) -> ModalResult<Node> {
        let start = self.offset(input);
        if input.starts_with("#(") {
            *input = &input[2..];
            let items = self.sequence(input, "lambda list", ')', start)?;
            return Ok(Node::with_span(NodeKind::LambdaList(items), self.span_from(start, input)));
        }
        match input.chars().next() {
            Some('(') => {
                *input = &input[1..];
                let items = self.sequence(input, "list", ')', start)?;
                Ok(Node::with_span(NodeKind::List(items), self.span_from(start, input)))
            }
            Some('[') => {
                *input = &input[1..];
                let items = self.sequence(input, "vector", ']', start)?;
                Ok(Node::with_span(NodeKind::Vector(items), self.span_from(start, input)))
            }
            Some(')') | Some(']') => self.fail("unbalanced closing delimiter", input),
            Some('\'') => {
                *input = &input[1..];
                self.skip_ws(input);
                if input.is_empty() {
                    return self.fail("quote without a form", input);
                }
                let inner = self.form(input)?;
                Ok(Node::with_span(NodeKind::Quoted(inner), self.span_from(start, input)))
            }
            Some('"') => match string_literal(input) {
                Ok(text) => Ok(Node::with_span(NodeKind::Text(text), self.span_from(start, input))),
                Err(_) => self.fail("unterminated string literal", input),
            },
            Some(_) => {
                let text = match atom(input) {
                    Ok(text) => text,
                    Err(_) => return self.fail("expected a form", input),
                };
                let span = self.span_from(start, input);
                let kind = if is_number(text) {
                    NodeKind::Number(NumberLiteral {
                        text: text.to_string(),
                    })
                } else {
                    NodeKind::Identifier(lx_core::ast::Identifier {
                        name: text.to_string(),
                    })
                };
                Ok(Node::with_span(kind, span))
            }
            None => self.fail("unexpected end of input", input),
        }
    }

    fn sequence(
        &mut self,
        input: &mut &str,
        what: &'static str,
        close: char,
        start: u32,
    ) -> ModalResult<Vec<Node>> {
        self.context.push((what, start as usize));
        let mut items = vec![];
        loop {
            self.skip_ws(input);
            match input.chars().next() {
                Some(c) if c == close => {
                    *input = &input[1..];
                    break;
                }
                Some(')') | Some(']') => {
                    return self.fail(format!("mismatched delimiter, expected `{}`", close), input)
                }
                None => return self.fail(format!("unterminated {}", what), input),
                Some(_) => {
                    let item = self.form(input)?;
                    self.last_read = Some(item.clone());
                    items.push(item);
                }
            }
        }
        self.context.pop();
        Ok(items)
    }
}

/// Reads all forms of `source` in a fresh session.
pub fn read(source: &str) -> Result<Vec<Node>> {
    ReaderSession::new(0).read_all(source)
}

/// Reads exactly one form.
pub fn read_one(source: &str) -> Result<Node> {
    let mut forms = read(source)?;
    match forms.len() {
        1 => Ok(forms.remove(0)),
        n => Err(Error::syntax(
            format!("expected one form, found {}", n),
            Span::new(0, 0, source.len() as u32),
        )),
    }
}
