use crate::span::Span;
use crate::types::Ty;
use std::fmt::{Display, Formatter};
use std::result;
use thiserror::Error;

/// Optional source location rendered as ` at <span>` in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct At(pub Option<Span>);

impl Display for At {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(span) if !span.is_null() => write!(f, " at {}", span),
            _ => Ok(()),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown identifier `{name}`{at}")]
    UnknownIdentifier { name: String, at: At },
    #[error("cannot dispatch {call}{at}")]
    DispatchFailed { call: String, at: At },
    #[error("macro parameter `{parameter}` expects {expected}, found {found}")]
    MacroParameterMismatch {
        parameter: String,
        expected: Ty,
        found: String,
    },
    #[error("unsupported dispatch shape: {0}")]
    UnsupportedDispatchShape(String),
    #[error("missing capability: {0}")]
    MissingCapability(String),
    #[error("cannot reduce {construct}{at}")]
    Unreducible { construct: String, at: At },
    #[error("invalid literal `{text}`: {reason}")]
    InvalidLiteral { text: String, reason: String },
    #[error("syntax error{at}: {message}")]
    Syntax { message: String, at: At },
    #[error("{0}")]
    Generic(String),
}

impl Error {
    pub fn unknown_identifier(name: impl Into<String>, span: Option<Span>) -> Self {
        Error::UnknownIdentifier {
            name: name.into(),
            at: At(span),
        }
    }

    pub fn dispatch_failed(call: impl Into<String>, span: Option<Span>) -> Self {
        Error::DispatchFailed {
            call: call.into(),
            at: At(span),
        }
    }

    pub fn unreducible(construct: impl Into<String>, span: Option<Span>) -> Self {
        Error::Unreducible {
            construct: construct.into(),
            at: At(span),
        }
    }

    pub fn invalid_literal(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidLiteral {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Error::Syntax {
            message: message.into(),
            at: At(Some(span)),
        }
    }

    /// Source span attached to the error, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::UnknownIdentifier { at, .. }
            | Error::DispatchFailed { at, .. }
            | Error::Unreducible { at, .. }
            | Error::Syntax { at, .. } => at.0,
            _ => None,
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(format!("{:#}", err))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
