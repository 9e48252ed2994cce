//! JSON path expressions with closure-style filters and aggregates.
//!
//! # Overview
//! A path selects values from a parsed JSON body: `id`,
//! `endereco.rua`, `filhos[0].name`, `findAll{it.age <= 25}[-1].name`,
//! `salary.findAll{it != null}.sum()`.
//!
//! # Design
//! Source text is parsed once into an [`Expr`] tree and evaluated by a pure
//! function of the document. Field access on an array scatters over its
//! elements, so `filhos.name` yields one name per child. Closure predicates
//! never fail on missing or mistyped data; they just don't match. The
//! [`PathOptions::strict`] switch turns missing fields and out-of-range
//! indexes into errors instead of `null`.

mod ast;
mod eval;
mod lexer;
mod parser;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use ast::{Aggregate, BinaryOp, Expr, Method};
pub use parser::parse_path;

/// Evaluation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathOptions {
    /// Fail on missing fields and out-of-range indexes instead of
    /// yielding `null`.
    #[serde(default)]
    pub strict: bool,
}

impl PathOptions {
    pub const fn strict() -> Self {
        Self { strict: true }
    }
}

/// Syntax errors, with byte offsets into the path source.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { offset: usize, found: char },

    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("invalid number `{text}` at offset {offset}")]
    InvalidNumber { offset: usize, text: String },

    #[error("expected {expected} at offset {offset}, found {found}")]
    UnexpectedToken {
        offset: usize,
        found: String,
        expected: String,
    },

    #[error("expected {expected} at offset {offset}, found end of input")]
    UnexpectedEnd { offset: usize, expected: String },

    #[error("unknown function `{name}` at offset {offset}")]
    UnknownFunction { offset: usize, name: String },

    #[error("`{name}` at offset {offset} takes {expected} argument(s), got {found}")]
    WrongArity {
        offset: usize,
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown identifier `{name}` at offset {offset} (closure bodies refer to the element as `it`)")]
    UnknownIdentifier { offset: usize, name: String },
}

/// Runtime errors raised while walking a document.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("field `{field}` does not exist")]
    MissingField { field: String },

    #[error("index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("cannot index into {kind}")]
    NotIndexable { kind: &'static str },

    #[error("find{{...}} matched no element")]
    NoMatch,

    #[error("{operation}() is not defined for {kind}")]
    TypeMismatch {
        operation: &'static str,
        kind: &'static str,
    },
}

impl EvalError {
    /// Errors that strict mode raises but lenient mode maps to `null`.
    pub(crate) fn is_missing_data(&self) -> bool {
        matches!(
            self,
            EvalError::MissingField { .. } | EvalError::IndexOutOfRange { .. } | EvalError::NotIndexable { .. }
        )
    }
}

/// A parse or evaluation failure, tagged with the offending path.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PathError {
    #[error("cannot parse path `{path}`: {error}")]
    Parse {
        path: String,
        #[source]
        error: ParseError,
    },

    #[error("cannot evaluate path `{path}`: {error}")]
    Eval {
        path: String,
        #[source]
        error: EvalError,
    },
}

/// A parsed path expression, reusable across documents.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath {
    source: String,
    expr: Expr,
}

impl JsonPath {
    pub fn parse(source: &str) -> Result<Self, PathError> {
        let expr = parse_path(source).map_err(|error| PathError::Parse {
            path: source.to_string(),
            error,
        })?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn evaluate(&self, document: &Value) -> Result<Value, PathError> {
        self.evaluate_with(document, PathOptions::default())
    }

    pub fn evaluate_with(&self, document: &Value, options: PathOptions) -> Result<Value, PathError> {
        eval::evaluate(&self.expr, document, options).map_err(|error| PathError::Eval {
            path: self.source.clone(),
            error,
        })
    }
}

/// Parse and evaluate `source` against `document` in one step.
pub fn evaluate(document: &Value, source: &str, options: PathOptions) -> Result<Value, PathError> {
    JsonPath::parse(source)?.evaluate_with(document, options)
}
