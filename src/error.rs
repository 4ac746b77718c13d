// Copyright 2018-2020 Matthieu Felix
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types shared by the parser, the evaluator and the primitives.
//!
//! Lexical problems never surface here directly: the lexer emits `Illegal` tokens, and the
//! parser turns them into a [`SyntaxError`] once it knows where they occur.

use std::error;
use std::fmt;

/// What went wrong while building an AST.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    /// A lexeme that matches no token rule.
    IllegalToken,
    /// A well-formed token in a place where the grammar does not allow it.
    UnexpectedToken,
    /// The input ended in the middle of a compound expression.
    UnexpectedEof,
    /// A special form with missing or extra parts. Holds the form keyword.
    MalformedForm(String),
    /// A form the grammar recognizes but the evaluator does not support.
    NotImplemented(String),
    /// A literal whose shape is valid but whose value cannot be built, e.g. `1/0`.
    InvalidLiteral,
    /// Indexed access past the last child of a branch node.
    ChildOutOfRange { index: usize, size: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub literal: String,
}

impl SyntaxError {
    pub fn new<S: Into<String>>(kind: SyntaxErrorKind, literal: S) -> Self {
        SyntaxError {
            kind,
            literal: literal.into(),
        }
    }

    pub fn malformed<S: Into<String>>(form: &str, literal: S) -> Self {
        SyntaxError::new(SyntaxErrorKind::MalformedForm(form.to_string()), literal)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            SyntaxErrorKind::IllegalToken => write!(f, "illegal token: {}", self.literal),
            SyntaxErrorKind::UnexpectedToken => write!(f, "unexpected token: {}", self.literal),
            SyntaxErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            SyntaxErrorKind::MalformedForm(form) => {
                write!(f, "malformed {}: near `{}`", form, self.literal)
            }
            SyntaxErrorKind::NotImplemented(form) => write!(f, "not implemented yet: {}", form),
            SyntaxErrorKind::InvalidLiteral => write!(f, "invalid literal: {}", self.literal),
            SyntaxErrorKind::ChildOutOfRange { index, size } => write!(
                f,
                "child index out of range: got={}, size={} in {}",
                index, size, self.literal
            ),
        }
    }
}

impl error::Error for SyntaxError {}

/// Any failure raised while parsing or evaluating Scheme code.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Syntax(SyntaxError),
    /// Wrong kind of argument. `expected` names the required kind (pair, list, vector...).
    Type { expected: &'static str, got: String },
    /// Index or count outside the valid bound of its target.
    Range { index: String, limit: String },
    DivisionByZero,
    Unbound(String),
    Arity {
        name: String,
        expected: String,
        got: usize,
    },
    /// Raised from Scheme code through the `error` primitive.
    User(String),
}

impl Error {
    pub fn wrong_type<S: Into<String>>(expected: &'static str, got: S) -> Self {
        Error::Type {
            expected,
            got: got.into(),
        }
    }

    pub fn out_of_range<I: ToString, L: ToString>(index: I, limit: L) -> Self {
        Error::Range {
            index: index.to_string(),
            limit: limit.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Syntax(e) => write!(f, "syntax error: {}", e),
            Error::Type { expected, got } => write!(
                f,
                "wrong type argument: got={}, wants={}",
                got, expected
            ),
            Error::Range { index, limit } => {
                write!(f, "argument out of range: got={}, limit={}", index, limit)
            }
            Error::DivisionByZero => write!(f, "division by zero"),
            Error::Unbound(name) => write!(f, "unbound identifier: {}", name),
            Error::Arity {
                name,
                expected,
                got,
            } => write!(
                f,
                "{}: wrong number of arguments: expected {}, got {}",
                name, expected, got
            ),
            Error::User(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl error::Error for Error {}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Error::Syntax(e)
    }
}
