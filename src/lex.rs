// Copyright 2018-2019 Matthieu Felix
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

use std::iter::Peekable;
use std::str::Chars;

use once_cell::sync::Lazy;
use regex::Regex;

use error::{SyntaxError, SyntaxErrorKind};
use number;

static BOOLEAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:f(?:alse)?|t(?:rue)?)$").expect("Error compiling regex."));
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9!$%&*+\-./:<=>?@^_~]*$").expect("Error compiling regex.")
});
static OPERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[+\-*/%]|[<>]=?|=)$").expect("Error compiling regex."));
static CHARACTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\\(?:.|space|newline)$").expect("Error compiling regex."));

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    LParen,
    RParen,
    /// `#(`
    VecLParen,
    /// `'`
    Quotation,
    Dot,
    Identifier,
    /// Arithmetic and comparison symbols: `+ - * / % < <= > >= =`.
    OpProc,
    Boolean,
    Number,
    Character,
    String,
    Illegal,
    Eof,
}

/// A token from the input: a kind tag and the exact text it was read from.
///
/// Literal tokens are not converted to values here; the evaluator does that once it knows it
/// needs them, so the AST can always reproduce its source text.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, literal: S) -> Token {
        Token {
            kind,
            literal: literal.into(),
        }
    }
}

/// Scans source text into tokens, one at a time, with one token of lookahead.
///
/// Lexing never fails: text that matches no rule becomes an `Illegal` token, and the parser
/// decides what to report. Once the input is exhausted, `Eof` is returned forever.
pub struct Lexer<'a> {
    it: Peekable<Chars<'a>>,
    peeked: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            it: input.chars().peekable(),
            peeked: None,
        }
    }

    pub fn peek_token(&mut self) -> &Token {
        let token = match self.peeked.take() {
            Some(t) => t,
            None => self.scan(),
        };
        self.peeked.get_or_insert(token)
    }

    pub fn next_token(&mut self) -> Token {
        match self.peeked.take() {
            Some(t) => t,
            None => self.scan(),
        }
    }

    fn scan(&mut self) -> Token {
        loop {
            consume_leading_spaces(&mut self.it);
            if self.it.peek() == Some(&';') {
                consume_to_newline(&mut self.it);
            } else {
                break;
            }
        }

        let c = match self.it.peek() {
            Some(&c) => c,
            None => return Token::new(TokenKind::Eof, ""),
        };
        match c {
            '(' => {
                self.it.next();
                Token::new(TokenKind::LParen, "(")
            }
            ')' => {
                self.it.next();
                Token::new(TokenKind::RParen, ")")
            }
            '\'' => {
                self.it.next();
                Token::new(TokenKind::Quotation, "'")
            }
            '"' => consume_string(&mut self.it),
            '#' => consume_hash(&mut self.it),
            _ => classify(take_delimited_token(&mut self.it)),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Turns an str slice into the full vector of its tokens, without the final `Eof`.
pub fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')' || c == '"' || c == ';' || c == '\''
}

fn consume_to_newline(it: &mut Iterator<Item = char>) {
    for c in it {
        if c == '\n' {
            break;
        }
    }
}

fn consume_leading_spaces<I>(it: &mut Peekable<I>)
where
    I: Iterator<Item = char>,
{
    while let Some(&c) = it.peek() {
        if c.is_whitespace() {
            it.next();
        } else {
            break;
        }
    }
}

fn take_delimited_token<I>(it: &mut Peekable<I>) -> String
where
    I: Iterator<Item = char>,
{
    let mut result = String::new();
    while let Some(&c) = it.peek() {
        if is_delimiter(c) {
            break;
        }
        result.push(c);
        it.next();
    }
    result
}

fn classify(lexeme: String) -> Token {
    let kind = if lexeme == "." {
        TokenKind::Dot
    } else if BOOLEAN.is_match(&lexeme) {
        TokenKind::Boolean
    } else if IDENTIFIER.is_match(&lexeme) {
        TokenKind::Identifier
    } else if OPERATOR.is_match(&lexeme) {
        TokenKind::OpProc
    } else if number::is_number_literal(&lexeme) {
        TokenKind::Number
    } else {
        TokenKind::Illegal
    };
    Token::new(kind, lexeme)
}

fn consume_hash<I>(it: &mut Peekable<I>) -> Token
where
    I: Iterator<Item = char>,
{
    let mut literal = String::new();
    if let Some(c) = it.next() {
        literal.push(c);
    }
    match it.peek() {
        Some(&'(') => {
            it.next();
            Token::new(TokenKind::VecLParen, "#(")
        }
        Some(&'\\') => {
            literal.push('\\');
            it.next();
            // The first character after `#\` is taken even if it is a delimiter, so that
            // `#\(` and `#\ ` work.
            if let Some(c) = it.next() {
                literal.push(c);
            }
            literal.push_str(&take_delimited_token(it));
            let kind = if CHARACTER.is_match(&literal) {
                TokenKind::Character
            } else {
                TokenKind::Illegal
            };
            Token::new(kind, literal)
        }
        _ => {
            literal.push_str(&take_delimited_token(it));
            classify(literal)
        }
    }
}

/// Reads a string literal, keeping the quotes and escapes in the token's text.
fn consume_string<I>(it: &mut Peekable<I>) -> Token
where
    I: Iterator<Item = char>,
{
    let mut literal = String::new();
    if let Some(c) = it.next() {
        literal.push(c);
    }

    let mut escaped = false;
    for c in it {
        literal.push(c);
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Token::new(TokenKind::String, literal);
        }
    }
    Token::new(TokenKind::Illegal, literal)
}

pub enum BracketType {
    List,
    Quote,
}

pub struct SegmentationResult {
    pub segments: Vec<Vec<Token>>,
    pub remainder: Vec<Token>,
    pub depth: u64,
}

/// Splits a vector of tokens into a vector of vectors of tokens, each of which represents a
/// single top-level expression.
pub fn segment(toks: Vec<Token>) -> Result<SegmentationResult, SyntaxError> {
    let mut segments = Vec::new();
    let mut current_segment = Vec::new();
    let mut brackets = Vec::new();

    for tok in toks.into_iter() {
        let kind = tok.kind;
        current_segment.push(tok);

        match kind {
            TokenKind::LParen | TokenKind::VecLParen => brackets.push(BracketType::List),
            TokenKind::Quotation => brackets.push(BracketType::Quote),
            TokenKind::RParen => {
                match brackets.pop() {
                    Some(BracketType::List) => (),
                    _ => {
                        return Err(SyntaxError::new(SyntaxErrorKind::UnexpectedToken, ")"));
                    }
                };
                close_quotes(&mut brackets);
            }
            _ => close_quotes(&mut brackets),
        }

        if brackets.is_empty() {
            segments.push(current_segment);
            current_segment = Vec::new();
        }
    }

    Ok(SegmentationResult {
        segments,
        remainder: current_segment,
        depth: brackets.len() as u64,
    })
}

// A quote is complete as soon as the datum following it is.
fn close_quotes(brackets: &mut Vec<BracketType>) {
    while let Some(&BracketType::Quote) = brackets.last() {
        brackets.pop();
    }
}
