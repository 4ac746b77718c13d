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

//! Recursive-descent parser from tokens to [`Node`]s.
//!
//! Special forms are recognized from the identifier right after an opening parenthesis.
//! Everything else in that position is a procedure call. Quoted data and vector literals are
//! parsed without looking at keywords at all.

use std::collections::HashSet;
use std::rc::Rc;

use ast::{
    self, Assignment, BindSpec, CondClause, Conditional, Formals, IdentifierDefinition,
    LambdaExpression, Let, Node, NodeKind, ProcedureCall,
};
use error::{SyntaxError, SyntaxErrorKind};
use lex::{Lexer, Token, TokenKind};

/// Forms whose keywords are reserved but which cannot be evaluated.
const NOT_IMPLEMENTED: &[&str] = &[
    "case",
    "do",
    "delay",
    "delay-force",
    "make-promise",
    "parameterize",
    "guard",
    "case-lambda",
    "let-values",
    "let*-values",
    "define-values",
    "define-record-type",
    "define-syntax",
    "let-syntax",
    "letrec-syntax",
    "syntax-rules",
    "quasiquote",
    "unquote",
    "unquote-splicing",
];

/// Parses a whole source text into a `Program` node.
pub fn parse(source: &str) -> Result<Node, SyntaxError> {
    Parser::new(source).parse_program()
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Parser<'a> {
        Parser {
            lexer: Lexer::new(source),
        }
    }

    pub fn parse_program(&mut self) -> Result<Node, SyntaxError> {
        let mut program = Vec::new();
        while self.peek_kind() != TokenKind::Eof {
            program.push(self.parse_expression()?);
        }
        debug!("Parsed program with {} expressions.", program.len());
        Ok(Node::Program(program))
    }

    pub fn parse_expression(&mut self) -> Result<Node, SyntaxError> {
        match self.peek_kind() {
            TokenKind::LParen => {
                self.lexer.next_token();
                self.parse_compound_expression()
            }
            TokenKind::VecLParen => {
                self.lexer.next_token();
                self.parse_vector()
            }
            TokenKind::Quotation => {
                self.lexer.next_token();
                self.parse_quotation()
            }
            _ => self.parse_simple_expression(),
        }
    }

    fn parse_simple_expression(&mut self) -> Result<Node, SyntaxError> {
        let token = self.lexer.next_token();
        match token.kind {
            TokenKind::Illegal => Err(SyntaxError::new(
                SyntaxErrorKind::IllegalToken,
                token.literal,
            )),
            // A dot is only meaningful in formals and quoted data.
            TokenKind::Dot => Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedToken,
                token.literal,
            )),
            _ => ast::from_token(&token),
        }
    }

    /// Called right after an opening parenthesis.
    fn parse_compound_expression(&mut self) -> Result<Node, SyntaxError> {
        let token = self.lexer.peek_token().clone();
        trace!("Compound expression starting with {:?}.", token);
        match token.kind {
            TokenKind::RParen => {
                self.lexer.next_token();
                ast::instantiate(NodeKind::List, "()")
            }
            TokenKind::Eof => Err(unexpected_eof()),
            TokenKind::Identifier => {
                let keyword = token.literal.as_str();
                if NOT_IMPLEMENTED.contains(&keyword) {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::NotImplemented(keyword.to_string()),
                        keyword,
                    ));
                }
                match keyword {
                    "lambda" => self.consume_then(Parser::parse_lambda_expression),
                    "if" => self.consume_then(Parser::parse_conditional),
                    "set!" => self.consume_then(Parser::parse_assignment),
                    "define" => self.consume_then(Parser::parse_identifier_definition),
                    "quote" => self.consume_then(|p| {
                        let quoted = p.parse_quotation()?;
                        p.expect_rparen("quote")?;
                        Ok(quoted)
                    }),
                    "cond" => self.consume_then(Parser::parse_cond),
                    "let" => self.consume_then(|p| p.parse_let(NodeKind::Let)),
                    "let*" => self.consume_then(|p| p.parse_let(NodeKind::LetStar)),
                    "letrec" => self.consume_then(|p| p.parse_let(NodeKind::Letrec)),
                    "letrec*" => self.consume_then(|p| p.parse_let(NodeKind::LetrecStar)),
                    "begin" => self.consume_then(|p| {
                        p.parse_expressions_to_rparen().map(Node::Begin)
                    }),
                    "and" => self.consume_then(|p| p.parse_expressions_to_rparen().map(Node::And)),
                    "or" => self.consume_then(|p| p.parse_expressions_to_rparen().map(Node::Or)),
                    "when" => self.consume_then(|p| {
                        p.parse_clause_form("when").map(|c| Node::When(Box::new(c)))
                    }),
                    "unless" => self.consume_then(|p| {
                        p.parse_clause_form("unless")
                            .map(|c| Node::Unless(Box::new(c)))
                    }),
                    _ => self.parse_procedure_call(),
                }
            }
            _ => self.parse_procedure_call(),
        }
    }

    fn consume_then<F>(&mut self, f: F) -> Result<Node, SyntaxError>
    where
        F: FnOnce(&mut Parser<'a>) -> Result<Node, SyntaxError>,
    {
        self.lexer.next_token();
        f(self)
    }

    fn parse_procedure_call(&mut self) -> Result<Node, SyntaxError> {
        let operator = self.parse_expression()?;
        let operands = self.parse_expressions_to_rparen()?;
        Ok(Node::ProcedureCall(Box::new(ProcedureCall {
            operator,
            operands,
        })))
    }

    fn parse_lambda_expression(&mut self) -> Result<Node, SyntaxError> {
        let formals = self.parse_formals("lambda")?;
        let body = self.read_body("lambda")?;
        Ok(Node::LambdaExpression(Rc::new(LambdaExpression {
            formals,
            body,
        })))
    }

    fn parse_formals(&mut self, form: &str) -> Result<Formals, SyntaxError> {
        let token = self.lexer.next_token();
        match token.kind {
            TokenKind::Identifier => Ok(Formals::Variadic(token.literal)),
            TokenKind::LParen => self.parse_formals_list(form, Vec::new()),
            TokenKind::Eof => Err(unexpected_eof()),
            _ => Err(SyntaxError::malformed(form, token.literal)),
        }
    }

    /// Reads identifiers up to the closing parenthesis of a parameter list, after `names` have
    /// already been read.
    fn parse_formals_list(
        &mut self,
        form: &str,
        mut names: Vec<String>,
    ) -> Result<Formals, SyntaxError> {
        let formals = loop {
            let token = self.lexer.next_token();
            match token.kind {
                TokenKind::Identifier => names.push(token.literal),
                TokenKind::RParen => break Formals::Fixed(names),
                TokenKind::Dot => {
                    let rest = self.expect_identifier(form)?;
                    self.expect_rparen(form)?;
                    break if names.is_empty() {
                        Formals::Variadic(rest)
                    } else {
                        Formals::Dotted(names, rest)
                    };
                }
                TokenKind::Eof => return Err(unexpected_eof()),
                _ => return Err(SyntaxError::malformed(form, token.literal)),
            }
        };
        check_unique(form, formals.names())?;
        Ok(formals)
    }

    fn parse_conditional(&mut self) -> Result<Node, SyntaxError> {
        let test = self.parse_position("if")?;
        let consequent = self.parse_position("if")?;
        let alternate = if self.peek_kind() == TokenKind::RParen {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_rparen("if")?;
        Ok(Node::Conditional(Box::new(Conditional {
            test,
            consequent,
            alternate,
        })))
    }

    fn parse_assignment(&mut self) -> Result<Node, SyntaxError> {
        let identifier = self.expect_identifier("set!")?;
        let expression = self.parse_position("set!")?;
        self.expect_rparen("set!")?;
        Ok(Node::Assignment(Box::new(Assignment {
            identifier,
            expression,
        })))
    }

    fn parse_identifier_definition(&mut self) -> Result<Node, SyntaxError> {
        if self.peek_kind() == TokenKind::LParen {
            self.lexer.next_token();
            let identifier = self.expect_identifier("define")?;
            let formals = self.parse_formals_list("define", Vec::new())?;
            let body = self.read_body("define")?;
            let expression = Node::LambdaExpression(Rc::new(LambdaExpression { formals, body }));
            return Ok(Node::IdentifierDefinition(Box::new(IdentifierDefinition {
                identifier,
                expression,
                procedure_sugar: true,
            })));
        }

        let identifier = self.expect_identifier("define")?;
        let expression = self.parse_position("define")?;
        self.expect_rparen("define")?;
        Ok(Node::IdentifierDefinition(Box::new(IdentifierDefinition {
            identifier,
            expression,
            procedure_sugar: false,
        })))
    }

    /// Called after `'` or the `quote` keyword.
    fn parse_quotation(&mut self) -> Result<Node, SyntaxError> {
        let datum = self.parse_datum()?;
        Ok(Node::Quotation(Box::new(datum)))
    }

    fn parse_datum(&mut self) -> Result<Node, SyntaxError> {
        let token = self.lexer.next_token();
        match token.kind {
            TokenKind::LParen => self.parse_list_datum(),
            TokenKind::VecLParen => self.parse_vector(),
            TokenKind::Quotation => self.parse_quotation(),
            TokenKind::Illegal => Err(SyntaxError::new(
                SyntaxErrorKind::IllegalToken,
                token.literal,
            )),
            TokenKind::Dot => Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedToken,
                token.literal,
            )),
            _ => ast::from_token(&token),
        }
    }

    /// Reads data up to a closing parenthesis. A dot must follow at least one datum and be
    /// followed by exactly one.
    fn parse_list_datum(&mut self) -> Result<Node, SyntaxError> {
        let mut list = ast::instantiate(NodeKind::List, "(")?;
        let mut empty = true;
        loop {
            match self.peek_kind() {
                TokenKind::RParen => {
                    self.lexer.next_token();
                    return Ok(list);
                }
                TokenKind::Eof => return Err(unexpected_eof()),
                TokenKind::Dot if !empty => {
                    let dot = self.lexer.next_token();
                    list.add_child(ast::from_token(&dot)?)?;
                    list.add_child(self.parse_datum()?)?;
                    self.expect_rparen("list")?;
                    return Ok(list);
                }
                _ => {
                    list.add_child(self.parse_datum()?)?;
                    empty = false;
                }
            }
        }
    }

    /// Called after `#(`.
    fn parse_vector(&mut self) -> Result<Node, SyntaxError> {
        let mut vector = ast::instantiate(NodeKind::Vector, "#(")?;
        loop {
            match self.peek_kind() {
                TokenKind::RParen => {
                    self.lexer.next_token();
                    return Ok(vector);
                }
                TokenKind::Eof => return Err(unexpected_eof()),
                _ => vector.add_child(self.parse_datum()?)?,
            }
        }
    }

    fn parse_cond(&mut self) -> Result<Node, SyntaxError> {
        let mut clauses: Vec<CondClause> = Vec::new();
        loop {
            let token = self.lexer.next_token();
            match token.kind {
                TokenKind::RParen if clauses.is_empty() => {
                    return Err(SyntaxError::malformed("cond", token.literal))
                }
                TokenKind::RParen => break,
                TokenKind::LParen => {
                    if clauses.last().map_or(false, |c| c.is_else()) {
                        return Err(SyntaxError::malformed("cond", "else"));
                    }
                    let test = self.parse_position("cond")?;
                    let body = self.parse_expressions_to_rparen()?;
                    let clause = CondClause { test, body };
                    if clause.is_else() && clause.body.is_empty() {
                        return Err(SyntaxError::malformed("cond", "else"));
                    }
                    clauses.push(clause);
                }
                TokenKind::Eof => return Err(unexpected_eof()),
                _ => return Err(SyntaxError::malformed("cond", token.literal)),
            }
        }
        Ok(Node::Cond(clauses))
    }

    fn parse_let(&mut self, kind: NodeKind) -> Result<Node, SyntaxError> {
        let form = kind.keyword().unwrap_or("let");
        let token = self.lexer.next_token();
        match token.kind {
            TokenKind::LParen => (),
            TokenKind::Eof => return Err(unexpected_eof()),
            // Includes named let.
            _ => return Err(SyntaxError::malformed(form, token.literal)),
        }

        let mut bind_specs = Vec::new();
        loop {
            let token = self.lexer.next_token();
            match token.kind {
                TokenKind::RParen => break,
                TokenKind::LParen => {
                    let identifier = self.expect_identifier(form)?;
                    let expression = self.parse_position(form)?;
                    self.expect_rparen(form)?;
                    bind_specs.push(BindSpec {
                        identifier,
                        expression,
                    });
                }
                TokenKind::Eof => return Err(unexpected_eof()),
                _ => return Err(SyntaxError::malformed(form, token.literal)),
            }
        }
        if kind != NodeKind::LetStar {
            check_unique(form, bind_specs.iter().map(|b| b.identifier.as_str()).collect())?;
        }

        let body = self.read_body(form)?;
        let l = Box::new(Let { bind_specs, body });
        Ok(match kind {
            NodeKind::LetStar => Node::LetStar(l),
            NodeKind::Letrec => Node::Letrec(l),
            NodeKind::LetrecStar => Node::LetrecStar(l),
            _ => Node::Let(l),
        })
    }

    /// `(when test body ...)` and `(unless test body ...)`.
    fn parse_clause_form(&mut self, form: &str) -> Result<CondClause, SyntaxError> {
        let test = self.parse_position(form)?;
        let body = self.read_body(form)?;
        Ok(CondClause { test, body })
    }

    fn parse_expressions_to_rparen(&mut self) -> Result<Vec<Node>, SyntaxError> {
        let mut expressions = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::RParen => {
                    self.lexer.next_token();
                    return Ok(expressions);
                }
                TokenKind::Eof => return Err(unexpected_eof()),
                _ => expressions.push(self.parse_expression()?),
            }
        }
    }

    /// A body is one or more expressions followed by a closing parenthesis.
    fn read_body(&mut self, form: &str) -> Result<Vec<Node>, SyntaxError> {
        let body = self.parse_expressions_to_rparen()?;
        if body.is_empty() {
            Err(SyntaxError::malformed(form, ")"))
        } else {
            Ok(body)
        }
    }

    /// Parses a mandatory sub-expression of a special form.
    fn parse_position(&mut self, form: &str) -> Result<Node, SyntaxError> {
        match self.peek_kind() {
            TokenKind::RParen => Err(SyntaxError::malformed(form, ")")),
            TokenKind::Eof => Err(unexpected_eof()),
            _ => self.parse_expression(),
        }
    }

    fn expect_identifier(&mut self, form: &str) -> Result<String, SyntaxError> {
        let token = self.lexer.next_token();
        match token.kind {
            TokenKind::Identifier | TokenKind::OpProc => Ok(token.literal),
            TokenKind::Eof => Err(unexpected_eof()),
            _ => Err(SyntaxError::malformed(form, token.literal)),
        }
    }

    fn expect_rparen(&mut self, form: &str) -> Result<(), SyntaxError> {
        let token: Token = self.lexer.next_token();
        match token.kind {
            TokenKind::RParen => Ok(()),
            TokenKind::Eof => Err(unexpected_eof()),
            _ => Err(SyntaxError::malformed(form, token.literal)),
        }
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.lexer.peek_token().kind
    }
}

fn unexpected_eof() -> SyntaxError {
    SyntaxError::new(SyntaxErrorKind::UnexpectedEof, "")
}

fn check_unique(form: &str, names: Vec<&str>) -> Result<(), SyntaxError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(SyntaxError::malformed(form, name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> Node {
        match parse(source).unwrap() {
            Node::Program(mut v) => {
                assert_eq!(1, v.len());
                v.remove(0)
            }
            _ => panic!("parse did not return a program"),
        }
    }

    fn error_kind(source: &str) -> SyntaxErrorKind {
        parse(source).unwrap_err().kind
    }

    #[test]
    fn procedure_call() {
        let node = parse_one("(a b c)");
        assert_eq!(NodeKind::ProcedureCall, node.kind());
        assert_eq!("(a b c)", node.to_text());
        assert_eq!(3, node.children().len());
    }

    #[test]
    fn dot_outside_formals_and_data() {
        for source in &["(list 1 . 2)", ".", "(f . x)", "(if . a)", "(begin 1 .)"] {
            assert_eq!(SyntaxErrorKind::UnexpectedToken, error_kind(source));
        }
        assert_eq!(NodeKind::Quotation, parse_one("'(1 . 2)").kind());
        assert_eq!(NodeKind::LambdaExpression, parse_one("(lambda (a . b) a)").kind());
    }

    #[test]
    fn operator_identifiers() {
        let node = parse_one("(+ 1 2)");
        match &node {
            Node::ProcedureCall(call) => {
                assert_eq!(Node::PeculiarIdentifier("+".into()), call.operator)
            }
            _ => panic!("expected a call"),
        }
    }

    #[test]
    fn conditional() {
        let node = parse_one("(if (= 0 0) 1 2)");
        assert_eq!(NodeKind::Conditional, node.kind());
        assert_eq!("(if (= 0 0) 1 2)", node.to_text());
        assert_eq!(NodeKind::Conditional, parse_one("(if a b)").kind());
        assert_eq!(
            SyntaxErrorKind::MalformedForm("if".into()),
            error_kind("(if)")
        );
        assert_eq!(
            SyntaxErrorKind::MalformedForm("if".into()),
            error_kind("(if a b c d)")
        );
    }

    #[test]
    fn lambda_formals() {
        for (source, formals) in &[
            ("(lambda (x y) x)", Formals::Fixed(vec!["x".into(), "y".into()])),
            ("(lambda args args)", Formals::Variadic("args".into())),
            (
                "(lambda (x . rest) x)",
                Formals::Dotted(vec!["x".into()], "rest".into()),
            ),
            ("(lambda () 1)", Formals::Fixed(vec![])),
        ] {
            match parse_one(source) {
                Node::LambdaExpression(l) => assert_eq!(formals, &l.formals),
                n => panic!("expected a lambda, got {}", n),
            }
        }
        assert_eq!(
            SyntaxErrorKind::MalformedForm("lambda".into()),
            error_kind("(lambda (x))")
        );
        assert_eq!(
            SyntaxErrorKind::MalformedForm("lambda".into()),
            error_kind("(lambda (x x) x)")
        );
    }

    #[test]
    fn definitions() {
        let node = parse_one("(define (fact n) (if (= n 0) 1 (* n (fact (- n 1)))))");
        assert_eq!(
            "(define (fact n) (if (= n 0) 1 (* n (fact (- n 1)))))",
            node.to_text()
        );
        match &node {
            Node::IdentifierDefinition(d) => {
                assert_eq!("fact", d.identifier);
                assert_eq!(Some(&Formals::Fixed(vec!["n".into()])), d.formals());
                assert_eq!(1, d.body().map_or(0, |b| b.len()));
            }
            _ => panic!("expected a definition"),
        }
        assert_eq!("(define x 1)", parse_one("(define x 1)").to_text());
        assert_eq!(
            "(define (f . args) args)",
            parse_one("(define (f . args) args)").to_text()
        );
        assert_eq!(
            SyntaxErrorKind::MalformedForm("define".into()),
            error_kind("(define 1 2)")
        );
    }

    #[test]
    fn quotations() {
        assert_eq!("(quote a)", parse_one("'a").to_text());
        assert_eq!("(quote (1 . 2))", parse_one("(quote (1 . 2))").to_text());
        assert_eq!("(quote (quote a))", parse_one("''a").to_text());
        assert_eq!(
            "(quote (if lambda))",
            parse_one("'(if lambda)").to_text()
        );
        assert_eq!(
            SyntaxErrorKind::MalformedForm("list".into()),
            error_kind("'(1 . 2 3)")
        );
        assert_eq!(SyntaxErrorKind::UnexpectedToken, error_kind("'( . 2)"));
    }

    #[test]
    fn vectors() {
        let node = parse_one("#(1 #t (a b))");
        assert_eq!(NodeKind::Vector, node.kind());
        assert_eq!("#(1 #t (a b))", node.to_text());
    }

    #[test]
    fn cond_and_let() {
        let node = parse_one("(cond ((= x 1) 'a) (else 'b))");
        assert_eq!(
            "(cond ((= x 1) (quote a)) (else (quote b)))",
            node.to_text()
        );
        assert_eq!(
            SyntaxErrorKind::MalformedForm("cond".into()),
            error_kind("(cond (else 1) (x 2))")
        );
        let node = parse_one("(let ((x 1) (y 2)) (+ x y))");
        assert_eq!(NodeKind::Let, node.kind());
        assert_eq!("(let ((x 1) (y 2)) (+ x y))", node.to_text());
        assert_eq!(NodeKind::LetStar, parse_one("(let* ((x 1) (x 2)) x)").kind());
        assert_eq!(NodeKind::Letrec, parse_one("(letrec ((x 1)) x)").kind());
        let node = parse_one("(letrec* ((x 1) (y x)) y)");
        assert_eq!(NodeKind::LetrecStar, node.kind());
        assert_eq!("(letrec* ((x 1) (y x)) y)", node.to_text());
        assert_eq!(
            SyntaxErrorKind::MalformedForm("let".into()),
            error_kind("(let loop ((i 0)) i)")
        );
        assert_eq!(
            SyntaxErrorKind::MalformedForm("let".into()),
            error_kind("(let ((x 1) (x 2)) x)")
        );
    }

    #[test]
    fn derived_forms() {
        assert_eq!(NodeKind::And, parse_one("(and)").kind());
        assert_eq!("(or a b)", parse_one("(or a b)").to_text());
        assert_eq!("(begin 1 2)", parse_one("(begin 1 2)").to_text());
        assert_eq!("(when a b c)", parse_one("(when a b c)").to_text());
        assert_eq!(
            SyntaxErrorKind::MalformedForm("unless".into()),
            error_kind("(unless a)")
        );
    }

    #[test]
    fn not_implemented_forms() {
        assert_eq!(
            SyntaxErrorKind::NotImplemented("case".into()),
            error_kind("(case x ((1) 'a))")
        );
        assert_eq!(
            SyntaxErrorKind::NotImplemented("define-syntax".into()),
            error_kind("(define-syntax foo (syntax-rules ()))")
        );
    }

    #[test]
    fn errors() {
        assert_eq!(SyntaxErrorKind::UnexpectedEof, error_kind("(a b"));
        assert_eq!(SyntaxErrorKind::UnexpectedEof, error_kind("'"));
        assert_eq!(SyntaxErrorKind::UnexpectedToken, error_kind(")"));
        assert_eq!(SyntaxErrorKind::IllegalToken, error_kind("(a 12d3)"));
        let e = parse("(f #foo)").unwrap_err();
        assert_eq!("#foo", e.literal);
    }

    #[test]
    fn keywords_alone_are_identifiers() {
        assert_eq!(Node::Identifier("if".into()), parse_one("if"));
        assert_eq!(NodeKind::List, parse_one("()").kind());
        match parse("").unwrap() {
            Node::Program(v) => assert!(v.is_empty()),
            _ => panic!("expected a program"),
        }
    }
}
