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

//! Syntax tree produced by the parser.
//!
//! Leaves keep the literal text of their token. Branches own their sub-expressions, and every
//! node can render itself back as Scheme source through `Display`.

use std::fmt;
use std::rc::Rc;

use error::{SyntaxError, SyntaxErrorKind};
use lex::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    Boolean,
    Identifier,
    PeculiarIdentifier,
    Character,
    String,
    Number,
    Dot,
    Illegal,
    List,
    Vector,
    Quotation,
    ProcedureCall,
    LambdaExpression,
    Conditional,
    Assignment,
    IdentifierDefinition,
    Cond,
    Let,
    LetStar,
    Letrec,
    LetrecStar,
    Begin,
    And,
    Or,
    When,
    Unless,
}

impl NodeKind {
    /// The keyword that introduces a special form of this kind, if there is one.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            NodeKind::Quotation => Some("quote"),
            NodeKind::LambdaExpression => Some("lambda"),
            NodeKind::Conditional => Some("if"),
            NodeKind::Assignment => Some("set!"),
            NodeKind::IdentifierDefinition => Some("define"),
            NodeKind::Cond => Some("cond"),
            NodeKind::Let => Some("let"),
            NodeKind::LetStar => Some("let*"),
            NodeKind::Letrec => Some("letrec"),
            NodeKind::LetrecStar => Some("letrec*"),
            NodeKind::Begin => Some("begin"),
            NodeKind::And => Some("and"),
            NodeKind::Or => Some("or"),
            NodeKind::When => Some("when"),
            NodeKind::Unless => Some("unless"),
            _ => None,
        }
    }

    fn name(self) -> String {
        self.keyword()
            .map(|k| k.to_string())
            .unwrap_or_else(|| format!("{:?}", self))
    }
}

/// The parameter list of a lambda.
#[derive(Debug, Clone, PartialEq)]
pub enum Formals {
    /// `(a b c)`
    Fixed(Vec<String>),
    /// `args`: every argument, collected into a list.
    Variadic(String),
    /// `(a b . rest)`
    Dotted(Vec<String>, String),
}

impl Formals {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Formals::Fixed(names) => names.iter().map(|s| s.as_str()).collect(),
            Formals::Variadic(rest) => vec![rest.as_str()],
            Formals::Dotted(names, rest) => names
                .iter()
                .map(|s| s.as_str())
                .chain(std::iter::once(rest.as_str()))
                .collect(),
        }
    }

    fn write_inner(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Formals::Fixed(names) => write!(f, "{}", names.join(" ")),
            Formals::Variadic(rest) => write!(f, ". {}", rest),
            Formals::Dotted(names, rest) => write!(f, "{} . {}", names.join(" "), rest),
        }
    }
}

impl fmt::Display for Formals {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Formals::Variadic(rest) => write!(f, "{}", rest),
            _ => {
                write!(f, "(")?;
                self.write_inner(f)?;
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureCall {
    pub operator: Node,
    pub operands: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpression {
    pub formals: Formals,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub test: Node,
    pub consequent: Node,
    pub alternate: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub identifier: String,
    pub expression: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierDefinition {
    pub identifier: String,
    pub expression: Node,
    /// Set when written as `(define (name . formals) body ...)`.
    pub procedure_sugar: bool,
}

impl IdentifierDefinition {
    pub fn formals(&self) -> Option<&Formals> {
        match &self.expression {
            Node::LambdaExpression(l) => Some(&l.formals),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&[Node]> {
        match &self.expression {
            Node::LambdaExpression(l) => Some(&l.body),
            _ => None,
        }
    }
}

/// One clause of a `cond`, or the test and body of `when`/`unless`.
#[derive(Debug, Clone, PartialEq)]
pub struct CondClause {
    pub test: Node,
    pub body: Vec<Node>,
}

impl CondClause {
    pub fn is_else(&self) -> bool {
        match &self.test {
            Node::Identifier(s) => s == "else",
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindSpec {
    pub identifier: String,
    pub expression: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub bind_specs: Vec<BindSpec>,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Program(Vec<Node>),

    Boolean(String),
    Identifier(String),
    /// An operator symbol such as `+` or `<=`, used as an identifier.
    PeculiarIdentifier(String),
    Character(String),
    String(String),
    Number(String),
    Dot(String),
    Illegal(String),

    /// A parenthesized datum; only appears inside quoted data, or as `()`.
    List(Vec<Node>),
    Vector(Vec<Node>),
    Quotation(Box<Node>),

    ProcedureCall(Box<ProcedureCall>),
    LambdaExpression(Rc<LambdaExpression>),
    Conditional(Box<Conditional>),
    Assignment(Box<Assignment>),
    IdentifierDefinition(Box<IdentifierDefinition>),
    Cond(Vec<CondClause>),
    Let(Box<Let>),
    LetStar(Box<Let>),
    Letrec(Box<Let>),
    LetrecStar(Box<Let>),
    Begin(Vec<Node>),
    And(Vec<Node>),
    Or(Vec<Node>),
    When(Box<CondClause>),
    Unless(Box<CondClause>),
}

/// Builds an empty node of the given kind. Only leaves and plain sequences can be created
/// this way; other forms need their parts and are built by the parser.
pub fn instantiate<S: Into<String>>(kind: NodeKind, literal: S) -> Result<Node, SyntaxError> {
    let literal = literal.into();
    Ok(match kind {
        NodeKind::Boolean => Node::Boolean(literal),
        NodeKind::Identifier => Node::Identifier(literal),
        NodeKind::PeculiarIdentifier => Node::PeculiarIdentifier(literal),
        NodeKind::Character => Node::Character(literal),
        NodeKind::String => Node::String(literal),
        NodeKind::Number => Node::Number(literal),
        NodeKind::Dot => Node::Dot(literal),
        NodeKind::Illegal => Node::Illegal(literal),
        NodeKind::Program => Node::Program(Vec::new()),
        NodeKind::List => Node::List(Vec::new()),
        NodeKind::Vector => Node::Vector(Vec::new()),
        NodeKind::Begin => Node::Begin(Vec::new()),
        NodeKind::And => Node::And(Vec::new()),
        NodeKind::Or => Node::Or(Vec::new()),
        k => return Err(SyntaxError::malformed(&k.name(), literal)),
    })
}

/// Builds the node a single token stands for. Opening brackets give empty sequences.
pub fn from_token(token: &Token) -> Result<Node, SyntaxError> {
    let kind = match token.kind {
        TokenKind::Boolean => NodeKind::Boolean,
        TokenKind::Identifier => NodeKind::Identifier,
        TokenKind::OpProc => NodeKind::PeculiarIdentifier,
        TokenKind::Character => NodeKind::Character,
        TokenKind::String => NodeKind::String,
        TokenKind::Number => NodeKind::Number,
        TokenKind::Dot => NodeKind::Dot,
        TokenKind::Illegal => NodeKind::Illegal,
        TokenKind::LParen => NodeKind::List,
        TokenKind::VecLParen => NodeKind::Vector,
        TokenKind::Eof => {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedEof,
                token.literal.clone(),
            ))
        }
        TokenKind::RParen | TokenKind::Quotation => {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedToken,
                token.literal.clone(),
            ))
        }
    };
    instantiate(kind, token.literal.clone())
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Program(_) => NodeKind::Program,
            Node::Boolean(_) => NodeKind::Boolean,
            Node::Identifier(_) => NodeKind::Identifier,
            Node::PeculiarIdentifier(_) => NodeKind::PeculiarIdentifier,
            Node::Character(_) => NodeKind::Character,
            Node::String(_) => NodeKind::String,
            Node::Number(_) => NodeKind::Number,
            Node::Dot(_) => NodeKind::Dot,
            Node::Illegal(_) => NodeKind::Illegal,
            Node::List(_) => NodeKind::List,
            Node::Vector(_) => NodeKind::Vector,
            Node::Quotation(_) => NodeKind::Quotation,
            Node::ProcedureCall(_) => NodeKind::ProcedureCall,
            Node::LambdaExpression(_) => NodeKind::LambdaExpression,
            Node::Conditional(_) => NodeKind::Conditional,
            Node::Assignment(_) => NodeKind::Assignment,
            Node::IdentifierDefinition(_) => NodeKind::IdentifierDefinition,
            Node::Cond(_) => NodeKind::Cond,
            Node::Let(_) => NodeKind::Let,
            Node::LetStar(_) => NodeKind::LetStar,
            Node::Letrec(_) => NodeKind::Letrec,
            Node::LetrecStar(_) => NodeKind::LetrecStar,
            Node::Begin(_) => NodeKind::Begin,
            Node::And(_) => NodeKind::And,
            Node::Or(_) => NodeKind::Or,
            Node::When(_) => NodeKind::When,
            Node::Unless(_) => NodeKind::Unless,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.literal().is_some()
    }

    /// The token text of a leaf node.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Node::Boolean(s)
            | Node::Identifier(s)
            | Node::PeculiarIdentifier(s)
            | Node::Character(s)
            | Node::String(s)
            | Node::Number(s)
            | Node::Dot(s)
            | Node::Illegal(s) => Some(s),
            _ => None,
        }
    }

    pub fn first(&self) -> Option<&Node> {
        match self {
            Node::List(v) => v.first(),
            _ => None,
        }
    }

    pub fn rest(&self) -> &[Node] {
        match self {
            Node::List(v) if !v.is_empty() => &v[1..],
            _ => &[],
        }
    }

    /// All direct sub-expressions, in source order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Program(v)
            | Node::List(v)
            | Node::Vector(v)
            | Node::Begin(v)
            | Node::And(v)
            | Node::Or(v) => v.iter().collect(),
            Node::Quotation(datum) => vec![&**datum],
            Node::ProcedureCall(call) => std::iter::once(&call.operator)
                .chain(call.operands.iter())
                .collect(),
            Node::LambdaExpression(lambda) => lambda.body.iter().collect(),
            Node::Conditional(c) => {
                let mut v = vec![&c.test, &c.consequent];
                if let Some(alternate) = &c.alternate {
                    v.push(alternate);
                }
                v
            }
            Node::Assignment(a) => vec![&a.expression],
            Node::IdentifierDefinition(d) => vec![&d.expression],
            Node::Cond(clauses) => clauses
                .iter()
                .flat_map(|c| std::iter::once(&c.test).chain(c.body.iter()))
                .collect(),
            Node::Let(l) | Node::LetStar(l) | Node::Letrec(l) | Node::LetrecStar(l) => l
                .bind_specs
                .iter()
                .map(|b| &b.expression)
                .chain(l.body.iter())
                .collect(),
            Node::When(c) | Node::Unless(c) => {
                std::iter::once(&c.test).chain(c.body.iter()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn child(&self, index: usize) -> Result<&Node, SyntaxError> {
        let children = self.children();
        let size = children.len();
        children.into_iter().nth(index).ok_or_else(|| {
            SyntaxError::new(
                SyntaxErrorKind::ChildOutOfRange { index, size },
                self.to_text(),
            )
        })
    }

    /// Appends to the trailing open sequence of a branch node: the elements of a list, the
    /// operands of a call, the body of a lambda or `let`...
    pub fn add_child(&mut self, child: Node) -> Result<(), SyntaxError> {
        match self {
            Node::Program(v)
            | Node::List(v)
            | Node::Vector(v)
            | Node::Begin(v)
            | Node::And(v)
            | Node::Or(v) => v.push(child),
            Node::ProcedureCall(call) => call.operands.push(child),
            Node::LambdaExpression(lambda) => Rc::make_mut(lambda).body.push(child),
            Node::Let(l) | Node::LetStar(l) | Node::Letrec(l) | Node::LetrecStar(l) => {
                l.body.push(child)
            }
            Node::When(c) | Node::Unless(c) => c.body.push(child),
            _ => {
                return Err(SyntaxError::malformed(
                    &self.kind().name(),
                    child.to_text(),
                ))
            }
        }
        Ok(())
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

fn write_seq(f: &mut fmt::Formatter, nodes: &[Node]) -> fmt::Result {
    for node in nodes {
        write!(f, " {}", node)?;
    }
    Ok(())
}

fn write_clause(f: &mut fmt::Formatter, clause: &CondClause) -> fmt::Result {
    write!(f, "{}", clause.test)?;
    write_seq(f, &clause.body)
}

fn write_let(f: &mut fmt::Formatter, keyword: &str, l: &Let) -> fmt::Result {
    write!(f, "({} (", keyword)?;
    for (i, spec) in l.bind_specs.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "({} {})", spec.identifier, spec.expression)?;
    }
    write!(f, ")")?;
    write_seq(f, &l.body)?;
    write!(f, ")")
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Program(v) => {
                let lines: Vec<String> = v.iter().map(|n| n.to_string()).collect();
                write!(f, "{}", lines.join("\n"))
            }
            Node::Boolean(s)
            | Node::Identifier(s)
            | Node::PeculiarIdentifier(s)
            | Node::Character(s)
            | Node::String(s)
            | Node::Number(s)
            | Node::Dot(s)
            | Node::Illegal(s) => write!(f, "{}", s),
            Node::List(v) => {
                let items: Vec<String> = v.iter().map(|n| n.to_string()).collect();
                write!(f, "({})", items.join(" "))
            }
            Node::Vector(v) => {
                let items: Vec<String> = v.iter().map(|n| n.to_string()).collect();
                write!(f, "#({})", items.join(" "))
            }
            Node::Quotation(datum) => write!(f, "(quote {})", datum),
            Node::ProcedureCall(call) => {
                write!(f, "({}", call.operator)?;
                write_seq(f, &call.operands)?;
                write!(f, ")")
            }
            Node::LambdaExpression(lambda) => {
                write!(f, "(lambda {}", lambda.formals)?;
                write_seq(f, &lambda.body)?;
                write!(f, ")")
            }
            Node::Conditional(c) => {
                write!(f, "(if {} {}", c.test, c.consequent)?;
                if let Some(alternate) = &c.alternate {
                    write!(f, " {}", alternate)?;
                }
                write!(f, ")")
            }
            Node::Assignment(a) => write!(f, "(set! {} {})", a.identifier, a.expression),
            Node::IdentifierDefinition(d) => match (&d.expression, d.procedure_sugar) {
                (Node::LambdaExpression(lambda), true) => {
                    write!(f, "(define ({}", d.identifier)?;
                    match &lambda.formals {
                        Formals::Fixed(names) if names.is_empty() => (),
                        formals => {
                            write!(f, " ")?;
                            formals.write_inner(f)?;
                        }
                    }
                    write!(f, ")")?;
                    write_seq(f, &lambda.body)?;
                    write!(f, ")")
                }
                (expression, _) => write!(f, "(define {} {})", d.identifier, expression),
            },
            Node::Cond(clauses) => {
                write!(f, "(cond")?;
                for clause in clauses {
                    write!(f, " (")?;
                    write_clause(f, clause)?;
                    write!(f, ")")?;
                }
                write!(f, ")")
            }
            Node::Let(l) => write_let(f, "let", l),
            Node::LetStar(l) => write_let(f, "let*", l),
            Node::Letrec(l) => write_let(f, "letrec", l),
            Node::LetrecStar(l) => write_let(f, "letrec*", l),
            Node::Begin(v) => {
                write!(f, "(begin")?;
                write_seq(f, v)?;
                write!(f, ")")
            }
            Node::And(v) => {
                write!(f, "(and")?;
                write_seq(f, v)?;
                write!(f, ")")
            }
            Node::Or(v) => {
                write!(f, "(or")?;
                write_seq(f, v)?;
                write!(f, ")")
            }
            Node::When(c) => {
                write!(f, "(when ")?;
                write_clause(f, c)?;
                write!(f, ")")
            }
            Node::Unless(c) => {
                write!(f, "(unless ")?;
                write_clause(f, c)?;
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Node {
        Node::Identifier(s.to_string())
    }

    fn num(s: &str) -> Node {
        Node::Number(s.to_string())
    }

    #[test]
    fn token_to_node() {
        let t = Token::new(TokenKind::OpProc, "+");
        assert_eq!(Node::PeculiarIdentifier("+".into()), from_token(&t).unwrap());
        let t = Token::new(TokenKind::VecLParen, "#(");
        assert_eq!(Node::Vector(vec![]), from_token(&t).unwrap());
        assert!(from_token(&Token::new(TokenKind::RParen, ")")).is_err());
    }

    #[test]
    fn instantiate_leaves_only() {
        assert_eq!(
            Node::Boolean("#t".into()),
            instantiate(NodeKind::Boolean, "#t").unwrap()
        );
        assert!(instantiate(NodeKind::Conditional, "if").is_err());
    }

    #[test]
    fn add_and_index_children() {
        let mut list = instantiate(NodeKind::List, "(").unwrap();
        list.add_child(ident("a")).unwrap();
        list.add_child(num("1")).unwrap();
        assert_eq!(NodeKind::List, list.kind());
        assert_eq!(&num("1"), list.child(1).unwrap());
        assert_eq!(Some(&ident("a")), list.first());
        assert_eq!(&[num("1")], list.rest());
        let err = list.child(2).unwrap_err();
        assert_eq!(
            SyntaxErrorKind::ChildOutOfRange { index: 2, size: 2 },
            err.kind
        );
        assert!(ident("x").add_child(num("1")).is_err());
    }

    #[test]
    fn render_conditional() {
        let node = Node::Conditional(Box::new(Conditional {
            test: ident("t"),
            consequent: num("1"),
            alternate: None,
        }));
        assert_eq!("(if t 1)", node.to_text());
        assert_eq!(2, node.children().len());
    }

    #[test]
    fn render_definitions() {
        let lambda = Node::LambdaExpression(Rc::new(LambdaExpression {
            formals: Formals::Dotted(vec!["a".into()], "rest".into()),
            body: vec![ident("rest")],
        }));
        let sugared = Node::IdentifierDefinition(Box::new(IdentifierDefinition {
            identifier: "f".into(),
            expression: lambda.clone(),
            procedure_sugar: true,
        }));
        assert_eq!("(define (f a . rest) rest)", sugared.to_text());
        let plain = Node::IdentifierDefinition(Box::new(IdentifierDefinition {
            identifier: "f".into(),
            expression: lambda,
            procedure_sugar: false,
        }));
        assert_eq!("(define f (lambda (a . rest) rest))", plain.to_text());
    }

    #[test]
    fn render_data() {
        let quoted = Node::Quotation(Box::new(Node::List(vec![
            ident("a"),
            Node::Dot(".".into()),
            Node::Vector(vec![num("1")]),
        ])));
        assert_eq!("(quote (a . #(1)))", quoted.to_text());
    }

    #[test]
    fn render_let_and_cond() {
        let l = Node::LetStar(Box::new(Let {
            bind_specs: vec![BindSpec {
                identifier: "x".into(),
                expression: num("1"),
            }],
            body: vec![ident("x")],
        }));
        assert_eq!("(let* ((x 1)) x)", l.to_text());
        let c = Node::Cond(vec![
            CondClause {
                test: ident("a"),
                body: vec![],
            },
            CondClause {
                test: ident("else"),
                body: vec![num("2")],
            },
        ]);
        assert_eq!("(cond (a) (else 2))", c.to_text());
        match &c {
            Node::Cond(clauses) => assert!(clauses[1].is_else() && !clauses[0].is_else()),
            _ => unreachable!(),
        }
    }
}
