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

//! Tree-walking evaluator.
//!
//! Evaluation recurses on the host stack and there is no tail-call elimination, so deep
//! recursion in Scheme code is bounded by the Rust stack.

use std::rc::Rc;

use ast::{Formals, LambdaExpression, Let, Node, NodeKind};
use environment::{Environment, RcEnv};
use error::{Error, SyntaxError, SyntaxErrorKind};
use number::parse_number;
use util::{check_len, unescape_string};
use value::{list_from_vec, list_from_vec_with_tail, Lambda, Value};

/// Evaluates `node` in `env`.
pub fn evaluate(node: &Node, env: &RcEnv) -> Result<Value, Error> {
    match node {
        Node::Program(expressions) | Node::Begin(expressions) => {
            evaluate_sequence(expressions, env)
        }

        Node::Boolean(_) | Node::Character(_) | Node::String(_) | Node::Number(_) => {
            literal_value(node)
        }
        Node::Identifier(name) | Node::PeculiarIdentifier(name) => env
            .borrow()
            .get(name)
            .ok_or_else(|| Error::Unbound(name.clone())),
        Node::Dot(_) => Ok(Value::Unspecific),
        Node::Illegal(literal) => {
            Err(SyntaxError::new(SyntaxErrorKind::IllegalToken, literal.clone()).into())
        }
        Node::List(_) => {
            Err(SyntaxError::new(SyntaxErrorKind::UnexpectedToken, node.to_text()).into())
        }

        Node::Vector(_) | Node::Quotation(_) => datum_to_value(node),

        Node::ProcedureCall(call) => {
            let f = evaluate(&call.operator, env)?;
            let args = call
                .operands
                .iter()
                .map(|operand| evaluate(operand, env))
                .collect::<Result<Vec<_>, _>>()?;
            apply(&f, &args)
        }
        Node::LambdaExpression(expression) => Ok(make_lambda(expression, env, None)),
        Node::Conditional(c) => {
            if evaluate(&c.test, env)?.is_true() {
                evaluate(&c.consequent, env)
            } else {
                match &c.alternate {
                    Some(alternate) => evaluate(alternate, env),
                    None => Ok(Value::Unspecific),
                }
            }
        }
        Node::Assignment(a) => {
            let value = evaluate(&a.expression, env)?;
            env.borrow_mut().set(&a.identifier, value)?;
            Ok(Value::Unspecific)
        }
        Node::IdentifierDefinition(d) => {
            let value = evaluate_named(&d.expression, env, &d.identifier)?;
            env.borrow_mut().define(&d.identifier, value);
            Ok(Value::Symbol(d.identifier.clone()))
        }

        Node::Cond(clauses) => {
            for clause in clauses.iter() {
                if clause.is_else() {
                    return evaluate_sequence(&clause.body, env);
                }
                let test = evaluate(&clause.test, env)?;
                if test.is_true() {
                    return if clause.body.is_empty() {
                        Ok(test)
                    } else {
                        evaluate_sequence(&clause.body, env)
                    };
                }
            }
            Ok(Value::Unspecific)
        }
        Node::Let(l) => evaluate_let(l, env),
        Node::LetStar(l) => evaluate_let_star(l, env),
        Node::Letrec(l) | Node::LetrecStar(l) => evaluate_letrec(l, env),
        Node::And(expressions) => {
            let mut result = Value::Boolean(true);
            for e in expressions.iter() {
                result = evaluate(e, env)?;
                if !result.is_true() {
                    break;
                }
            }
            Ok(result)
        }
        Node::Or(expressions) => {
            for e in expressions.iter() {
                let result = evaluate(e, env)?;
                if result.is_true() {
                    return Ok(result);
                }
            }
            Ok(Value::Boolean(false))
        }
        Node::When(clause) => {
            if evaluate(&clause.test, env)?.is_true() {
                evaluate_sequence(&clause.body, env)
            } else {
                Ok(Value::Unspecific)
            }
        }
        Node::Unless(clause) => {
            if evaluate(&clause.test, env)?.is_true() {
                Ok(Value::Unspecific)
            } else {
                evaluate_sequence(&clause.body, env)
            }
        }
    }
}

/// Evaluates expressions in order and returns the value of the last one, or the unspecified
/// value if there are none.
pub fn evaluate_sequence(nodes: &[Node], env: &RcEnv) -> Result<Value, Error> {
    let mut result = Value::Unspecific;
    for node in nodes.iter() {
        result = evaluate(node, env)?;
    }
    Ok(result)
}

/// Calls a procedure value with already evaluated arguments.
pub fn apply(f: &Value, args: &[Value]) -> Result<Value, Error> {
    match f {
        Value::Primitive(p) => {
            trace!("Calling primitive {} with {} arguments.", p.name, args.len());
            (p.implementation)(args)
        }
        Value::Lambda(l) => {
            trace!("Applying {} to {} arguments.", f, args.len());
            let frame = Environment::new_child(&l.env);
            bind_formals(l, args, &frame)?;
            evaluate_sequence(&l.expression.body, &frame)
        }
        _ => Err(Error::wrong_type("procedure", f.to_string())),
    }
}

fn make_lambda(expression: &Rc<LambdaExpression>, env: &RcEnv, name: Option<&str>) -> Value {
    Value::Lambda(Rc::new(Lambda {
        name: name.map(|n| n.to_string()),
        expression: expression.clone(),
        env: env.clone(),
    }))
}

/// Lambdas bound by `define`, `let` and friends remember the name they were bound to.
fn evaluate_named(node: &Node, env: &RcEnv, name: &str) -> Result<Value, Error> {
    match node {
        Node::LambdaExpression(expression) => Ok(make_lambda(expression, env, Some(name))),
        _ => evaluate(node, env),
    }
}

fn bind_formals(l: &Lambda, args: &[Value], frame: &RcEnv) -> Result<(), Error> {
    let name = l.name.as_ref().map_or("#<procedure>", |n| n.as_str());
    let mut frame = frame.borrow_mut();
    match &l.expression.formals {
        Formals::Fixed(names) => {
            check_len(name, args, Some(names.len()), Some(names.len()))?;
            for (n, arg) in names.iter().zip(args.iter()) {
                frame.define(n, arg.clone());
            }
        }
        Formals::Variadic(rest) => frame.define(rest, list_from_vec(args.to_vec())),
        Formals::Dotted(names, rest) => {
            check_len(name, args, Some(names.len()), None)?;
            for (n, arg) in names.iter().zip(args.iter()) {
                frame.define(n, arg.clone());
            }
            frame.define(rest, list_from_vec(args[names.len()..].to_vec()));
        }
    }
    Ok(())
}

fn evaluate_let(l: &Let, env: &RcEnv) -> Result<Value, Error> {
    let values = l
        .bind_specs
        .iter()
        .map(|b| evaluate_named(&b.expression, env, &b.identifier))
        .collect::<Result<Vec<_>, _>>()?;
    let frame = Environment::new_child(env);
    for (spec, value) in l.bind_specs.iter().zip(values.into_iter()) {
        frame.borrow_mut().define(&spec.identifier, value);
    }
    evaluate_sequence(&l.body, &frame)
}

// Each binding gets its own frame, so closures made by an init only see the bindings before
// it.
fn evaluate_let_star(l: &Let, env: &RcEnv) -> Result<Value, Error> {
    let mut frame = Environment::new_child(env);
    for spec in l.bind_specs.iter() {
        let value = evaluate_named(&spec.expression, &frame, &spec.identifier)?;
        let next = Environment::new_child(&frame);
        next.borrow_mut().define(&spec.identifier, value);
        frame = next;
    }
    evaluate_sequence(&l.body, &frame)
}

fn evaluate_letrec(l: &Let, env: &RcEnv) -> Result<Value, Error> {
    let frame = Environment::new_child(env);
    for spec in l.bind_specs.iter() {
        frame
            .borrow_mut()
            .define(&spec.identifier, Value::Unspecific);
    }
    for spec in l.bind_specs.iter() {
        let value = evaluate_named(&spec.expression, &frame, &spec.identifier)?;
        frame.borrow_mut().define(&spec.identifier, value);
    }
    evaluate_sequence(&l.body, &frame)
}

fn literal_value(node: &Node) -> Result<Value, Error> {
    match node {
        Node::Boolean(literal) => Ok(Value::Boolean(literal.starts_with("#t"))),
        Node::Number(literal) => Ok(parse_number(literal)?),
        Node::Character(literal) => character_value(literal),
        Node::String(literal) => {
            let body = literal
                .get(1..literal.len().saturating_sub(1))
                .ok_or_else(|| invalid_literal(literal))?;
            Ok(Value::string(unescape_string(body)))
        }
        _ => Err(invalid_literal(&node.to_text())),
    }
}

fn character_value(literal: &str) -> Result<Value, Error> {
    let name = literal.get(2..).ok_or_else(|| invalid_literal(literal))?;
    let c = match name {
        "space" => ' ',
        "newline" => '\n',
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(invalid_literal(literal)),
            }
        }
    };
    Ok(Value::Character(c))
}

fn invalid_literal(literal: &str) -> Error {
    SyntaxError::new(SyntaxErrorKind::InvalidLiteral, literal).into()
}

/// Turns quoted data into the value it denotes. Identifiers become symbols and nested
/// quotations become `(quote datum)` lists.
pub fn datum_to_value(node: &Node) -> Result<Value, Error> {
    match node {
        Node::Boolean(_) | Node::Character(_) | Node::String(_) | Node::Number(_) => {
            literal_value(node)
        }
        Node::Identifier(name) | Node::PeculiarIdentifier(name) => Ok(Value::Symbol(name.clone())),
        Node::List(items) => {
            let dotted = items.len() >= 2 && items[items.len() - 2].kind() == NodeKind::Dot;
            if dotted {
                let head = items[..items.len() - 2]
                    .iter()
                    .map(datum_to_value)
                    .collect::<Result<Vec<_>, _>>()?;
                let tail = datum_to_value(&items[items.len() - 1])?;
                Ok(list_from_vec_with_tail(head, tail))
            } else {
                let vals = items
                    .iter()
                    .map(datum_to_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(list_from_vec(vals))
            }
        }
        Node::Vector(items) => {
            let vals = items
                .iter()
                .map(datum_to_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::vector(vals))
        }
        Node::Quotation(datum) => Ok(list_from_vec(vec![
            Value::Symbol("quote".to_string()),
            datum_to_value(datum)?,
        ])),
        Node::Illegal(literal) => {
            Err(SyntaxError::new(SyntaxErrorKind::IllegalToken, literal.clone()).into())
        }
        _ => Err(SyntaxError::malformed("quote", node.to_text()).into()),
    }
}
