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

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_complex::Complex;
use num_rational::BigRational;

use ast::LambdaExpression;
use environment::RcEnv;
use error::Error;
use primitives::Primitive;
use util::{escape_char, escape_string};

/// Runtime values. Cloning is cheap: compound data is shared through `Rc`, so a clone of a
/// pair or vector is the same object.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unspecific,
    EmptyList,
    Boolean(bool),
    Integer(BigInt),
    Rational(Box<BigRational>),
    Real(f64),
    Complex(Box<Complex<f64>>),
    Character(char),
    String(Rc<str>),
    Symbol(String),
    Pair(Rc<Pair>),
    Vector(Rc<RefCell<Vec<Value>>>),
    Lambda(Rc<Lambda>),
    Primitive(&'static Primitive),
}

#[derive(Debug, PartialEq)]
pub struct Pair {
    car: RefCell<Value>,
    cdr: RefCell<Value>,
}

impl Pair {
    pub fn new(car: Value, cdr: Value) -> Self {
        Pair {
            car: RefCell::new(car),
            cdr: RefCell::new(cdr),
        }
    }

    pub fn car(&self) -> Value {
        self.car.borrow().clone()
    }

    pub fn cdr(&self) -> Value {
        self.cdr.borrow().clone()
    }

    pub fn set_car(&self, v: Value) {
        self.car.replace(v);
    }

    pub fn set_cdr(&self, v: Value) {
        self.cdr.replace(v);
    }
}

/// A closure: the code of a lambda together with the frame it was created in.
pub struct Lambda {
    pub name: Option<String>,
    pub expression: Rc<LambdaExpression>,
    pub env: RcEnv,
}

// Closures are only ever equal to themselves.
impl PartialEq for Lambda {
    fn eq(&self, other: &Lambda) -> bool {
        std::ptr::eq(self, other)
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Lambda {{ name: {:?}, formals: {} }}", self.name, self.expression.formals)
    }
}

impl Value {
    pub fn string<S: AsRef<str>>(s: S) -> Value {
        Value::String(Rc::from(s.as_ref()))
    }

    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Pair(Rc::new(Pair::new(car, cdr)))
    }

    pub fn vector(v: Vec<Value>) -> Value {
        Value::Vector(Rc::new(RefCell::new(v)))
    }

    /// Everything except `#f` counts as true.
    pub fn is_true(&self) -> bool {
        match self {
            Value::Boolean(false) => false,
            _ => true,
        }
    }

    pub fn is_procedure(&self) -> bool {
        match self {
            Value::Lambda(_) | Value::Primitive(_) => true,
            _ => false,
        }
    }

    pub fn as_pair(&self) -> Result<&Rc<Pair>, Error> {
        match self {
            Value::Pair(p) => Ok(p),
            _ => Err(Error::wrong_type("pair", self.to_string())),
        }
    }

    pub fn as_vector(&self) -> Result<&Rc<RefCell<Vec<Value>>>, Error> {
        match self {
            Value::Vector(v) => Ok(v),
            _ => Err(Error::wrong_type("vector", self.to_string())),
        }
    }

    /// The raw form used by `display`: strings and characters are not escaped.
    pub fn display_string(&self) -> String {
        format!("{}", Raw(self))
    }
}

pub fn list_from_vec(vals: Vec<Value>) -> Value {
    list_from_vec_with_tail(vals, Value::EmptyList)
}

/// Builds `(v0 v1 ... . tail)`.
pub fn list_from_vec_with_tail(vals: Vec<Value>, tail: Value) -> Value {
    vals.into_iter()
        .rev()
        .fold(tail, |acc, v| Value::cons(v, acc))
}

/// Collects the elements of a proper list.
pub fn vec_from_list(list: &Value) -> Result<Vec<Value>, Error> {
    let mut result = Vec::new();
    let mut current = list.clone();
    loop {
        current = match current {
            Value::EmptyList => return Ok(result),
            Value::Pair(p) => {
                result.push(p.car());
                p.cdr()
            }
            _ => return Err(Error::wrong_type("list", list.to_string())),
        };
    }
}

/// True for `()` and for pairs whose cdr chain ends in `()`.
pub fn is_list(v: &Value) -> bool {
    let mut current = v.clone();
    loop {
        current = match current {
            Value::EmptyList => return true,
            Value::Pair(p) => p.cdr(),
            _ => return false,
        };
    }
}

pub fn pretty_print(v: &Value) -> String {
    v.to_string()
}

struct Raw<'a>(&'a Value);

impl<'a> fmt::Display for Raw<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_value(self.0, f, true)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_value(self, f, false)
    }
}

fn write_value(v: &Value, f: &mut fmt::Formatter, raw: bool) -> fmt::Result {
    match v {
        Value::Unspecific => write!(f, "#<unspecified>"),
        Value::EmptyList => write!(f, "()"),
        Value::Boolean(true) => write!(f, "#t"),
        Value::Boolean(false) => write!(f, "#f"),
        Value::Integer(i) => write!(f, "{}", i),
        Value::Rational(r) => write!(f, "{}", r),
        Value::Real(r) => write!(f, "{:?}", r),
        Value::Complex(c) => {
            let sign = if c.im < 0.0 { '-' } else { '+' };
            write!(f, "{}{}{}i", c.re, sign, c.im.abs())
        }
        Value::Character(c) if raw => write!(f, "{}", c),
        Value::Character(c) => write!(f, "#\\{}", escape_char(*c)),
        Value::String(s) if raw => write!(f, "{}", s),
        Value::String(s) => write!(f, "\"{}\"", escape_string(s)),
        Value::Symbol(s) => write!(f, "{}", s),
        Value::Pair(p) => {
            write!(f, "(")?;
            write_value(&p.car(), f, raw)?;
            let mut tail = p.cdr();
            loop {
                tail = match tail {
                    Value::EmptyList => break,
                    Value::Pair(next) => {
                        write!(f, " ")?;
                        write_value(&next.car(), f, raw)?;
                        next.cdr()
                    }
                    other => {
                        write!(f, " . ")?;
                        write_value(&other, f, raw)?;
                        break;
                    }
                };
            }
            write!(f, ")")
        }
        Value::Vector(vals) => {
            write!(f, "#(")?;
            for (i, val) in vals.borrow().iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write_value(val, f, raw)?;
            }
            write!(f, ")")
        }
        Value::Lambda(l) => match &l.name {
            Some(name) => write!(f, "#<procedure {}>", name),
            None => write!(f, "#<procedure>"),
        },
        Value::Primitive(p) => write!(f, "#<primitive {}>", p.name),
    }
}
