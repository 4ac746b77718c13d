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

use std::rc::Rc;

use error::Error;
use util::check_len;
use value::Value;

/// Identity for compound data, value comparison for atoms.
pub fn eqv(a: &Value, b: &Value) -> bool {
    match (a, b) {
        // This comparison is in the same order as the R5RS one for ease of
        // verification.
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Symbol(a), Value::Symbol(b)) => a == b,
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Rational(a), Value::Rational(b)) => a == b,
        (Value::Real(a), Value::Real(b)) => a == b,
        (Value::Complex(a), Value::Complex(b)) => a == b,
        (Value::Character(a), Value::Character(b)) => a == b,
        (Value::EmptyList, Value::EmptyList) => true,
        (Value::Unspecific, Value::Unspecific) => true,
        (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
        (Value::Vector(a), Value::Vector(b)) => Rc::ptr_eq(a, b),
        (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b),
        (Value::Lambda(a), Value::Lambda(b)) => Rc::ptr_eq(a, b),
        (Value::Primitive(a), Value::Primitive(b)) => a.name == b.name,
        _ => false,
    }
}

/// Numbers and characters are compared by value, so `eq?` is the same as `eqv?`.
pub fn is_eq(a: &Value, b: &Value) -> bool {
    eqv(a, b)
}

pub fn eq_p(args: &[Value]) -> Result<Value, Error> {
    check_len("eq?", args, Some(2), Some(2))?;
    Ok(Value::Boolean(is_eq(&args[0], &args[1])))
}

pub fn eqv_p(args: &[Value]) -> Result<Value, Error> {
    check_len("eqv?", args, Some(2), Some(2))?;
    Ok(Value::Boolean(eqv(&args[0], &args[1])))
}

/// Structural equality. Loops forever on circular structures.
pub fn equal_p(args: &[Value]) -> Result<Value, Error> {
    check_len("equal?", args, Some(2), Some(2))?;
    Ok(Value::Boolean(args[0] == args[1]))
}

pub fn not(args: &[Value]) -> Result<Value, Error> {
    check_len("not", args, Some(1), Some(1))?;
    Ok(Value::Boolean(!args[0].is_true()))
}

pub fn boolean_p(args: &[Value]) -> Result<Value, Error> {
    check_len("boolean?", args, Some(1), Some(1))?;
    Ok(Value::Boolean(match args[0] {
        Value::Boolean(_) => true,
        _ => false,
    }))
}

pub fn procedure_p(args: &[Value]) -> Result<Value, Error> {
    check_len("procedure?", args, Some(1), Some(1))?;
    Ok(Value::Boolean(args[0].is_procedure()))
}

/// `(error message irritant ...)`
pub fn error(args: &[Value]) -> Result<Value, Error> {
    check_len("error", args, Some(1), None)?;
    let mut message = args[0].display_string();
    for irritant in args[1..].iter() {
        message.push(' ');
        message.push_str(&irritant.to_string());
    }
    Err(Error::User(message))
}
