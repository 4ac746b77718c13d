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

//! Built-in procedures.
//!
//! The table below is installed once into the global frame. Each primitive receives its
//! evaluated arguments as a slice and checks their count and types itself.
//!
//! Not provided: `string-ref`, `string-set!`, `make-string`, ports, `call/cc`, `values`,
//! `dynamic-wind`, `eval`, `load`, transcendental functions.

use std::fmt::{Debug, Error as FmtError, Formatter};

use environment::RcEnv;
use error::Error;
use primitives::char::*;
use primitives::control::*;
use primitives::numeric::*;
use primitives::object::*;
use primitives::pair::*;
use primitives::string::*;
use primitives::symbol::*;
use primitives::vector::*;
use primitives::write::*;
use value::Value;

mod char;
mod control;
mod numeric;
mod object;
mod pair;
mod string;
mod symbol;
mod vector;
mod write;

macro_rules! simple_primitive {
    ($name:expr, $implementation:ident) => {
        Primitive {
            name: $name,
            implementation: $implementation,
        }
    };
}

static PRIMITIVES: &[Primitive] = &[
    simple_primitive!("eq?", eq_p),
    simple_primitive!("eqv?", eqv_p),
    simple_primitive!("equal?", equal_p),
    simple_primitive!("not", not),
    simple_primitive!("boolean?", boolean_p),
    simple_primitive!("procedure?", procedure_p),
    simple_primitive!("error", error),
    simple_primitive!("=", equal),
    simple_primitive!("<", less_than),
    simple_primitive!(">", greater_than),
    simple_primitive!("<=", less_than_equal),
    simple_primitive!(">=", greater_than_equal),
    simple_primitive!("+", add),
    simple_primitive!("*", mul),
    simple_primitive!("-", sub),
    simple_primitive!("/", div),
    simple_primitive!("%", modulo),
    simple_primitive!("modulo", modulo),
    simple_primitive!("quotient", quotient),
    simple_primitive!("remainder", remainder),
    simple_primitive!("abs", abs),
    simple_primitive!("min", min),
    simple_primitive!("max", max),
    simple_primitive!("zero?", zero_p),
    simple_primitive!("positive?", positive_p),
    simple_primitive!("negative?", negative_p),
    simple_primitive!("odd?", odd_p),
    simple_primitive!("even?", even_p),
    simple_primitive!("number?", number_p),
    simple_primitive!("complex?", complex_p),
    simple_primitive!("real?", real_p),
    simple_primitive!("rational?", rational_p),
    simple_primitive!("integer?", integer_p),
    simple_primitive!("exact?", exact_p),
    simple_primitive!("inexact?", inexact_p),
    simple_primitive!("pair?", pair_p),
    simple_primitive!("cons", cons),
    simple_primitive!("car", car),
    simple_primitive!("cdr", cdr),
    simple_primitive!("set-car!", set_car_b),
    simple_primitive!("set-cdr!", set_cdr_b),
    simple_primitive!("caar", caar),
    simple_primitive!("cadr", cadr),
    simple_primitive!("cdar", cdar),
    simple_primitive!("cddr", cddr),
    simple_primitive!("null?", null_p),
    simple_primitive!("list?", list_p),
    simple_primitive!("list", list),
    simple_primitive!("make-list", make_list),
    simple_primitive!("length", length),
    simple_primitive!("append", append),
    simple_primitive!("reverse", reverse),
    simple_primitive!("list-tail", list_tail),
    simple_primitive!("list-ref", list_ref),
    simple_primitive!("list-copy", list_copy),
    simple_primitive!("memq", memq),
    simple_primitive!("memv", memv),
    simple_primitive!("member", member),
    simple_primitive!("assq", assq),
    simple_primitive!("assv", assv),
    simple_primitive!("assoc", assoc),
    simple_primitive!("vector?", vector_p),
    simple_primitive!("make-vector", make_vector),
    simple_primitive!("vector", vector),
    simple_primitive!("vector-length", vector_length),
    simple_primitive!("vector-ref", vector_ref),
    simple_primitive!("vector-set!", vector_set_b),
    simple_primitive!("vector->list", vector_to_list),
    simple_primitive!("list->vector", list_to_vector),
    simple_primitive!("vector-fill!", vector_fill_b),
    simple_primitive!("symbol?", symbol_p),
    simple_primitive!("symbol->string", symbol_to_string),
    simple_primitive!("string->symbol", string_to_symbol),
    simple_primitive!("char?", char_p),
    simple_primitive!("char->integer", char_to_integer),
    simple_primitive!("integer->char", integer_to_char),
    simple_primitive!("char-alphabetic?", char_alphabetic_p),
    simple_primitive!("char-numeric?", char_numeric_p),
    simple_primitive!("char-whitespace?", char_whitespace_p),
    simple_primitive!("char-lower-case?", char_lower_case_p),
    simple_primitive!("char-upper-case?", char_upper_case_p),
    simple_primitive!("char-upcase", char_upcase),
    simple_primitive!("char-downcase", char_downcase),
    simple_primitive!("char=?", char_equal_p),
    simple_primitive!("char<?", char_less_than_p),
    simple_primitive!("char>?", char_greater_than_p),
    simple_primitive!("char<=?", char_less_than_equal_p),
    simple_primitive!("char>=?", char_greater_than_equal_p),
    simple_primitive!("char-ci=?", char_ci_equal_p),
    simple_primitive!("char-ci<?", char_ci_less_than_p),
    simple_primitive!("char-ci>?", char_ci_greater_than_p),
    simple_primitive!("char-ci<=?", char_ci_less_than_equal_p),
    simple_primitive!("char-ci>=?", char_ci_greater_than_equal_p),
    simple_primitive!("string?", string_p),
    simple_primitive!("string-length", string_length),
    simple_primitive!("string-append", string_append),
    simple_primitive!("string=?", string_equal_p),
    simple_primitive!("string<?", string_less_than_p),
    simple_primitive!("string>?", string_greater_than_p),
    simple_primitive!("string<=?", string_less_than_equal_p),
    simple_primitive!("string>=?", string_greater_than_equal_p),
    simple_primitive!("string-ci=?", string_ci_equal_p),
    simple_primitive!("string-ci<?", string_ci_less_than_p),
    simple_primitive!("string-ci>?", string_ci_greater_than_p),
    simple_primitive!("string-ci<=?", string_ci_less_than_equal_p),
    simple_primitive!("string-ci>=?", string_ci_greater_than_equal_p),
    simple_primitive!("display", display),
    simple_primitive!("write", write),
    simple_primitive!("newline", newline),
    simple_primitive!("apply", apply),
    simple_primitive!("map", map),
    simple_primitive!("for-each", for_each),
];

pub struct Primitive {
    pub name: &'static str,
    pub implementation: fn(&[Value]) -> Result<Value, Error>,
}

impl Debug for Primitive {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        write!(f, "primitive {}", self.name)
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Primitive) -> bool {
        self.name == other.name
    }
}

pub fn register_primitives(global_environment: &RcEnv) {
    let mut borrowed_env = global_environment.borrow_mut();
    for prim in PRIMITIVES.iter() {
        borrowed_env.define(prim.name, Value::Primitive(prim));
    }
    debug!("Registered {} primitives.", PRIMITIVES.len());
}
