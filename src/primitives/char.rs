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

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use error::Error;
use util::check_len;
use value::Value;

fn get_char(v: &Value) -> Result<char, Error> {
    match v {
        Value::Character(c) => Ok(*c),
        _ => Err(Error::wrong_type("character", v.to_string())),
    }
}

fn get_char_arg(args: &[Value], prim_name: &str) -> Result<char, Error> {
    check_len(prim_name, args, Some(1), Some(1))?;
    get_char(&args[0])
}

pub fn char_p(args: &[Value]) -> Result<Value, Error> {
    check_len("char?", args, Some(1), Some(1))?;
    Ok(Value::Boolean(match &args[0] {
        Value::Character(_) => true,
        _ => false,
    }))
}

pub fn char_to_integer(args: &[Value]) -> Result<Value, Error> {
    let arg = get_char_arg(args, "char->integer")?;
    Ok(Value::Integer(BigInt::from(u32::from(arg))))
}

pub fn integer_to_char(args: &[Value]) -> Result<Value, Error> {
    check_len("integer->char", args, Some(1), Some(1))?;
    let int = match &args[0] {
        Value::Integer(i) => i,
        v => return Err(Error::wrong_type("integer", v.to_string())),
    };
    int.to_u32()
        .and_then(std::char::from_u32)
        .map(Value::Character)
        .ok_or_else(|| Error::out_of_range(int, "0x10FFFF"))
}

// The following methods could be implemented in a library, but they're annoying to implement for
// Unicode values, so we have them as primitives to leverage Rust's Unicode support.

pub fn char_alphabetic_p(args: &[Value]) -> Result<Value, Error> {
    let arg = get_char_arg(args, "char-alphabetic?")?;
    Ok(Value::Boolean(arg.is_alphabetic()))
}

pub fn char_numeric_p(args: &[Value]) -> Result<Value, Error> {
    let arg = get_char_arg(args, "char-numeric?")?;
    Ok(Value::Boolean(arg.is_numeric()))
}

pub fn char_whitespace_p(args: &[Value]) -> Result<Value, Error> {
    let arg = get_char_arg(args, "char-whitespace?")?;
    Ok(Value::Boolean(arg.is_whitespace()))
}

pub fn char_upper_case_p(args: &[Value]) -> Result<Value, Error> {
    let arg = get_char_arg(args, "char-upper-case?")?;
    Ok(Value::Boolean(arg.is_uppercase()))
}

pub fn char_lower_case_p(args: &[Value]) -> Result<Value, Error> {
    let arg = get_char_arg(args, "char-lower-case?")?;
    Ok(Value::Boolean(arg.is_lowercase()))
}

// Upper and lower case forms of some characters are strings, so only ASCII is converted.

pub fn char_upcase(args: &[Value]) -> Result<Value, Error> {
    let arg = get_char_arg(args, "char-upcase")?;
    Ok(Value::Character(arg.to_ascii_uppercase()))
}

pub fn char_downcase(args: &[Value]) -> Result<Value, Error> {
    let arg = get_char_arg(args, "char-downcase")?;
    Ok(Value::Character(arg.to_ascii_lowercase()))
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

macro_rules! char_comparison {
    ($name:ident, $prim_name:expr, $op:tt) => {
        char_comparison!($name, $prim_name, $op, |c| c);
    };
    ($name:ident, $prim_name:expr, $op:tt, $fold:expr) => {
        pub fn $name(args: &[Value]) -> Result<Value, Error> {
            check_len($prim_name, args, Some(2), None)?;
            let chars = args
                .iter()
                .map(|a| get_char(a).map($fold))
                .collect::<Result<Vec<char>, _>>()?;
            Ok(Value::Boolean(chars.windows(2).all(|w| w[0] $op w[1])))
        }
    };
}

char_comparison!(char_equal_p, "char=?", ==);
char_comparison!(char_less_than_p, "char<?", <);
char_comparison!(char_greater_than_p, "char>?", >);
char_comparison!(char_less_than_equal_p, "char<=?", <=);
char_comparison!(char_greater_than_equal_p, "char>=?", >=);

char_comparison!(char_ci_equal_p, "char-ci=?", ==, fold_case);
char_comparison!(char_ci_less_than_p, "char-ci<?", <, fold_case);
char_comparison!(char_ci_greater_than_p, "char-ci>?", >, fold_case);
char_comparison!(char_ci_less_than_equal_p, "char-ci<=?", <=, fold_case);
char_comparison!(char_ci_greater_than_equal_p, "char-ci>=?", >=, fold_case);
