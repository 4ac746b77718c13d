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

use num_bigint::BigInt;

use error::Error;
use util::check_len;
use value::Value;

fn get_string(v: &Value) -> Result<Rc<str>, Error> {
    match v {
        Value::String(s) => Ok(s.clone()),
        _ => Err(Error::wrong_type("string", v.to_string())),
    }
}

pub fn string_p(args: &[Value]) -> Result<Value, Error> {
    check_len("string?", args, Some(1), Some(1))?;
    Ok(Value::Boolean(match &args[0] {
        Value::String(_) => true,
        _ => false,
    }))
}

/// Length in characters, not bytes.
pub fn string_length(args: &[Value]) -> Result<Value, Error> {
    check_len("string-length", args, Some(1), Some(1))?;
    let s = get_string(&args[0])?;
    Ok(Value::Integer(BigInt::from(s.chars().count())))
}

pub fn string_append(args: &[Value]) -> Result<Value, Error> {
    let mut result = String::new();
    for arg in args.iter() {
        result.push_str(&get_string(arg)?);
    }
    Ok(Value::string(result))
}

fn fold_case(s: Rc<str>) -> Rc<str> {
    Rc::from(s.to_lowercase())
}

macro_rules! string_comparison {
    ($name:ident, $prim_name:expr, $op:tt) => {
        string_comparison!($name, $prim_name, $op, |s| s);
    };
    ($name:ident, $prim_name:expr, $op:tt, $fold:expr) => {
        pub fn $name(args: &[Value]) -> Result<Value, Error> {
            check_len($prim_name, args, Some(2), None)?;
            let strings = args
                .iter()
                .map(|a| get_string(a).map($fold))
                .collect::<Result<Vec<Rc<str>>, _>>()?;
            Ok(Value::Boolean(strings.windows(2).all(|w| w[0] $op w[1])))
        }
    };
}

string_comparison!(string_equal_p, "string=?", ==);
string_comparison!(string_less_than_p, "string<?", <);
string_comparison!(string_greater_than_p, "string>?", >);
string_comparison!(string_less_than_equal_p, "string<=?", <=);
string_comparison!(string_greater_than_equal_p, "string>=?", >=);

string_comparison!(string_ci_equal_p, "string-ci=?", ==, fold_case);
string_comparison!(string_ci_less_than_p, "string-ci<?", <, fold_case);
string_comparison!(string_ci_greater_than_p, "string-ci>?", >, fold_case);
string_comparison!(string_ci_less_than_equal_p, "string-ci<=?", <=, fold_case);
string_comparison!(string_ci_greater_than_equal_p, "string-ci>=?", >=, fold_case);
