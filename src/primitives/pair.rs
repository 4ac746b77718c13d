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

use error::Error;
use primitives::object::{eqv, is_eq};
use util::{check_len, get_bounded_index, get_index};
use value::{is_list, list_from_vec, list_from_vec_with_tail, vec_from_list, Value};

pub fn pair_p(args: &[Value]) -> Result<Value, Error> {
    check_len("pair?", args, Some(1), Some(1))?;
    Ok(Value::Boolean(match &args[0] {
        Value::Pair(_) => true,
        _ => false,
    }))
}

pub fn cons(args: &[Value]) -> Result<Value, Error> {
    check_len("cons", args, Some(2), Some(2))?;
    Ok(Value::cons(args[0].clone(), args[1].clone()))
}

pub fn car(args: &[Value]) -> Result<Value, Error> {
    check_len("car", args, Some(1), Some(1))?;
    Ok(args[0].as_pair()?.car())
}

pub fn cdr(args: &[Value]) -> Result<Value, Error> {
    check_len("cdr", args, Some(1), Some(1))?;
    Ok(args[0].as_pair()?.cdr())
}

pub fn set_car_b(args: &[Value]) -> Result<Value, Error> {
    check_len("set-car!", args, Some(2), Some(2))?;
    args[0].as_pair()?.set_car(args[1].clone());
    Ok(Value::Unspecific)
}

pub fn set_cdr_b(args: &[Value]) -> Result<Value, Error> {
    check_len("set-cdr!", args, Some(2), Some(2))?;
    args[0].as_pair()?.set_cdr(args[1].clone());
    Ok(Value::Unspecific)
}

macro_rules! composed_accessor {
    ($name:ident, $prim_name:expr, $first:ident, $second:ident) => {
        pub fn $name(args: &[Value]) -> Result<Value, Error> {
            check_len($prim_name, args, Some(1), Some(1))?;
            let inner = args[0].as_pair()?.$second();
            let outer = inner.as_pair()?.$first();
            Ok(outer)
        }
    };
}

composed_accessor!(caar, "caar", car, car);
composed_accessor!(cadr, "cadr", car, cdr);
composed_accessor!(cdar, "cdar", cdr, car);
composed_accessor!(cddr, "cddr", cdr, cdr);

pub fn null_p(args: &[Value]) -> Result<Value, Error> {
    check_len("null?", args, Some(1), Some(1))?;
    Ok(Value::Boolean(args[0] == Value::EmptyList))
}

pub fn list_p(args: &[Value]) -> Result<Value, Error> {
    check_len("list?", args, Some(1), Some(1))?;
    Ok(Value::Boolean(is_list(&args[0])))
}

pub fn list(args: &[Value]) -> Result<Value, Error> {
    Ok(list_from_vec(args.to_vec()))
}

pub fn make_list(args: &[Value]) -> Result<Value, Error> {
    check_len("make-list", args, Some(1), Some(2))?;
    let k = get_index(&args[0])?;
    let fill = args.get(1).cloned().unwrap_or(Value::Unspecific);
    Ok(list_from_vec(vec![fill; k]))
}

pub fn length(args: &[Value]) -> Result<Value, Error> {
    check_len("length", args, Some(1), Some(1))?;
    let len = vec_from_list(&args[0])?.len();
    Ok(Value::Integer(len.into()))
}

/// Every argument must be a proper list; the result shares the last one.
pub fn append(args: &[Value]) -> Result<Value, Error> {
    let (last, init) = match args.split_last() {
        Some(split) => split,
        None => return Ok(Value::EmptyList),
    };
    if !is_list(last) {
        return Err(Error::wrong_type("list", last.to_string()));
    }
    let mut head = Vec::new();
    for arg in init.iter() {
        head.extend(vec_from_list(arg)?);
    }
    Ok(list_from_vec_with_tail(head, last.clone()))
}

pub fn reverse(args: &[Value]) -> Result<Value, Error> {
    check_len("reverse", args, Some(1), Some(1))?;
    let mut vals = vec_from_list(&args[0])?;
    vals.reverse();
    Ok(list_from_vec(vals))
}

pub fn list_tail(args: &[Value]) -> Result<Value, Error> {
    check_len("list-tail", args, Some(2), Some(2))?;
    let len = vec_from_list(&args[0])?.len();
    let k = get_bounded_index(&args[1], len, true)?;
    let mut current = args[0].clone();
    for _ in 0..k {
        current = current.as_pair()?.cdr();
    }
    Ok(current)
}

pub fn list_ref(args: &[Value]) -> Result<Value, Error> {
    check_len("list-ref", args, Some(2), Some(2))?;
    let vals = vec_from_list(&args[0])?;
    let k = get_bounded_index(&args[1], vals.len(), false)?;
    Ok(vals[k].clone())
}

pub fn list_copy(args: &[Value]) -> Result<Value, Error> {
    check_len("list-copy", args, Some(1), Some(1))?;
    match &args[0] {
        Value::Pair(_) | Value::EmptyList => Ok(list_from_vec(vec_from_list(&args[0])?)),
        v => Ok(v.clone()),
    }
}

fn find_member<F>(name: &str, args: &[Value], same: F) -> Result<Value, Error>
where
    F: Fn(&Value, &Value) -> bool,
{
    check_len(name, args, Some(2), Some(2))?;
    let mut current = args[1].clone();
    loop {
        current = match current {
            Value::Pair(ref p) if same(&args[0], &p.car()) => return Ok(current.clone()),
            Value::Pair(p) => p.cdr(),
            Value::EmptyList => return Ok(Value::Boolean(false)),
            _ => return Err(Error::wrong_type("list", args[1].to_string())),
        };
    }
}

pub fn memq(args: &[Value]) -> Result<Value, Error> {
    find_member("memq", args, is_eq)
}

pub fn memv(args: &[Value]) -> Result<Value, Error> {
    find_member("memv", args, eqv)
}

pub fn member(args: &[Value]) -> Result<Value, Error> {
    find_member("member", args, |a, b| a == b)
}

fn find_association<F>(name: &str, args: &[Value], same: F) -> Result<Value, Error>
where
    F: Fn(&Value, &Value) -> bool,
{
    check_len(name, args, Some(2), Some(2))?;
    for entry in vec_from_list(&args[1])? {
        if same(&args[0], &entry.as_pair()?.car()) {
            return Ok(entry);
        }
    }
    Ok(Value::Boolean(false))
}

pub fn assq(args: &[Value]) -> Result<Value, Error> {
    find_association("assq", args, is_eq)
}

pub fn assv(args: &[Value]) -> Result<Value, Error> {
    find_association("assv", args, eqv)
}

pub fn assoc(args: &[Value]) -> Result<Value, Error> {
    find_association("assoc", args, |a, b| a == b)
}
