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

//! Primitives that call back into the evaluator.

use error::Error;
use eval;
use util::check_len;
use value::{list_from_vec, vec_from_list, Value};

fn get_procedure(v: &Value) -> Result<&Value, Error> {
    if v.is_procedure() {
        Ok(v)
    } else {
        Err(Error::wrong_type("procedure", v.to_string()))
    }
}

/// `(apply f a b ... lst)`: the last argument is spliced in as a list.
pub fn apply(args: &[Value]) -> Result<Value, Error> {
    check_len("apply", args, Some(2), None)?;
    let f = get_procedure(&args[0])?;
    let (last, middle) = match args[1..].split_last() {
        Some(split) => split,
        None => return Err(Error::wrong_type("list", "")),
    };
    let mut call_args = middle.to_vec();
    call_args.extend(vec_from_list(last)?);
    eval::apply(f, &call_args)
}

/// Calls `f` on the i-th elements of every list, stopping at the shortest one.
fn map_lists(name: &str, args: &[Value]) -> Result<Vec<Value>, Error> {
    check_len(name, args, Some(2), None)?;
    let f = get_procedure(&args[0])?;
    let lists = args[1..]
        .iter()
        .map(vec_from_list)
        .collect::<Result<Vec<_>, _>>()?;
    let n = lists.iter().map(|l| l.len()).min().unwrap_or(0);
    let mut results = Vec::with_capacity(n);
    for i in 0..n {
        let call_args: Vec<Value> = lists.iter().map(|l| l[i].clone()).collect();
        results.push(eval::apply(f, &call_args)?);
    }
    Ok(results)
}

pub fn map(args: &[Value]) -> Result<Value, Error> {
    Ok(list_from_vec(map_lists("map", args)?))
}

pub fn for_each(args: &[Value]) -> Result<Value, Error> {
    map_lists("for-each", args)?;
    Ok(Value::Unspecific)
}
