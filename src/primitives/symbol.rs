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
use util::check_len;
use value::Value;

pub fn symbol_p(args: &[Value]) -> Result<Value, Error> {
    check_len("symbol?", args, Some(1), Some(1))?;
    Ok(Value::Boolean(match &args[0] {
        Value::Symbol(_) => true,
        _ => false,
    }))
}

pub fn symbol_to_string(args: &[Value]) -> Result<Value, Error> {
    check_len("symbol->string", args, Some(1), Some(1))?;
    match &args[0] {
        Value::Symbol(s) => Ok(Value::string(s)),
        v => Err(Error::wrong_type("symbol", v.to_string())),
    }
}

pub fn string_to_symbol(args: &[Value]) -> Result<Value, Error> {
    check_len("string->symbol", args, Some(1), Some(1))?;
    match &args[0] {
        Value::String(s) => Ok(Value::Symbol(s.to_string())),
        v => Err(Error::wrong_type("string", v.to_string())),
    }
}
