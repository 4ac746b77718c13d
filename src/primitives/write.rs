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

//! Output to stdout. There are no port objects, so these take no port argument.

use std::io::{self, Write};

use error::Error;
use util::check_len;
use value::Value;

fn emit(s: &str) -> Result<Value, Error> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(s.as_bytes())
        .and_then(|_| handle.flush())
        .map_err(|e| Error::User(format!("cannot write to stdout: {}", e)))?;
    Ok(Value::Unspecific)
}

pub fn display(args: &[Value]) -> Result<Value, Error> {
    check_len("display", args, Some(1), Some(1))?;
    emit(&args[0].display_string())
}

pub fn write(args: &[Value]) -> Result<Value, Error> {
    check_len("write", args, Some(1), Some(1))?;
    emit(&args[0].to_string())
}

pub fn newline(args: &[Value]) -> Result<Value, Error> {
    check_len("newline", args, Some(0), Some(0))?;
    emit("\n")
}
