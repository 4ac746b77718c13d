// Copyright 2018-2019 Matthieu Felix
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
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};

use error::Error;
use value::Value;

/// Checks that an argument slice has at least `min`, at most `max` entries.
pub fn check_len<T>(name: &str, v: &[T], min: Option<usize>, max: Option<usize>) -> Result<(), Error> {
    let too_few = min.map_or(false, |m| v.len() < m);
    let too_many = max.map_or(false, |m| v.len() > m);
    if !too_few && !too_many {
        return Ok(());
    }
    let expected = match (min, max) {
        (Some(a), Some(b)) if a == b => a.to_string(),
        (Some(a), Some(b)) => format!("{} to {}", a, b),
        (Some(a), None) => format!("at least {}", a),
        (_, Some(b)) => format!("at most {}", b),
        (None, None) => "any number".to_string(),
    };
    Err(Error::Arity {
        name: name.to_string(),
        expected,
        got: v.len(),
    })
}

/// Reads a non-negative exact integer argument for use as an index or count.
pub fn get_index(v: &Value) -> Result<usize, Error> {
    match v {
        Value::Integer(i) if i.is_negative() => Err(Error::out_of_range(i, 0)),
        Value::Integer(i) => i.to_usize().ok_or_else(|| Error::out_of_range(i, usize::max_value())),
        _ => Err(Error::wrong_type("integer", v.to_string())),
    }
}

/// Reads an index into a target of length `limit`: `k < limit`, or `k <= limit` when
/// `inclusive`. Range errors report `limit`, negative indices included.
pub fn get_bounded_index(v: &Value, limit: usize, inclusive: bool) -> Result<usize, Error> {
    let i = match v {
        Value::Integer(i) => i,
        _ => return Err(Error::wrong_type("integer", v.to_string())),
    };
    match i.to_usize() {
        Some(k) if k < limit || (inclusive && k == limit) => Ok(k),
        _ => Err(Error::out_of_range(i, limit)),
    }
}

/// Makes sure that `start <= end <= limit`.
pub fn check_limits(start: usize, end: usize, limit: usize) -> Result<(), Error> {
    if end > limit {
        Err(Error::out_of_range(end, limit))
    } else if start > end {
        Err(Error::out_of_range(start, end))
    } else {
        Ok(())
    }
}

pub fn escape_char(c: char) -> String {
    match c {
        '\x07' => "alarm".into(),
        '\x08' => "backspace".into(),
        '\x7F' => "delete".into(),
        '\x1B' => "escape".into(),
        '\n' => "newline".into(),
        '\0' => "null".into(),
        '\r' => "return".into(),
        ' ' => "space".into(),
        '\t' => "tab".into(),
        c => c.to_string(),
    }
}

pub fn escape_string(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\x07' => output.push_str("\\a"),
            '\x08' => output.push_str("\\b"),
            '\t' => output.push_str("\\t"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            _ => output.push(c),
        }
    }
    output
}

/// Turns the body of a string literal (without its quotes) into the string it denotes.
/// Unknown escapes keep the escaped character.
pub fn unescape_string(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    let mut escaped = false;
    for c in s.chars() {
        if escaped {
            output.push(match c {
                'a' => '\x07',
                'b' => '\x08',
                't' => '\t',
                'n' => '\n',
                'r' => '\r',
                c => c,
            });
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            output.push(c);
        }
    }
    output
}

// TODO these can lose everything for rationals whose parts overflow f64. Divide both sides
//      down first once num-rational grows a native conversion.
pub fn rational_to_float(v: &BigRational) -> f64 {
    integer_to_float(v.numer()) / integer_to_float(v.denom())
}

pub fn integer_to_float(v: &BigInt) -> f64 {
    v.to_f64().unwrap_or_else(|| {
        if v.is_positive() {
            std::f64::INFINITY
        } else {
            std::f64::NEG_INFINITY
        }
    })
}
