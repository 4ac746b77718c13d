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

//! The numeric tower: integer ⊂ rational ⊂ real ⊂ complex.
//!
//! Number literals are recognized here (the lexer asks [`is_number_literal`]) and turned into
//! values by [`parse_number`]. Once a value exists, its class only depends on which `Value`
//! variant holds it, never on how it was spelled.

use num_bigint::BigInt;
use num_complex::Complex;
use num_rational::BigRational;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use regex::Regex;

use error::{SyntaxError, SyntaxErrorKind};
use util::rational_to_float;
use value::Value;

const REAL_PAT: &str = r"(?:(?:[1-9][0-9]*)|0)(?:\.[0-9]+)?";

static INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:(?:[1-9][0-9]*)|0)$").expect("Error compiling regex."));
static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:(?:[1-9][0-9]*)|0)\.[0-9]+$").expect("Error compiling regex.")
});
static RATIONAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^([+-]?{r})/({r})$", r = REAL_PAT)).expect("Error compiling regex.")
});
// Covers both `a+bi` and the pure imaginary `+bi` / `-i`; a missing real part means the sign
// is mandatory.
static COMPLEX: Lazy<Regex> = Lazy::new(|| {
    let part = format!(r"(?:{r}/{r}|{r})", r = REAL_PAT);
    Regex::new(&format!(r"^(?:([+-]?{p})([+-])|([+-]))({p})?i$", p = part))
        .expect("Error compiling regex.")
});

/// The four levels of the tower, ordered from the innermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NumericClass {
    Integer,
    Rational,
    Real,
    Complex,
}

impl NumericClass {
    /// True if every number of class `self` also belongs to `other`.
    pub fn is_a(self, other: NumericClass) -> bool {
        self <= other
    }
}

/// Returns the class of a numeric value, or `None` for non-numbers.
pub fn classify(v: &Value) -> Option<NumericClass> {
    match v {
        Value::Integer(_) => Some(NumericClass::Integer),
        Value::Rational(_) => Some(NumericClass::Rational),
        Value::Real(_) => Some(NumericClass::Real),
        Value::Complex(_) => Some(NumericClass::Complex),
        _ => None,
    }
}

/// Returns the class a literal spells, or `None` if it is not a number literal at all.
pub fn literal_class(literal: &str) -> Option<NumericClass> {
    if INTEGER.is_match(literal) {
        Some(NumericClass::Integer)
    } else if DECIMAL.is_match(literal) {
        Some(NumericClass::Real)
    } else if RATIONAL.is_match(literal) {
        Some(NumericClass::Rational)
    } else if COMPLEX.is_match(literal) {
        Some(NumericClass::Complex)
    } else {
        None
    }
}

pub fn is_number_literal(literal: &str) -> bool {
    literal_class(literal).is_some()
}

/// Builds the value denoted by a number literal.
pub fn parse_number(literal: &str) -> Result<Value, SyntaxError> {
    let invalid = || SyntaxError::new(SyntaxErrorKind::InvalidLiteral, literal);
    match literal_class(literal) {
        Some(NumericClass::Integer) => literal
            .trim_start_matches('+')
            .parse::<BigInt>()
            .map(Value::Integer)
            .map_err(|_| invalid()),
        Some(NumericClass::Real) => literal
            .parse::<f64>()
            .map(Value::Real)
            .map_err(|_| invalid()),
        Some(NumericClass::Rational) => {
            let caps = RATIONAL.captures(literal).ok_or_else(invalid)?;
            let numer = parse_exact(&caps[1]).ok_or_else(invalid)?;
            let denom = parse_exact(&caps[2]).ok_or_else(invalid)?;
            if denom.is_zero() {
                return Err(invalid());
            }
            Ok(simplify_rational(numer / denom))
        }
        Some(NumericClass::Complex) => {
            let caps = COMPLEX.captures(literal).ok_or_else(invalid)?;
            let re = match caps.get(1) {
                Some(m) => parse_inexact(m.as_str()).ok_or_else(invalid)?,
                None => 0.0,
            };
            let sign = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map_or("+", |m| m.as_str());
            let magnitude = match caps.get(4) {
                Some(m) => parse_inexact(m.as_str()).ok_or_else(invalid)?,
                None => 1.0,
            };
            let im = if sign == "-" { -magnitude } else { magnitude };
            Ok(Value::Complex(Box::new(Complex::new(re, im))))
        }
        None => Err(invalid()),
    }
}

/// Reads a signed decimal (`-1.25`) as an exact rational.
fn parse_exact(s: &str) -> Option<BigRational> {
    let (negative, digits) = match s.chars().next() {
        Some('-') => (true, &s[1..]),
        Some('+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or("0");
    let frac = parts.next().unwrap_or("");
    let numer: BigInt = format!("{}{}", whole, frac).parse().ok()?;
    let denom = num_traits::pow(BigInt::from(10), frac.len());
    let r = BigRational::new(numer, denom);
    Some(if negative { -r } else { r })
}

fn parse_inexact(s: &str) -> Option<f64> {
    if s.contains('/') {
        let mut parts = s.splitn(2, '/');
        let numer = parse_exact(parts.next()?)?;
        let denom = parse_exact(parts.next()?)?;
        if denom.is_zero() {
            return None;
        }
        Some(rational_to_float(&(numer / denom)))
    } else {
        s.parse::<f64>().ok()
    }
}

/// Exact rationals with a unit denominator are integers.
pub fn simplify_rational(r: BigRational) -> Value {
    if r.denom().is_one() {
        Value::Integer(r.to_integer())
    } else {
        Value::Rational(Box::new(r))
    }
}

/// Complex values with a zero imaginary part are reals.
pub fn simplify_complex(c: Complex<f64>) -> Value {
    if c.im == 0.0 {
        Value::Real(c.re)
    } else {
        Value::Complex(Box::new(c))
    }
}
