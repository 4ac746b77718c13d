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

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_complex::Complex;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use error::Error;
use number::{classify, simplify_complex, simplify_rational, NumericClass};
use util::{check_len, integer_to_float, rational_to_float};
use value::Value;

/// Generates a numeric primitive that folds its arguments with a binary operation, starting
/// from a fixed initial value.
macro_rules! prim_fold_0 {
    ($name:ident, $folder:ident, $initial:expr) => {
        pub fn $name(args: &[Value]) -> Result<Value, Error> {
            let values = numeric_vec(args)?;
            values.iter().try_fold($initial, |a, b| $folder(&a, b))
        }
    };
}

prim_fold_0!(add, add2, Value::Integer(BigInt::zero()));
fn add2(a: &Value, b: &Value) -> Result<Value, Error> {
    Ok(match cast_same(a, b)? {
        Same::Integer(x, y) => Value::Integer(x + y),
        Same::Rational(x, y) => simplify_rational(x + y),
        Same::Real(x, y) => Value::Real(x + y),
        Same::Complex(x, y) => simplify_complex(x + y),
    })
}

prim_fold_0!(mul, mul2, Value::Integer(BigInt::from(1)));
fn mul2(a: &Value, b: &Value) -> Result<Value, Error> {
    Ok(match cast_same(a, b)? {
        Same::Integer(x, y) => Value::Integer(x * y),
        Same::Rational(x, y) => simplify_rational(x * y),
        Same::Real(x, y) => Value::Real(x * y),
        Same::Complex(x, y) => simplify_complex(x * y),
    })
}

/// Like [prim_fold_0], but uses the first argument as the fold initializer. With a single
/// argument, folds it into `$identity` instead, so `(- x)` negates and `(/ x)` inverts.
macro_rules! prim_fold_1 {
    ($name:ident, $prim_name:expr, $folder:ident, $identity:expr) => {
        pub fn $name(args: &[Value]) -> Result<Value, Error> {
            check_len($prim_name, args, Some(1), None)?;
            let values = numeric_vec(args)?;
            if values.len() == 1 {
                return $folder(&$identity, &values[0]);
            }
            values[1..]
                .iter()
                .try_fold(values[0].clone(), |a, b| $folder(&a, b))
        }
    };
}

prim_fold_1!(sub, "-", sub2, Value::Integer(BigInt::zero()));
fn sub2(a: &Value, b: &Value) -> Result<Value, Error> {
    Ok(match cast_same(a, b)? {
        Same::Integer(x, y) => Value::Integer(x - y),
        Same::Rational(x, y) => simplify_rational(x - y),
        Same::Real(x, y) => Value::Real(x - y),
        Same::Complex(x, y) => simplify_complex(x - y),
    })
}

prim_fold_1!(div, "/", div2, Value::Integer(BigInt::from(1)));
fn div2(a: &Value, b: &Value) -> Result<Value, Error> {
    Ok(match cast_same(a, b)? {
        Same::Integer(_, ref y) if y.is_zero() => return Err(Error::DivisionByZero),
        Same::Integer(x, y) => simplify_rational(BigRational::new(x, y)),
        Same::Rational(_, ref y) if y.is_zero() => return Err(Error::DivisionByZero),
        Same::Rational(x, y) => simplify_rational(x / y),
        Same::Real(x, y) => Value::Real(x / y),
        Same::Complex(x, y) => simplify_complex(x / y),
    })
}

/// Generates a comparison primitive over reals that checks `$accept` on each adjacent pair.
macro_rules! prim_monotonic {
    ($name:ident, $prim_name:expr, $accept:expr) => {
        pub fn $name(args: &[Value]) -> Result<Value, Error> {
            check_len($prim_name, args, Some(2), None)?;
            let values = real_vec(args)?;
            let mut ans = true;
            for w in values.windows(2) {
                match compare(&w[0], &w[1])? {
                    Some(o) if ($accept)(o) => (),
                    _ => ans = false,
                }
            }
            Ok(Value::Boolean(ans))
        }
    };
}

prim_monotonic!(less_than, "<", |o| o == Ordering::Less);
prim_monotonic!(greater_than, ">", |o| o == Ordering::Greater);
prim_monotonic!(less_than_equal, "<=", |o| o != Ordering::Greater);
prim_monotonic!(greater_than_equal, ">=", |o| o != Ordering::Less);

/// `=` is the only comparison defined on complex numbers.
pub fn equal(args: &[Value]) -> Result<Value, Error> {
    check_len("=", args, Some(2), None)?;
    let values = numeric_vec(args)?;
    let mut ans = true;
    for w in values.windows(2) {
        if !equal2(&w[0], &w[1])? {
            ans = false;
        }
    }
    Ok(Value::Boolean(ans))
}

fn equal2(a: &Value, b: &Value) -> Result<bool, Error> {
    Ok(match cast_same(a, b)? {
        Same::Integer(x, y) => x == y,
        Same::Rational(x, y) => x == y,
        Same::Real(x, y) => x == y,
        Same::Complex(x, y) => x == y,
    })
}

fn compare(a: &Value, b: &Value) -> Result<Option<Ordering>, Error> {
    match cast_same(a, b)? {
        Same::Integer(x, y) => Ok(Some(x.cmp(&y))),
        Same::Rational(x, y) => Ok(Some(x.cmp(&y))),
        Same::Real(x, y) => Ok(x.partial_cmp(&y)),
        Same::Complex(..) => Err(Error::wrong_type("real", a.to_string())),
    }
}

macro_rules! integer_division {
    ($name:ident, $prim_name:expr, $op:expr) => {
        pub fn $name(args: &[Value]) -> Result<Value, Error> {
            check_len($prim_name, args, Some(2), Some(2))?;
            let a = get_integer(&args[0])?;
            let b = get_integer(&args[1])?;
            if b.is_zero() {
                return Err(Error::DivisionByZero);
            }
            Ok(Value::Integer(($op)(a, b)))
        }
    };
}

integer_division!(modulo, "modulo", |a: &BigInt, b: &BigInt| a.mod_floor(b));
integer_division!(quotient, "quotient", |a: &BigInt, b: &BigInt| a / b);
integer_division!(remainder, "remainder", |a: &BigInt, b: &BigInt| a % b);

pub fn abs(args: &[Value]) -> Result<Value, Error> {
    check_len("abs", args, Some(1), Some(1))?;
    match &args[0] {
        Value::Integer(i) => Ok(Value::Integer(i.abs())),
        Value::Rational(r) => Ok(Value::Rational(Box::new(r.abs()))),
        Value::Real(r) => Ok(Value::Real(r.abs())),
        v => Err(Error::wrong_type("real", v.to_string())),
    }
}

fn extremum(name: &str, args: &[Value], wanted: Ordering) -> Result<Value, Error> {
    check_len(name, args, Some(1), None)?;
    let values = real_vec(args)?;
    let mut best = values[0].clone();
    for v in values[1..].iter() {
        if compare(v, &best)? == Some(wanted) {
            best = v.clone();
        }
    }
    // Inexactness is contagious.
    if values.iter().any(|v| classify(v) == Some(NumericClass::Real)) {
        best = Value::Real(to_f64(&best));
    }
    Ok(best)
}

pub fn min(args: &[Value]) -> Result<Value, Error> {
    extremum("min", args, Ordering::Less)
}

pub fn max(args: &[Value]) -> Result<Value, Error> {
    extremum("max", args, Ordering::Greater)
}

pub fn zero_p(args: &[Value]) -> Result<Value, Error> {
    check_len("zero?", args, Some(1), Some(1))?;
    let ans = match &args[0] {
        Value::Integer(i) => i.is_zero(),
        Value::Rational(r) => r.is_zero(),
        Value::Real(r) => *r == 0.0,
        Value::Complex(c) => c.is_zero(),
        v => return Err(Error::wrong_type("number", v.to_string())),
    };
    Ok(Value::Boolean(ans))
}

fn sign(name: &str, args: &[Value]) -> Result<Option<Ordering>, Error> {
    check_len(name, args, Some(1), Some(1))?;
    let v = real_vec(args)?;
    compare(&v[0], &Value::Integer(BigInt::zero()))
}

pub fn positive_p(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Boolean(
        sign("positive?", args)? == Some(Ordering::Greater),
    ))
}

pub fn negative_p(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Boolean(sign("negative?", args)? == Some(Ordering::Less)))
}

pub fn odd_p(args: &[Value]) -> Result<Value, Error> {
    check_len("odd?", args, Some(1), Some(1))?;
    Ok(Value::Boolean(get_integer(&args[0])?.is_odd()))
}

pub fn even_p(args: &[Value]) -> Result<Value, Error> {
    check_len("even?", args, Some(1), Some(1))?;
    Ok(Value::Boolean(get_integer(&args[0])?.is_even()))
}

macro_rules! class_predicate {
    ($name:ident, $prim_name:expr, $class:expr) => {
        pub fn $name(args: &[Value]) -> Result<Value, Error> {
            check_len($prim_name, args, Some(1), Some(1))?;
            Ok(Value::Boolean(
                classify(&args[0]).map_or(false, |c| c.is_a($class)),
            ))
        }
    };
}

class_predicate!(number_p, "number?", NumericClass::Complex);
class_predicate!(complex_p, "complex?", NumericClass::Complex);
class_predicate!(real_p, "real?", NumericClass::Real);
class_predicate!(rational_p, "rational?", NumericClass::Rational);
class_predicate!(integer_p, "integer?", NumericClass::Integer);

pub fn exact_p(args: &[Value]) -> Result<Value, Error> {
    check_len("exact?", args, Some(1), Some(1))?;
    match classify(&args[0]) {
        Some(c) => Ok(Value::Boolean(c.is_a(NumericClass::Rational))),
        None => Err(Error::wrong_type("number", args[0].to_string())),
    }
}

pub fn inexact_p(args: &[Value]) -> Result<Value, Error> {
    check_len("inexact?", args, Some(1), Some(1))?;
    match classify(&args[0]) {
        Some(c) => Ok(Value::Boolean(!c.is_a(NumericClass::Rational))),
        None => Err(Error::wrong_type("number", args[0].to_string())),
    }
}

/// Two numbers raised to the level of the higher one.
enum Same {
    Integer(BigInt, BigInt),
    Rational(BigRational, BigRational),
    Real(f64, f64),
    Complex(Complex<f64>, Complex<f64>),
}

fn cast_same(a: &Value, b: &Value) -> Result<Same, Error> {
    let class = match (classify(a), classify(b)) {
        (Some(ca), Some(cb)) => ca.max(cb),
        (None, _) => return Err(Error::wrong_type("number", a.to_string())),
        (_, None) => return Err(Error::wrong_type("number", b.to_string())),
    };
    Ok(match class {
        NumericClass::Integer => match (a, b) {
            (Value::Integer(x), Value::Integer(y)) => Same::Integer(x.clone(), y.clone()),
            _ => return Err(Error::wrong_type("integer", a.to_string())),
        },
        NumericClass::Rational => Same::Rational(to_rational(a)?, to_rational(b)?),
        NumericClass::Real => Same::Real(to_f64(a), to_f64(b)),
        NumericClass::Complex => Same::Complex(to_complex(a), to_complex(b)),
    })
}

fn to_rational(v: &Value) -> Result<BigRational, Error> {
    match v {
        Value::Integer(i) => Ok(BigRational::from_integer(i.clone())),
        Value::Rational(r) => Ok((**r).clone()),
        _ => Err(Error::wrong_type("rational", v.to_string())),
    }
}

fn to_f64(v: &Value) -> f64 {
    match v {
        Value::Integer(i) => integer_to_float(i),
        Value::Rational(r) => rational_to_float(r),
        Value::Real(r) => *r,
        Value::Complex(c) => c.re,
        _ => std::f64::NAN,
    }
}

fn to_complex(v: &Value) -> Complex<f64> {
    match v {
        Value::Complex(c) => **c,
        _ => Complex::new(to_f64(v), 0.0),
    }
}

fn get_integer(v: &Value) -> Result<&BigInt, Error> {
    match v {
        Value::Integer(i) => Ok(i),
        _ => Err(Error::wrong_type("integer", v.to_string())),
    }
}

fn numeric_vec(args: &[Value]) -> Result<Vec<Value>, Error> {
    args.iter()
        .map(|v| match classify(v) {
            Some(_) => Ok(v.clone()),
            None => Err(Error::wrong_type("number", v.to_string())),
        })
        .collect()
}

fn real_vec(args: &[Value]) -> Result<Vec<Value>, Error> {
    args.iter()
        .map(|v| match classify(v) {
            Some(c) if c.is_a(NumericClass::Real) => Ok(v.clone()),
            _ => Err(Error::wrong_type("real", v.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Value {
        Value::Integer(BigInt::from(i))
    }

    fn rat(n: i64, d: i64) -> Value {
        Value::Rational(Box::new(BigRational::new(n.into(), d.into())))
    }

    #[test]
    fn folds() {
        assert_eq!(Ok(int(0)), add(&[]));
        assert_eq!(Ok(int(6)), add(&[int(1), int(2), int(3)]));
        assert_eq!(Ok(int(24)), mul(&[int(2), int(3), int(4)]));
        assert_eq!(Ok(int(-5)), sub(&[int(5)]));
        assert_eq!(Ok(int(1)), sub(&[int(10), int(4), int(5)]));
        assert!(sub(&[]).is_err());
    }

    #[test]
    fn promotion() {
        assert_eq!(Ok(Value::Real(3.5)), add(&[int(1), Value::Real(2.5)]));
        assert_eq!(Ok(rat(5, 6)), add(&[rat(1, 2), rat(1, 3)]));
        assert_eq!(Ok(int(1)), add(&[rat(1, 2), rat(1, 2)]));
        assert_eq!(Ok(Value::Real(0.75)), add(&[rat(1, 4), Value::Real(0.5)]));
        assert_eq!(
            Ok(Value::Complex(Box::new(Complex::new(2.0, 1.0)))),
            add(&[int(1), Value::Complex(Box::new(Complex::new(1.0, 1.0)))])
        );
    }

    #[test]
    fn exact_division() {
        assert_eq!(Ok(rat(1, 2)), div(&[int(1), int(2)]));
        assert_eq!(Ok(int(3)), div(&[int(6), int(2)]));
        assert_eq!(Ok(rat(1, 4)), div(&[int(4)]));
        assert_eq!(Err(Error::DivisionByZero), div(&[int(1), int(0)]));
        assert_eq!(Ok(Value::Real(0.5)), div(&[Value::Real(1.0), int(2)]));
    }

    #[test]
    fn integer_ops() {
        assert_eq!(Ok(int(2)), modulo(&[int(-7), int(3)]));
        assert_eq!(Ok(int(-1)), remainder(&[int(-7), int(3)]));
        assert_eq!(Ok(int(-2)), quotient(&[int(-7), int(3)]));
        assert_eq!(Err(Error::DivisionByZero), modulo(&[int(1), int(0)]));
        assert!(modulo(&[Value::Real(1.0), int(2)]).is_err());
    }

    #[test]
    fn comparisons() {
        assert_eq!(Ok(Value::Boolean(true)), less_than(&[int(1), int(2), int(3)]));
        assert_eq!(Ok(Value::Boolean(false)), less_than(&[int(1), int(3), int(2)]));
        assert_eq!(
            Ok(Value::Boolean(true)),
            less_than_equal(&[int(1), int(1), Value::Real(1.5)])
        );
        assert_eq!(Ok(Value::Boolean(true)), equal(&[int(1), Value::Real(1.0)]));
        assert_eq!(Ok(Value::Boolean(true)), equal(&[rat(1, 2), Value::Real(0.5)]));
        let i = Value::Complex(Box::new(Complex::new(0.0, 1.0)));
        assert_eq!(Ok(Value::Boolean(true)), equal(&[i.clone(), i.clone()]));
        assert!(less_than(&[i, int(1)]).is_err());
        assert!(less_than(&[int(1)]).is_err());
    }

    #[test]
    fn predicates() {
        assert_eq!(Ok(Value::Boolean(true)), integer_p(&[int(1)]));
        assert_eq!(Ok(Value::Boolean(false)), integer_p(&[Value::Real(2.0)]));
        assert_eq!(Ok(Value::Boolean(true)), rational_p(&[int(1)]));
        assert_eq!(Ok(Value::Boolean(true)), real_p(&[rat(1, 2)]));
        assert_eq!(Ok(Value::Boolean(false)), number_p(&[Value::string("1")]));
        assert_eq!(Ok(Value::Boolean(true)), exact_p(&[rat(1, 2)]));
        assert_eq!(Ok(Value::Boolean(true)), inexact_p(&[Value::Real(1.0)]));
        assert_eq!(Ok(Value::Boolean(true)), zero_p(&[Value::Real(0.0)]));
        assert_eq!(Ok(Value::Boolean(true)), negative_p(&[rat(-1, 2)]));
        assert_eq!(Ok(Value::Boolean(true)), odd_p(&[int(-3)]));
    }

    #[test]
    fn extrema() {
        assert_eq!(Ok(int(3)), max(&[int(1), int(3), int(2)]));
        assert_eq!(Ok(Value::Real(1.0)), min(&[int(1), Value::Real(2.0)]));
        assert_eq!(Ok(rat(1, 2)), abs(&[rat(-1, 2)]));
    }
}
