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

use error::Error;
use util::{check_len, check_limits, get_bounded_index, get_index};
use value::{list_from_vec, vec_from_list, Value};

pub fn vector_p(args: &[Value]) -> Result<Value, Error> {
    check_len("vector?", args, Some(1), Some(1))?;
    Ok(Value::Boolean(match &args[0] {
        Value::Vector(_) => true,
        _ => false,
    }))
}

pub fn make_vector(args: &[Value]) -> Result<Value, Error> {
    check_len("make-vector", args, Some(1), Some(2))?;
    let l = get_index(&args[0])?;
    let fill = args.get(1).cloned().unwrap_or(Value::Unspecific);
    Ok(Value::vector(vec![fill; l]))
}

pub fn vector(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::vector(args.to_vec()))
}

pub fn vector_length(args: &[Value]) -> Result<Value, Error> {
    check_len("vector-length", args, Some(1), Some(1))?;
    let l = args[0].as_vector()?.borrow().len();
    Ok(Value::Integer(BigInt::from(l)))
}

pub fn vector_set_b(args: &[Value]) -> Result<Value, Error> {
    check_len("vector-set!", args, Some(3), Some(3))?;
    let vector = args[0].as_vector()?;
    let len = vector.borrow().len();
    let idx = get_bounded_index(&args[1], len, false)?;
    vector.borrow_mut()[idx] = args[2].clone();
    Ok(Value::Unspecific)
}

pub fn vector_ref(args: &[Value]) -> Result<Value, Error> {
    check_len("vector-ref", args, Some(2), Some(2))?;
    let vector = args[0].as_vector()?;
    let len = vector.borrow().len();
    let idx = get_bounded_index(&args[1], len, false)?;
    Ok(vector.borrow()[idx].clone())
}

/// Reads the optional `start` and `end` arguments found at `args[from..]`.
fn get_range(args: &[Value], from: usize, len: usize) -> Result<(usize, usize), Error> {
    let start = match args.get(from) {
        Some(v) => get_index(v)?,
        None => 0,
    };
    let end = match args.get(from + 1) {
        Some(v) => get_index(v)?,
        None => len,
    };
    check_limits(start, end, len)?;
    Ok((start, end))
}

pub fn vector_to_list(args: &[Value]) -> Result<Value, Error> {
    check_len("vector->list", args, Some(1), Some(3))?;
    let borrowed_vec = args[0].as_vector()?.borrow();
    let (start, end) = get_range(args, 1, borrowed_vec.len())?;
    Ok(list_from_vec(borrowed_vec[start..end].to_vec()))
}

pub fn list_to_vector(args: &[Value]) -> Result<Value, Error> {
    check_len("list->vector", args, Some(1), Some(1))?;
    Ok(Value::vector(vec_from_list(&args[0])?))
}

pub fn vector_fill_b(args: &[Value]) -> Result<Value, Error> {
    check_len("vector-fill!", args, Some(2), Some(4))?;
    let vector = args[0].as_vector()?;
    let len = vector.borrow().len();
    let (start, end) = get_range(args, 2, len)?;
    for cell in vector.borrow_mut()[start..end].iter_mut() {
        *cell = args[1].clone();
    }
    Ok(Value::Unspecific)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Value {
        Value::Integer(BigInt::from(i))
    }

    #[test]
    fn make_and_access() {
        let v = make_vector(&[int(3), int(0)]).unwrap();
        assert_eq!("#(0 0 0)", v.to_string());
        vector_set_b(&[v.clone(), int(1), int(7)]).unwrap();
        assert_eq!(Ok(int(7)), vector_ref(&[v.clone(), int(1)]));
        assert_eq!(Ok(int(3)), vector_length(&[v.clone()]));
        assert_eq!(
            Err(Error::out_of_range(3, 3)),
            vector_ref(&[v.clone(), int(3)])
        );
        assert_eq!(
            Err(Error::out_of_range(-1, 3)),
            vector_set_b(&[v, int(-1), int(0)])
        );
    }

    #[test]
    fn vector_as_its_own_index() {
        let v = make_vector(&[int(2), int(0)]).unwrap();
        match vector_set_b(&[v.clone(), v.clone(), int(0)]) {
            Err(Error::Type { expected, .. }) => assert_eq!("integer", expected),
            other => panic!("expected type error, got {:?}", other),
        }
        match vector_fill_b(&[v.clone(), int(1), v.clone()]) {
            Err(Error::Type { expected, .. }) => assert_eq!("integer", expected),
            other => panic!("expected type error, got {:?}", other),
        }
        assert_eq!("#(0 0)", v.to_string());
    }

    #[test]
    fn default_fill_is_unspecified() {
        let v = make_vector(&[int(2)]).unwrap();
        assert_eq!(Ok(Value::Unspecific), vector_ref(&[v, int(0)]));
    }

    #[test]
    fn conversions_with_ranges() {
        let v = vector(&[int(1), int(2), int(3), int(4)]).unwrap();
        assert_eq!(
            "(2 3)",
            vector_to_list(&[v.clone(), int(1), int(3)])
                .unwrap()
                .to_string()
        );
        assert_eq!(
            "(1 2 3 4)",
            vector_to_list(&[v.clone()]).unwrap().to_string()
        );
        assert!(vector_to_list(&[v.clone(), int(3), int(2)]).is_err());
        vector_fill_b(&[v.clone(), int(0), int(2)]).unwrap();
        assert_eq!("#(1 2 0 0)", v.to_string());
        let l = vector_to_list(&[v]).unwrap();
        assert_eq!("#(1 2 0 0)", list_to_vector(&[l]).unwrap().to_string());
    }
}
