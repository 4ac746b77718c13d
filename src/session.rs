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

use std::slice;

use value::Value;

/// History of the values produced by top-level expressions, oldest first.
#[derive(Debug, Default)]
pub struct Session {
    history: Vec<Value>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Records `value`, unless it is unspecified or identical to the previous entry.
    pub fn push(&mut self, value: Value) {
        if let Value::Unspecific = value {
            return;
        }
        if self.history.last() == Some(&value) {
            return;
        }
        self.history.push(value);
    }

    pub fn last(&self) -> Option<&Value> {
        self.history.last()
    }

    /// `n`-th recorded value, counting from 0.
    pub fn get(&self, n: usize) -> Option<&Value> {
        self.history.get(n)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<Value> {
        self.history.iter()
    }
}
