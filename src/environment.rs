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

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use error::Error;
use value::Value;

pub type RcEnv = Rc<RefCell<Environment>>;

/// One frame of bindings, linked to the frame it was created in.
pub struct Environment {
    parent: Option<RcEnv>,
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new(parent: Option<RcEnv>) -> Environment {
        Environment {
            parent,
            values: HashMap::new(),
        }
    }

    pub fn new_child(parent: &RcEnv) -> RcEnv {
        Rc::new(RefCell::new(Environment::new(Some(parent.clone()))))
    }

    /// Binds `name` in this frame, replacing any previous binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        match self.values.get(name) {
            Some(v) => Some(v.clone()),
            None => match self.parent {
                Some(ref e) => e.borrow().get(name),
                None => None,
            },
        }
    }

    /// Replaces the innermost existing binding of `name`.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), Error> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match self.parent {
            Some(ref e) => e.borrow_mut().set(name, value),
            None => Err(Error::Unbound(name.to_string())),
        }
    }
}

// Bound values can hold closures that point back to this frame, so only names are shown.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names: Vec<&String> = self.values.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("values", &names)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
