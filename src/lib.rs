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

#[macro_use]
extern crate log;
extern crate num_bigint;
extern crate num_complex;
extern crate num_integer;
extern crate num_rational;
extern crate num_traits;
extern crate once_cell;
extern crate regex;
extern crate rustyline;

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use ast::Node;
use environment::{Environment, RcEnv};
use error::Error;
use session::Session;
use value::{list_from_vec, Value};

pub mod ast;
pub mod environment;
pub mod error;
pub mod eval;
pub mod lex;
pub mod number;
pub mod parse;
pub mod primitives;
pub mod repl;
pub mod session;
pub mod util;
pub mod value;

/// Name bound in the global frame to the last value recorded by a session.
pub const LAST_VALUE: &str = "_";

/// Name bound to the list of every value recorded by a session, oldest first.
pub const HISTORY_VALUES: &str = "_history-values";

// `(_history)` returns the recorded values, `(_history n)` the n-th one.
const HISTORY_PROCEDURES: &str = "
(define (_history . n)
  (if (null? n) _history-values (list-ref _history-values (car n))))
(define _his _history)";

/// Structure holding the global state of the interpreter.
pub struct Interpreter {
    global_environment: RcEnv,
}

impl Interpreter {
    pub fn new() -> Self {
        let global_environment = Rc::new(RefCell::new(Environment::new(None)));
        primitives::register_primitives(&global_environment);
        Interpreter { global_environment }
    }

    pub fn global_environment(&self) -> &RcEnv {
        &self.global_environment
    }

    /// Parses `source` and evaluates every expression in it, returning the last value.
    pub fn parse_eval(&self, source: &str) -> Result<Value, Error> {
        let program = parse::parse(source)?;
        eval::evaluate(&program, &self.global_environment)
    }

    /// Evaluates one top-level expression and records its value in `session`. The recorded
    /// values are then visible to Scheme code through `_`, `_history` and `_his`.
    pub fn eval_recorded(&self, node: &Node, session: &mut Session) -> Result<Value, Error> {
        let value = eval::evaluate(node, &self.global_environment)?;
        session.push(value.clone());
        if let Some(last) = session.last() {
            self.global_environment
                .borrow_mut()
                .define(LAST_VALUE, last.clone());
        }
        let history = list_from_vec(session.iter().cloned().collect());
        let installed = self.global_environment.borrow().get("_history").is_some();
        self.global_environment
            .borrow_mut()
            .define(HISTORY_VALUES, history);
        if !installed {
            debug!("Installing history procedures.");
            self.parse_eval(HISTORY_PROCEDURES)?;
        }
        Ok(value)
    }

    /// Loads and runs a Scheme file in the global environment.
    pub fn initialize(&self, fname: &str) -> Result<(), String> {
        let contents = fs::read_to_string(fname).map_err(|e| e.to_string())?;
        self.parse_eval(&contents)
            .map_err(|e| format!("error in {}: {}", fname, e))?;
        info!("Loaded {}.", fname);
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
