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

extern crate clap;
extern crate halide;
#[macro_use]
extern crate log;
extern crate pretty_env_logger;

use std::env;

use clap::{App, Arg};
use halide::ast::Node;
use halide::lex::{self, SegmentationResult, Token};
use halide::repl::{FileRepl, GetLineError, ReadlineRepl, Repl, StdIoRepl};
use halide::session::Session;
use halide::value::{pretty_print, Value};
use halide::Interpreter;

fn main() {
    pretty_env_logger::init();
    let args: Vec<String> = env::args().collect();
    match do_main(args) {
        Err(e) => {
            println!("error: {}", e);
            std::process::exit(1)
        }
        Ok(()) => std::process::exit(0),
    }
}

fn do_main(args: Vec<String>) -> Result<(), String> {
    let options = parse_args(&args.iter().map(|x| &**x).collect::<Vec<_>>())
        .map_err(|e| format!("could not parse arguments: {}", e))?;
    info!("Starting with {:?}", options);

    let silent = options.input_file.is_some();
    let mut repl: Box<dyn Repl> = match options.input_file {
        Some(f) => Box::new(FileRepl::new(&f)?),
        None => {
            if options.enable_readline {
                Box::new(ReadlineRepl::new(Some(options.history_file)))
            } else {
                Box::new(StdIoRepl {})
            }
        }
    };

    let interpreter = Interpreter::new();
    let mut session = Session::new();

    if let Some(path) = options.prelude {
        interpreter.initialize(&path)?;
    }
    loop {
        if !handle_one_expr_wrap(&mut *repl, &interpreter, &mut session, silent) {
            break;
        }
    }

    repl.save_history();
    Ok(())
}

// Returns true if the REPL loop should continue, false otherwise.
fn handle_one_expr_wrap(
    repl: &mut dyn Repl,
    interpreter: &Interpreter,
    session: &mut Session,
    silent: bool,
) -> bool {
    handle_one_expr(repl, interpreter, session, silent)
        .map_err(|e| println!("Error: {}", e))
        .unwrap_or(true)
}

fn handle_one_expr(
    repl: &mut dyn Repl,
    interpreter: &Interpreter,
    session: &mut Session,
    silent: bool,
) -> Result<bool, String> {
    let mut current_expr_string: Vec<String> = Vec::new();
    let mut pending_expr: Vec<Token> = Vec::new();
    let mut depth: u64 = 0;

    loop {
        let line_opt = if pending_expr.is_empty() {
            repl.get_line(">>> ", "")
        } else {
            repl.get_line("... ", &" ".repeat((depth * 2) as usize))
        };

        let line = match line_opt {
            Err(GetLineError::Eof) => return Ok(false),
            Err(GetLineError::Interrupted) => return Ok(false),
            Err(GetLineError::Err(s)) => {
                println!("Readline error: {}", s);
                return Ok(true);
            }
            Ok(line) => line,
        };

        pending_expr.append(&mut lex::lex(&line));
        current_expr_string.push(line);

        let SegmentationResult {
            remainder,
            depth: new_depth,
            ..
        } = lex::segment(pending_expr).map_err(|e| e.to_string())?;

        if remainder.is_empty() {
            break;
        }

        depth = new_depth;
        pending_expr = remainder;
    }

    let source = current_expr_string.join("\n");
    repl.add_to_history(&source);
    rep(interpreter, session, &source, silent);
    Ok(true)
}

fn rep(interpreter: &Interpreter, session: &mut Session, source: &str, silent: bool) {
    let expressions = match halide::parse::parse(source) {
        Ok(Node::Program(expressions)) => expressions,
        Ok(other) => vec![other],
        Err(e) => {
            println!("parse error: {}", e);
            return;
        }
    };

    for expression in expressions.iter() {
        match interpreter.eval_recorded(expression, session) {
            Ok(Value::Unspecific) => (),
            Ok(v) => {
                if !silent {
                    println!(" => {}", pretty_print(&v))
                }
            }
            Err(e) => println!("{}", e),
        }
    }
}

#[derive(Debug)]
struct Options {
    pub enable_readline: bool,
    pub history_file: String,
    pub prelude: Option<String>,
    pub input_file: Option<String>,
}

fn parse_args(args: &[&str]) -> Result<Options, String> {
    let matches = App::new("Halide")
        .version("0.1")
        .author("Matthieu Felix <matthieufelix@gmail.com>")
        .arg(
            Arg::with_name("no-readline")
                .long("no-readline")
                .help("Disable readline library"),
        )
        .arg(
            Arg::with_name("history-file")
                .long("history-file")
                .takes_value(true)
                .default_value("history.txt")
                .help("File used to load and save the readline history"),
        )
        .arg(
            Arg::with_name("prelude")
                .long("prelude")
                .takes_value(true)
                .help("Scheme file to load before starting"),
        )
        .arg(Arg::with_name("input-file").help("Sets the input file to use"))
        .get_matches_from(args);

    Ok(Options {
        enable_readline: !matches.is_present("no-readline"),
        history_file: matches
            .value_of("history-file")
            .unwrap_or("history.txt")
            .to_string(),
        prelude: matches.value_of("prelude").map(|v| v.to_string()),
        input_file: matches.value_of("input-file").map(|v| v.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = parse_args(&["halide"]).unwrap();
        assert!(options.enable_readline);
        assert_eq!("history.txt", options.history_file);
        assert_eq!(None, options.prelude);
        assert_eq!(None, options.input_file);
    }

    #[test]
    fn all_options() {
        let options = parse_args(&[
            "halide",
            "--no-readline",
            "--history-file",
            "h.txt",
            "--prelude",
            "init.scm",
            "prog.scm",
        ])
        .unwrap();
        assert!(!options.enable_readline);
        assert_eq!("h.txt", options.history_file);
        assert_eq!(Some("init.scm".to_string()), options.prelude);
        assert_eq!(Some("prog.scm".to_string()), options.input_file);
    }
}
