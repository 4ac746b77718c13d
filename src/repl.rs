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

//! Line sources for the interactive loop.

use rustyline::error::ReadlineError;
use rustyline::Editor;

use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};

#[derive(Debug)]
pub enum GetLineError {
    Eof,
    Interrupted,
    Err(String),
}

pub trait Repl {
    fn get_line(&mut self, prompt: &str, prefill: &str) -> Result<String, GetLineError>;
    fn add_to_history(&mut self, data: &str);
    fn save_history(&mut self);
}

pub struct ReadlineRepl {
    editor: Editor<()>,
    history_location: Option<String>,
}

impl ReadlineRepl {
    pub fn new(history_location: Option<String>) -> ReadlineRepl {
        let mut ed = ReadlineRepl {
            editor: Editor::<()>::new(),
            history_location,
        };

        let loaded = match &ed.history_location {
            Some(hl) => ed.editor.load_history(hl).is_ok(),
            None => false,
        };
        if !loaded {
            println!("No previous history.");
        }

        ed
    }
}

impl Repl for ReadlineRepl {
    fn get_line(&mut self, prompt: &str, prefill: &str) -> Result<String, GetLineError> {
        self.editor
            .readline_with_initial(prompt, (prefill, ""))
            .map_err(|e| match e {
                ReadlineError::Eof => GetLineError::Eof,
                ReadlineError::Interrupted => GetLineError::Interrupted,
                _ => GetLineError::Err(e.to_string()),
            })
    }

    fn add_to_history(&mut self, data: &str) {
        self.editor.add_history_entry(data);
    }

    fn save_history(&mut self) {
        if let Some(hl) = &self.history_location {
            if let Err(e) = self.editor.save_history(hl) {
                warn!("Could not save history to {}: {}", hl, e);
            }
        }
    }
}

pub struct StdIoRepl {}

impl Repl for StdIoRepl {
    fn get_line(&mut self, prompt: &str, _prefill: &str) -> Result<String, GetLineError> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| GetLineError::Err(e.to_string()))?;

        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => Err(GetLineError::Eof),
            Ok(_) => Ok(buf),
            Err(e) => Err(GetLineError::Err(e.to_string())),
        }
    }

    fn add_to_history(&mut self, _data: &str) {}

    fn save_history(&mut self) {}
}

/// Feeds the lines of a file to the loop, without echoing prompts.
pub struct FileRepl {
    lines: VecDeque<String>,
}

impl FileRepl {
    pub fn new(fname: &str) -> Result<FileRepl, String> {
        let contents =
            fs::read_to_string(fname).map_err(|e| format!("cannot read {}: {}", fname, e))?;
        Ok(FileRepl {
            lines: contents.lines().map(|l| l.to_string()).collect(),
        })
    }
}

impl Repl for FileRepl {
    fn get_line(&mut self, _prompt: &str, _prefill: &str) -> Result<String, GetLineError> {
        self.lines.pop_front().ok_or(GetLineError::Eof)
    }

    fn add_to_history(&mut self, _data: &str) {}

    fn save_history(&mut self) {}
}
