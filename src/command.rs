//! Command stream parsing and execution
//!
//! The driver input is a count N followed by N whitespace-separated
//! commands: `insert <key> <value>`, `delete <key> <value>`, `find <key>`.
//! Only `find` produces output: one line of ascending space-separated
//! values, or the literal token `null` when the key has none.

use crate::engine::Engine;
use crate::{Result, StoreError};
use std::io::{BufRead, Write};

/// One parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert { key: String, value: i32 },
    Delete { key: String, value: i32 },
    Find { key: String },
}

/// Whitespace tokenizer over a buffered reader
struct Tokenizer<R> {
    reader: R,
    pending: Vec<String>,
}

impl<R: BufRead> Tokenizer<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
        }
    }

    fn next_token(&mut self) -> Result<String> {
        loop {
            if let Some(token) = self.pending.pop() {
                return Ok(token);
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(StoreError::Parse("unexpected end of input".into()));
            }
            // Reverse so pop() yields tokens in line order.
            self.pending = line.split_whitespace().map(str::to_string).rev().collect();
        }
    }

    fn next_int(&mut self, what: &str) -> Result<i32> {
        let token = self.next_token()?;
        token
            .parse::<i32>()
            .map_err(|_| StoreError::Parse(format!("invalid {}: {:?}", what, token)))
    }
}

impl Command {
    fn parse<R: BufRead>(tokens: &mut Tokenizer<R>) -> Result<Self> {
        let word = tokens.next_token()?;
        match word.as_str() {
            "insert" => Ok(Command::Insert {
                key: tokens.next_token()?,
                value: tokens.next_int("value")?,
            }),
            "delete" => Ok(Command::Delete {
                key: tokens.next_token()?,
                value: tokens.next_int("value")?,
            }),
            "find" => Ok(Command::Find {
                key: tokens.next_token()?,
            }),
            other => Err(StoreError::Parse(format!("unknown command: {:?}", other))),
        }
    }
}

/// Execute a command against the engine, writing any `find` result line
pub fn execute<W: Write>(engine: &Engine, command: &Command, out: &mut W) -> Result<()> {
    match command {
        Command::Insert { key, value } => engine.insert(key, *value),
        Command::Delete { key, value } => engine.delete(key, *value),
        Command::Find { key } => {
            let values = engine.find(key)?;
            writeln!(out, "{}", render_values(&values))?;
            Ok(())
        }
    }
}

/// Run a full command stream: a count N, then N commands
pub fn run<R: BufRead, W: Write>(engine: &Engine, reader: R, out: &mut W) -> Result<()> {
    let mut tokens = Tokenizer::new(reader);
    let count = tokens.next_int("command count")?;
    if count < 0 {
        return Err(StoreError::Parse(format!("negative command count: {}", count)));
    }

    for _ in 0..count {
        let command = Command::parse(&mut tokens)?;
        execute(engine, &command, out)?;
    }
    out.flush()?;
    Ok(())
}

fn render_values(values: &[i32]) -> String {
    if values.is_empty() {
        return "null".to_string();
    }
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
