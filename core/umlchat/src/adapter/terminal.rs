//! 標準入出力による LineReader / Console 実装

use crate::ports::outbound::{Console, LineReader};
use common::error::Error;
use std::io::{self, BufRead, Write};

/// 標準入力から 1 行ずつ読む
pub struct StdinLineReader;

impl StdinLineReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdinLineReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReader for StdinLineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, Error> {
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| Error::io_msg(e.to_string()))?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// stdout / stderr へ書く Console
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn say(&self, text: &str) {
        println!("{}", text);
    }

    fn warn(&self, text: &str) {
        eprintln!("{}", text);
    }
}
