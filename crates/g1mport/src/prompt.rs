//! Asking the operator for a working directory.

use std::io::{self, BufRead, Write};

/// Message shown before reading a directory path.
pub const PROMPT_MESSAGE: &str =
    "Now enter a directory path with the vb/ib files (or drag and drop the directory) and press enter.";

/// Source of an operator-supplied directory path.
pub trait DirectoryPrompt {
    /// Block until one line of input is available and return it raw.
    fn read_directory(&mut self) -> io::Result<String>;
}

/// Prompt on stdout, read one line from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl DirectoryPrompt for StdinPrompt {
    fn read_directory(&mut self) -> io::Result<String> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{}", PROMPT_MESSAGE)?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

impl<F> DirectoryPrompt for F
where
    F: FnMut() -> io::Result<String>,
{
    fn read_directory(&mut self) -> io::Result<String> {
        self()
    }
}

/// Clean a typed or drag-and-dropped path.
///
/// Trims surrounding whitespace, then drops one leading and one trailing
/// double quote if present.
pub fn clean_prompt_path(input: &str) -> String {
    let path = input.trim();
    let path = path.strip_prefix('"').unwrap_or(path);
    let path = path.strip_suffix('"').unwrap_or(path);
    path.to_string()
}
