//! Operator console seam.
//!
//! Chat traffic and prompts go to stdout; diagnostics go through `tracing`
//! to stderr and are never mixed into the conversation. The trait keeps the
//! session loop testable with a scripted console.

use std::io::{self, BufRead, Write};

/// Line-oriented console the chat session talks to.
pub trait Console {
    /// Display one line received from the host.
    fn peer_line(&mut self, text: &str) -> io::Result<()>;

    /// Prompt the operator and read one line of input.
    ///
    /// Returns `None` on end of file. The trailing newline is stripped.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Display a status line (connection banners, link-loss notice).
    fn status(&mut self, text: &str) -> io::Result<()>;
}

impl<C: Console + ?Sized> Console for &mut C {
    fn peer_line(&mut self, text: &str) -> io::Result<()> {
        (**self).peer_line(text)
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        (**self).read_line(prompt)
    }

    fn status(&mut self, text: &str) -> io::Result<()> {
        (**self).status(text)
    }
}

/// Console over the process stdin/stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    /// Create a stdio-backed console.
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn peer_line(&mut self, text: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "host> {}", text)?;
        handle.flush()
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(prompt.as_bytes())?;
            handle.flush()?;
        }

        let mut line = String::new();
        let n = io::stdin().lock().read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn status(&mut self, text: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", text)?;
        handle.flush()
    }
}
