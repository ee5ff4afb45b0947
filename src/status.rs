use std::io::{self, Stderr, Write};

use ratatui::crossterm::Command;
use ratatui::crossterm::terminal::{Clear, ClearType};

use crate::domain::Result;

pub const STATUS_MAX_LENGTH: usize = 157;

/// Replaces the current terminal line with `msg` and returns the cursor to column 0.
/// An empty `msg` just clears the line.
pub fn set_status_msg<W: Write>(out: &mut W, msg: &str) -> Result<()> {
    // Always the ANSI form, never the console API: the sink may be a pipe or a buffer.
    let mut clear = String::from("\r");
    Clear(ClearType::CurrentLine)
        .write_ansi(&mut clear)
        .map_err(io::Error::other)?;
    out.write_all(clear.as_bytes())?;
    if !msg.is_empty() {
        let shown: String = msg.chars().take(STATUS_MAX_LENGTH).collect();
        write!(out, " {shown}\r")?;
    }
    out.flush()?;
    Ok(())
}

/// Appends `msg` to the current line as is.
pub fn add_status_msg<W: Write>(out: &mut W, msg: &str) -> Result<()> {
    out.write_all(msg.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Single overwritable progress line. Callers must not interleave other writes to the same sink.
#[derive(Debug)]
pub struct StatusLine<W: Write = Stderr> {
    out: W,
}

impl StatusLine<Stderr> {
    pub fn stderr() -> Self {
        Self { out: io::stderr() }
    }
}

impl<W: Write> StatusLine<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn set(&mut self, msg: &str) -> Result<()> {
        set_status_msg(&mut self.out, msg)
    }

    pub fn add(&mut self, msg: &str) -> Result<()> {
        add_status_msg(&mut self.out, msg)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.set("")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
