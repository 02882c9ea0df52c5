//! Scoped terminal colors.

use std::io::{self, IsTerminal, Write};

use crossterm::queue;
use crossterm::style::{ResetColor, SetForegroundColor};

pub use crossterm::style::Color;

/// Whether console output should be colored.
pub fn color_enabled(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
}

/// A writer that holds a foreground color until dropped.
///
/// The reset is queued on drop, so early returns and unwinding leave the
/// terminal in its default color.
pub struct Styled<'a, W: Write> {
    out: &'a mut W,
    active: bool,
}

impl<'a, W: Write> Styled<'a, W> {
    pub fn new(out: &'a mut W, color: Color, enabled: bool) -> io::Result<Self> {
        if enabled {
            queue!(out, SetForegroundColor(color))?;
        }
        Ok(Self {
            out,
            active: enabled,
        })
    }
}

impl<W: Write> Write for Styled<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> Drop for Styled<'_, W> {
    fn drop(&mut self) {
        if self.active {
            let _ = queue!(self.out, ResetColor);
            let _ = self.out.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_style_writes_plain_text() {
        let mut out = Vec::new();
        {
            let mut styled = Styled::new(&mut out, Color::Cyan, false).unwrap();
            write!(styled, "> ").unwrap();
        }
        assert_eq!(out, b"> ");
    }

    #[test]
    fn enabled_style_resets_on_drop() {
        let mut out = Vec::new();
        {
            let mut styled = Styled::new(&mut out, Color::Green, true).unwrap();
            write!(styled, "started").unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\u{1b}["));
        assert!(text.contains("started"));
        assert!(text.ends_with("\u{1b}[0m"));
    }

    #[test]
    fn reset_happens_on_early_return() {
        fn fail_midway(out: &mut Vec<u8>) -> io::Result<()> {
            let mut styled = Styled::new(out, Color::Cyan, true)?;
            write!(styled, "> ")?;
            Err(io::Error::other("interrupted"))
        }

        let mut out = Vec::new();
        assert!(fail_midway(&mut out).is_err());
        assert!(String::from_utf8(out).unwrap().ends_with("\u{1b}[0m"));
    }
}
