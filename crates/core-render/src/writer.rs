//! Terminal writer: a batch of primitive terminal operations flushed once.
//!
//! Design invariants:
//! * Commands preserve ordering; no flushing mid-frame.
//! * All positions are absolute (0,0) origin; caller ensures bounds.
//! * Style changes are emitted only when the style actually changes between
//!   adjacent leader cells; every row ends with a full reset.
//! * Writer owns no global state; it is a short-lived object per frame.

use crate::{CellFlags, CellStyle, Frame};
use anyhow::Result;
use core_gauge::Rgba;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearAll,
    SetFg(Rgba),
    SetBg(Rgba),
    Reverse,
    Reset,
    Print(String),
}

#[derive(Default, Debug)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn clear_all(&mut self) {
        self.cmds.push(Command::ClearAll);
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if s.is_empty() {
            return;
        }
        // Adjacent prints merge into one command.
        if let Some(Command::Print(last)) = self.cmds.last_mut() {
            last.push_str(&s);
        } else {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn set_style(&mut self, style: CellStyle) {
        self.cmds.push(Command::Reset);
        if let Some(fg) = style.fg {
            self.cmds.push(Command::SetFg(fg));
        }
        if let Some(bg) = style.bg {
            self.cmds.push(Command::SetBg(bg));
        }
        if style.flags.contains(CellFlags::REVERSE) {
            self.cmds.push(Command::Reverse);
        }
    }
    pub fn reset(&mut self) {
        self.cmds.push(Command::Reset);
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    /// Translate a whole frame, row-major, into commands.
    pub fn from_frame(frame: &Frame) -> Self {
        let mut w = Writer::new();
        for y in 0..frame.height {
            w.move_to(0, y);
            let mut current = CellStyle::default();
            for leader in frame.row_leaders(y) {
                if leader.style != current {
                    w.set_style(leader.style);
                    current = leader.style;
                }
                w.print(leader.text);
            }
            if current != CellStyle::default() {
                w.reset();
            }
        }
        if let Some((x, y)) = frame.cursor {
            w.move_to(x, y);
        }
        w
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearAll => queue!(out, Clear(ClearType::All))?,
                Command::SetFg(c) => queue!(out, SetForegroundColor(to_color(c)))?,
                Command::SetBg(c) => queue!(out, SetBackgroundColor(to_color(c)))?,
                Command::Reverse => queue!(out, SetAttribute(Attribute::Reverse))?,
                Command::Reset => queue!(out, SetAttribute(Attribute::Reset), ResetColor)?,
                Command::Print(s) => queue!(out, Print(s))?,
            }
        }
        out.flush()?;
        Ok(())
    }

    pub fn flush(self) -> Result<()> {
        let mut out = stdout();
        self.flush_to(&mut out)
    }
}

fn to_color(c: Rgba) -> Color {
    if c.is_transparent() {
        Color::Reset
    } else {
        Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}
