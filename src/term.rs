use crate::{TermInt, Coords};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        Ok(TermManager { width, height, stdout: stdout() })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        Ok(())
    }

    /// Undoes `setup`. Runs every step even if an earlier one fails.
    pub fn restore(&mut self) -> Result<()> {
        let raw = terminal::disable_raw_mode().context("Error disabling raw mode");
        let cursor = execute!(self.stdout, cursor::Show, cursor::EnableBlinking)
            .context("Error showing cursor");
        let screen = execute!(self.stdout, LeaveAlternateScreen).context("Error leaving alt screen");

        raw.and(cursor).and(screen)
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for input, then drains whatever else is queued.
    pub fn read_key_events_queue(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait)? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn draw_borders(&mut self, top_left: Coords, width: TermInt, height: TermInt) -> Result<()> {
        let (x0, y0) = top_left;
        let end_x = x0 + width - 1;
        let end_y = y0 + height - 1;

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {"+"} else {"-"};
            self.print_at((x, y0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), "|")?;
            self.print_at((end_x, y), "|")?;
        }

        self.flush()
    }

    /// Centred box of text drawn over whatever is on screen.
    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        let blank = " ".repeat(msg_width as usize);
        self.print_at(top_left, &blank)?;
        self.print_at((top_left.0, top_left.1 + msg_height - 1), &blank)?;

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            self.print_at((top_left.0, top_left.1 + i as TermInt + 1), &padded_line)?;
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: Coords, text: &str) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(text))?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }
}
