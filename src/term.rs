use std::io::{self, Stdout, Write};

use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};
use log::error;

use crate::config::ConfigError;
use crate::game::{Snapshot, Status};
use crate::geometry::Position;
use crate::AppError;

const WALL_CHAR: char = '#';
const SNAKE_BODY_CHAR: char = '█';
const EGG_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

/// Lines drawn under the arena: score, high score, help.
const STATUS_LINES: u16 = 3;

pub struct TermManager {
    stdout: Stdout,
    active: bool,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: io::stdout(), active: false }
    }

    /// Fails when the arena and its status lines would not be fully visible.
    pub fn check_fits(width: u16, height: u16) -> Result<(), AppError> {
        let (columns, rows) = terminal::size()?;

        if width > columns || height + STATUS_LINES > rows {
            return Err(ConfigError::TerminalTooSmall { width, height, columns, rows }.into());
        }
        Ok(())
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn draw(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let (width, height) = (snapshot.arena.width() as u16, snapshot.arena.height() as u16);

        // Overwrite instead of clearing the screen, which flickers.
        self.draw_borders(width, height)?;
        let blank = " ".repeat(width.saturating_sub(2) as usize);
        for y in 1..height - 1 {
            queue!(self.stdout, cursor::MoveTo(1, y), Print(&blank))?;
        }

        match snapshot.egg {
            Some(egg) if snapshot.arena.contains(egg) => self.print_at(egg, EGG_CHAR)?,
            Some(egg) => error!("Invalid egg position: {:?}", egg),
            None => {}
        }

        let dead = snapshot.status == Status::Lost;
        let head = snapshot.body.back().copied();
        for &pos in snapshot.body {
            let ch = if dead {
                DEAD_SNAKE_CHAR
            } else if Some(pos) == head {
                snapshot.direction.head_char()
            } else {
                SNAKE_BODY_CHAR
            };
            self.print_at(pos, ch)?;
        }

        let status_lines = [
            format!("Score: {}", snapshot.score),
            format!("High score: {}", snapshot.high_score),
            "Arrow keys or WASD to move, q to quit".to_string(),
        ];
        for (i, line) in status_lines.iter().enumerate() {
            queue!(
                self.stdout,
                cursor::MoveTo(0, height + i as u16),
                Print(line),
                terminal::Clear(ClearType::UntilNewLine)
            )?;
        }

        match snapshot.status {
            Status::Running => {}
            Status::Lost | Status::Won => {
                let title = if snapshot.status == Status::Won { "You won!" } else { "G A M E   O V E R" };
                let score = format!("Score: {}", snapshot.score);
                let record = if snapshot.new_high_score { "New high score!" } else { "" };
                self.show_message(snapshot, &[title, &score, record, "", "Press q to quit"])?;
            }
        }

        self.stdout.flush()
    }

    fn draw_borders(&mut self, width: u16, height: u16) -> io::Result<()> {
        for x in 0..width {
            queue!(self.stdout, cursor::MoveTo(x, 0), Print(WALL_CHAR))?;
            queue!(self.stdout, cursor::MoveTo(x, height - 1), Print(WALL_CHAR))?;
        }

        for y in 1..height - 1 {
            queue!(self.stdout, cursor::MoveTo(0, y), Print(WALL_CHAR))?;
            queue!(self.stdout, cursor::MoveTo(width - 1, y), Print(WALL_CHAR))?;
        }
        Ok(())
    }

    /// A box of text centered on the arena, padded by one blank line above and below.
    fn show_message(&mut self, snapshot: &Snapshot<'_>, lines: &[&str]) -> io::Result<()> {
        let msg_height = lines.len() as u16 + 2;
        let msg_width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as u16 + 4;
        let center = (snapshot.arena.width() as u16 / 2, snapshot.arena.height() as u16 / 2);
        let left = center.0.saturating_sub(msg_width / 2);
        let top = center.1.saturating_sub(msg_height / 2);

        let blank = " ".repeat(msg_width as usize);
        queue!(self.stdout, cursor::MoveTo(left, top), Print(&blank))?;
        queue!(self.stdout, cursor::MoveTo(left, top + msg_height - 1), Print(&blank))?;

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{line: ^width$}", line = line, width = msg_width as usize);
            queue!(self.stdout, cursor::MoveTo(left, top + 1 + i as u16), PrintStyledContent(padded.bold()))?;
        }
        Ok(())
    }

    fn print_at(&mut self, pos: Position, ch: char) -> io::Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.col as u16, pos.row as u16), Print(ch))
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            error!("Failed to restore the terminal: {}", e);
        }
    }
}
