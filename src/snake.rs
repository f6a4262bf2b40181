use std::collections::VecDeque;

use crate::geometry::{Arena, Direction, Position};

/// Body cells are stored tail first, head last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending: VecDeque<Direction>,
    max_pending: usize,
}

impl Snake {
    /// A straight snake of `size` cells whose head sits at `head`, pointing
    /// towards `direction`.
    pub fn new(head: Position, size: i32, direction: Direction, max_pending: usize) -> Self {
        let (d_row, d_col) = direction.delta();

        let body = (0..size.max(1))
            .rev()
            .map(|i| Position::new(head.row - d_row * i, head.col - d_col * i))
            .collect();

        Snake::from_body(body, direction, max_pending)
    }

    pub fn from_body(body: VecDeque<Position>, direction: Direction, max_pending: usize) -> Self {
        assert!(!body.is_empty(), "snake body must hold at least one cell");
        Snake { body, direction, pending: VecDeque::with_capacity(max_pending), max_pending: max_pending.max(1) }
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Position {
        *self.body.back().expect("snake body is never empty")
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn would_hit_wall(&self, arena: &Arena) -> bool {
        arena.is_wall(self.head())
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn step(&self, direction: Direction) -> Position {
        self.head().step(direction)
    }

    /// Checked against the body as it is before moving. Unless the snake is
    /// growing, its tail leaves its cell on this same step, so the head may
    /// follow right into it.
    pub fn collides_with_self(&self, new_head: Position, grew: bool) -> bool {
        let skip = if grew { 0 } else { 1 };
        self.body.iter().skip(skip).any(|&cell| cell == new_head)
    }

    /// Returns the vacated tail cell, if any.
    pub fn advance(&mut self, new_head: Position, grew: bool) -> Option<Position> {
        self.body.push_back(new_head);

        if grew {
            None
        } else {
            self.body.pop_front()
        }
    }

    /// Buffers a turn for a later tick. Turns that would reverse or repeat the
    /// last buffered direction are dropped. With a full buffer the newest turn
    /// replaces the last one.
    pub fn queue_direction(&mut self, direction: Direction) -> bool {
        if self.pending.len() >= self.max_pending {
            let before_last = self.pending.iter().rev().nth(1).copied().unwrap_or(self.direction);
            let last = self.pending.back().copied();

            if direction.is_opposite(before_last) || last == Some(direction) {
                return false;
            }

            self.pending.pop_back();
            self.pending.push_back(direction);
            return true;
        }

        let last = self.pending.back().copied().unwrap_or(self.direction);
        if direction == last || direction.is_opposite(last) {
            return false;
        }

        self.pending.push_back(direction);
        true
    }

    /// Commits at most one buffered turn. A reversal is thrown away, never re-queued.
    pub fn take_queued_direction(&mut self) -> Option<Direction> {
        let next = self.pending.pop_front()?;

        if next.is_opposite(self.direction) {
            None
        } else {
            self.direction = next;
            Some(next)
        }
    }
}
