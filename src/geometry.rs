use rand::Rng;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        Position::new(self.row + d_row, self.col + d_col)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Position::new(row, col)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// (row, column) offset of one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// The play field. Its outer ring of cells is wall, everything inside is free.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Arena {
    width: i32,
    height: i32,
}

impl Arena {
    pub fn new(width: u16, height: u16) -> Self {
        Arena { width: width as i32, height: height as i32 }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.height).contains(&pos.row) && (0..self.width).contains(&pos.col)
    }

    /// Rows are bounded by the height, columns by the width. Anything outside
    /// the arena counts as wall too.
    pub fn is_wall(&self, pos: Position) -> bool {
        pos.row <= 0 || pos.row >= self.height - 1 || pos.col <= 0 || pos.col >= self.width - 1
    }

    pub fn interior_len(&self) -> usize {
        ((self.height - 2).max(0) * (self.width - 2).max(0)) as usize
    }

    /// Every free cell, row by row.
    pub fn interior_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (1..self.height - 1).flat_map(move |row| (1..self.width - 1).map(move |col| Position::new(row, col)))
    }

    pub fn random_interior<R: Rng>(&self, rng: &mut R) -> Position {
        let row = rng.gen_range(1..self.height - 1);
        let col = rng.gen_range(1..self.width - 1);
        Position::new(row, col)
    }
}
