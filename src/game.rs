use std::collections::VecDeque;

use log::{debug, info};
use rand::Rng;

use crate::egg::place_egg;
use crate::geometry::{Arena, Direction::{self, *}, Position};
use crate::score::ScoreStore;
use crate::snake::Snake;

pub const EGG_REWARD: u32 = 10;
pub const INITIAL_SNAKE_LENGTH: i32 = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Lost,
    /// The snake filled the whole interior.
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Ate,
    Lost,
    Won,
    /// The game had already ended.
    Idle,
}

/// Read-only view of a game, enough to draw one frame.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub arena: Arena,
    pub body: &'a VecDeque<Position>,
    pub direction: Direction,
    pub egg: Option<Position>,
    pub score: u32,
    pub high_score: u32,
    pub new_high_score: bool,
    pub status: Status,
}

pub struct Game<S, R> {
    arena: Arena,
    snake: Snake,
    egg: Option<Position>,
    score: u32,
    high_score: u32,
    new_high_score: bool,
    status: Status,
    store: S,
    rng: R,
}

impl<S: ScoreStore, R: Rng> Game<S, R> {
    /// Starts a game with the snake in the middle of the arena heading right.
    pub fn new(arena: Arena, queue_depth: usize, store: S, mut rng: R) -> Self {
        let center = Position::new(arena.height() / 2, arena.width() / 2);
        let snake = Snake::new(center, INITIAL_SNAKE_LENGTH, Right, queue_depth);
        let egg = place_egg(&arena, &snake, &mut rng);

        Game::with_parts(arena, snake, egg, store, rng)
    }

    pub fn with_parts(arena: Arena, snake: Snake, egg: Option<Position>, store: S, rng: R) -> Self {
        let high_score = store.load();
        let status = if egg.is_some() { Status::Running } else { Status::Won };

        Game { arena, snake, egg, score: 0, high_score, new_high_score: false, status, store, rng }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn is_over(&self) -> bool {
        self.status != Status::Running
    }

    /// Buffers a turn for the coming ticks. Never moves the snake and never
    /// ends the game; collisions are only found by `tick`.
    pub fn enqueue_direction(&mut self, direction: Direction) -> bool {
        if self.is_over() {
            return false;
        }

        self.snake.queue_direction(direction)
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.is_over() {
            return TickOutcome::Idle;
        }

        if let Some(turned) = self.snake.take_queued_direction() {
            debug!("snake turned {:?}", turned);
        }

        let new_head = self.snake.step(self.snake.direction());

        if Some(new_head) == self.egg {
            self.snake.advance(new_head, true);
            self.score += EGG_REWARD;
            self.egg = place_egg(&self.arena, &self.snake, &mut self.rng);

            if self.egg.is_none() {
                self.finish(Status::Won);
                return TickOutcome::Won;
            }
            return TickOutcome::Ate;
        }

        if self.arena.is_wall(new_head) || self.snake.collides_with_self(new_head, false) {
            self.finish(Status::Lost);
            return TickOutcome::Lost;
        }

        self.snake.advance(new_head, false);
        debug_assert!(!self.snake.would_hit_wall(&self.arena), "snake head moved into a wall");
        TickOutcome::Moved
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            arena: self.arena,
            body: self.snake.body(),
            direction: self.snake.direction(),
            egg: self.egg,
            score: self.score,
            high_score: self.high_score,
            new_high_score: self.new_high_score,
            status: self.status,
        }
    }

    fn finish(&mut self, status: Status) {
        self.status = status;
        info!("Game ended ({:?}) with score {}, length {}", status, self.score, self.snake.len());

        if self.score > self.high_score {
            self.high_score = self.score;
            self.new_high_score = true;
            self.store.save(self.score);
        }
    }
}
