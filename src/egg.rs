use log::debug;
use rand::{seq::IteratorRandom, Rng};

use crate::geometry::{Arena, Position};
use crate::snake::Snake;

const SAMPLES_PER_FREE_CELL: usize = 8;
const MIN_SAMPLES: usize = 32;

/// Picks a free interior cell for the next egg, or `None` once the snake
/// covers the whole interior.
///
/// Random sampling is tried first since the board is mostly empty. When the
/// snake gets long the sampling budget runs out and the free cells are
/// enumerated instead, so this always terminates.
pub fn place_egg<R: Rng>(arena: &Arena, snake: &Snake, rng: &mut R) -> Option<Position> {
    let free = arena.interior_len().saturating_sub(snake.len());
    if free == 0 {
        return None;
    }

    let attempts = (free * SAMPLES_PER_FREE_CELL).max(MIN_SAMPLES);
    for _ in 0..attempts {
        let sample = arena.random_interior(rng);
        if !snake.occupies(sample) {
            debug!("egg placed at {:?}", sample);
            return Some(sample);
        }
    }

    let egg = arena.interior_cells().filter(|&pos| !snake.occupies(pos)).choose(rng);
    debug!("egg placed at {:?} after exhausting samples", egg);
    egg
}
