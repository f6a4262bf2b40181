use std::io;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, error, info};
use rand::Rng;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::game::{Game, TickOutcome};
use crate::geometry::Direction::{self, *};
use crate::score::ScoreStore;
use crate::term::TermManager;

const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Message {
    Tick,
    Turn(Direction),
    Quit,
}

pub fn message_for_key(key: &KeyEvent) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Message::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Message::Quit),
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Message::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Message::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Message::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Message::Turn(Right)),
        _ => None,
    }
}

/// Sends a `Tick` every `period` until the receiving side goes away.
pub fn spawn_ticker(tx: UnboundedSender<Message>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; let the player see the board first.
        ticks.tick().await;

        loop {
            ticks.tick().await;
            if tx.send(Message::Tick).is_err() {
                break;
            }
        }
    })
}

/// Reads the keyboard on a plain thread, since crossterm's reads block. The
/// thread notices a closed channel within one poll interval and exits.
pub fn spawn_key_reader(tx: UnboundedSender<Message>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = read_keys(&tx) {
            error!("Keyboard reader stopped: {}", e);
            let _ = tx.send(Message::Quit);
        }
    })
}

fn read_keys(tx: &UnboundedSender<Message>) -> io::Result<()> {
    while !tx.is_closed() {
        if !event::poll(KEY_POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if let Some(msg) = message_for_key(&key) {
                if tx.send(msg).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The game ended on this message; no more ticks are wanted.
    GameOver,
    Quit,
}

/// Applies one inbound message to the game. Every state change goes through here.
pub fn handle_message<S: ScoreStore, R: Rng>(game: &mut Game<S, R>, msg: Message) -> Flow {
    match msg {
        Message::Quit => Flow::Quit,
        Message::Turn(direction) => {
            if !game.enqueue_direction(direction) {
                debug!("ignored turn {:?}", direction);
            }
            Flow::Continue
        }
        Message::Tick => match game.tick() {
            TickOutcome::Lost | TickOutcome::Won => Flow::GameOver,
            _ => Flow::Continue,
        },
    }
}

/// Drains the channel in arrival order until the player quits.
pub async fn run<S: ScoreStore, R: Rng>(
    game: &mut Game<S, R>,
    term: &mut TermManager,
    tick_period: Duration,
) -> io::Result<()> {
    let (tx, mut rx): (UnboundedSender<Message>, UnboundedReceiver<Message>) = unbounded_channel();
    let ticker = spawn_ticker(tx.clone(), tick_period);
    let _keys = spawn_key_reader(tx);

    term.draw(&game.snapshot())?;

    while let Some(msg) = rx.recv().await {
        match handle_message(game, msg) {
            Flow::Quit => {
                info!("Quit requested");
                break;
            }
            Flow::GameOver => {
                ticker.abort();
                term.draw(&game.snapshot())?;
            }
            Flow::Continue => {
                if msg == Message::Tick {
                    term.draw(&game.snapshot())?;
                }
            }
        }
    }

    ticker.abort();
    rx.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Game, Status};
    use crate::geometry::{Arena, Position};
    use crate::snake::Snake;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::VecDeque;

    struct NullStore;

    impl ScoreStore for NullStore {
        fn load(&self) -> u32 {
            0
        }

        fn save(&mut self, _score: u32) {}
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_wasd_and_arrows() {
        assert_eq!(message_for_key(&key(KeyCode::Char('w'))), Some(Message::Turn(Up)));
        assert_eq!(message_for_key(&key(KeyCode::Left)), Some(Message::Turn(Left)));
        assert_eq!(message_for_key(&key(KeyCode::Char('S'))), Some(Message::Turn(Down)));
        assert_eq!(message_for_key(&key(KeyCode::Right)), Some(Message::Turn(Right)));
        assert_eq!(message_for_key(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn maps_quit_keys() {
        assert_eq!(message_for_key(&key(KeyCode::Char('q'))), Some(Message::Quit));
        assert_eq!(message_for_key(&key(KeyCode::Esc)), Some(Message::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(message_for_key(&ctrl_c), Some(Message::Quit));
        // Plain 'c' is nothing.
        assert_eq!(message_for_key(&key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut release = key(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        assert_eq!(message_for_key(&release), None);
    }

    #[test]
    fn messages_apply_in_order() {
        let body: VecDeque<Position> = [(5, 5), (5, 6), (5, 7)].iter().copied().map(Position::from).collect();
        let snake = Snake::from_body(body, Right, 2);
        let mut game =
            Game::with_parts(Arena::new(40, 20), snake, Some(Position::new(10, 10)), NullStore, StdRng::seed_from_u64(0));

        let inbox = [Message::Turn(Down), Message::Tick, Message::Turn(Left), Message::Tick];
        for msg in inbox {
            assert_eq!(handle_message(&mut game, msg), Flow::Continue);
        }
        assert_eq!(game.snake().head(), Position::new(6, 6));
        assert_eq!(handle_message(&mut game, Message::Quit), Flow::Quit);
    }

    #[test]
    fn game_over_is_reported_once() {
        let body: VecDeque<Position> = [(5, 37), (5, 38)].iter().copied().map(Position::from).collect();
        let snake = Snake::from_body(body, Right, 2);
        let mut game =
            Game::with_parts(Arena::new(40, 20), snake, Some(Position::new(10, 10)), NullStore, StdRng::seed_from_u64(0));

        assert_eq!(handle_message(&mut game, Message::Tick), Flow::GameOver);
        assert_eq!(game.snapshot().status, Status::Lost);
        assert_eq!(handle_message(&mut game, Message::Tick), Flow::Continue);
    }

    #[tokio::test]
    async fn ticker_stops_when_receiver_drops() {
        let (tx, mut rx) = unbounded_channel();
        let ticker = spawn_ticker(tx, Duration::from_millis(1));

        assert_eq!(rx.recv().await, Some(Message::Tick));
        drop(rx);
        assert!(ticker.await.is_ok());
    }
}
