//! Replay of a trained network against a person.
//!
//! There is no window: keys arrive as lines on stdin (`z` up, `s` down, `q`
//! quit, an empty line releases) and the field is reported through a
//! [Renderer]. The human always has the left paddle.

use game_core::{Controller, Game, GameInfo, HumanController, KeySet, KeySource, Snapshot};
use std::{
    io::BufRead,
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::{Duration, Instant},
};

/// Key state described by one input line
pub fn parse_keys(line: &str) -> KeySet {
    let line = line.trim().to_ascii_lowercase();
    KeySet {
        up: line.contains('z'),
        down: line.contains('s'),
        quit: line.contains('q'),
    }
}

/// [KeySource] fed line by line from a background reader thread.
///
/// Each line replaces the held key state until the next one arrives. Closing
/// the input counts as quitting.
pub struct LineKeys {
    rx: Receiver<KeySet>,
    held: KeySet,
}

impl LineKeys {
    pub fn spawn<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in reader.lines() {
                let Ok(line) = line else { break };
                if tx.send(parse_keys(&line)).is_err() {
                    return;
                }
            }
            let _ = tx.send(KeySet {
                quit: true,
                ..Default::default()
            });
        });
        Self {
            rx,
            held: KeySet::default(),
        }
    }

    pub fn stdin() -> Self {
        Self::spawn(std::io::BufReader::new(std::io::stdin()))
    }
}

impl KeySource for LineKeys {
    fn poll_keys(&mut self) -> KeySet {
        match self.rx.try_recv() {
            Ok(keys) => self.held = keys,
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => self.held.quit = true,
        }
        self.held
    }
}

/// Anything that can show the field
pub trait Renderer {
    fn draw(&mut self, snapshot: &Snapshot);
}

/// Logs the scoreboard whenever it changes
#[derive(Debug, Default)]
pub struct LogRenderer {
    last: GameInfo,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, snapshot: &Snapshot) {
        let info = snapshot.info;
        if info.left_score != self.last.left_score || info.right_score != self.last.right_score {
            log::info!(
                "tick {}: you {} - {} network",
                snapshot.tick,
                info.left_score,
                info.right_score
            );
        } else if info != self.last {
            log::debug!(
                "tick {}: hits {} - {}, ball at ({:.0}, {:.0})",
                snapshot.tick,
                info.left_hits,
                info.right_hits,
                snapshot.ball.pos.x,
                snapshot.ball.pos.y
            );
        }
        self.last = info;
    }
}

/// Holds a loop to a fixed tick rate
#[derive(Debug)]
pub struct Pacer {
    period: Duration,
    next: Option<Instant>,
}

impl Pacer {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / ticks_per_second.max(1),
            next: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleep until the next tick is due. A loop that falls behind is not
    /// made to catch up.
    pub fn wait(&mut self) {
        let now = Instant::now();
        let due = self.next.unwrap_or(now);
        if due > now {
            thread::sleep(due - now);
        }
        self.next = Some(due.max(now) + self.period);
    }
}

/// Run the human on the left against `opponent` on the right until the
/// human quits. Scoring never ends the game here.
pub fn play<K: KeySource>(
    game: &mut Game,
    human: &mut HumanController<K>,
    opponent: &mut dyn Controller,
    renderer: &mut dyn Renderer,
    mut pacer: Option<&mut Pacer>,
) -> GameInfo {
    loop {
        if let Some(pacer) = pacer.as_mut() {
            pacer.wait();
        }
        let info = game.step(human, opponent);
        renderer.draw(&game.snapshot());
        if human.quit_requested() {
            game.terminate();
            return info;
        }
    }
}
