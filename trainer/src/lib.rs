//! Training and replay around the Pong simulation.
//!
//! [harness] scores a generation of genomes by round-robin self-play,
//! [persist] keeps the winning genome on disk and [play] pits it against a
//! person at the terminal.

pub mod harness;
pub mod persist;
pub mod play;

pub use harness::{credit, evaluate_population, play_match, MatchSettings};
pub use persist::{persist_best, restore_best};
pub use play::{parse_keys, play, LineKeys, LogRenderer, Pacer, Renderer};
