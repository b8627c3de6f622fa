//! Controller adapter
//!
//! Turns a decision source (keyboard state or an evolved network) into paddle
//! movement. The session only ever sees [Controller] and [Decision].

use crate::{Ball, Direction, Paddle};

/// What a paddle's controller sees each tick:
/// `[own paddle y, ball y, ball x, |own paddle x - ball x|]`.
///
/// Evolved networks are trained against exactly this field order, so it must
/// not change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation(pub [f32; 4]);

impl Observation {
    pub fn new(own: &Paddle, ball: &Ball) -> Self {
        Self([
            own.y,
            ball.pos.y,
            ball.pos.x,
            (own.x - ball.pos.x).abs(),
        ])
    }

    /// Widened copy for network input
    pub fn inputs(&self) -> [f64; 4] {
        self.0.map(f64::from)
    }
}

/// Paddle command for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decision {
    #[default]
    Stay,
    Up,
    Down,
}

impl Decision {
    /// Index order matches a network's output vector
    pub const ALL: [Decision; 3] = [Decision::Stay, Decision::Up, Decision::Down];

    /// Stable argmax over output scores. The first maximum wins ties, NaN
    /// never wins, and anything without a usable score means `Stay`.
    pub fn from_scores(scores: &[f64]) -> Self {
        let mut best: Option<(usize, f64)> = None;
        for (idx, &score) in scores.iter().take(Self::ALL.len()).enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((idx, score)),
            }
        }
        best.map_or(Decision::Stay, |(idx, _)| Self::ALL[idx])
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Decision::Stay => None,
            Decision::Up => Some(Direction::Up),
            Decision::Down => Some(Direction::Down),
        }
    }
}

/// Anything that can drive a paddle
pub trait Controller {
    fn decide(&mut self, observation: &Observation) -> Decision;
}

/// Discrete key state for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeySet {
    pub up: bool,
    pub down: bool,
    pub quit: bool,
}

impl KeySet {
    /// Holding both movement keys cancels out
    pub fn decision(&self) -> Decision {
        match (self.up, self.down) {
            (true, false) => Decision::Up,
            (false, true) => Decision::Down,
            _ => Decision::Stay,
        }
    }
}

/// Source of keyboard state, polled once per tick
pub trait KeySource {
    fn poll_keys(&mut self) -> KeySet;
}

/// Paddle driven by a person at the keyboard
pub struct HumanController<K: KeySource> {
    keys: K,
    last: KeySet,
}

impl<K: KeySource> HumanController<K> {
    pub fn new(keys: K) -> Self {
        Self {
            keys,
            last: KeySet::default(),
        }
    }

    /// Whether the most recent poll carried the quit signal
    pub fn quit_requested(&self) -> bool {
        self.last.quit
    }
}

impl<K: KeySource> Controller for HumanController<K> {
    fn decide(&mut self, _observation: &Observation) -> Decision {
        self.last = self.keys.poll_keys();
        self.last.decision()
    }
}

/// Paddle driven by a decision function, typically an evolved network
pub struct NetworkController<F> {
    decide_fn: F,
}

impl<F: FnMut(&[f64]) -> Vec<f64>> NetworkController<F> {
    pub fn new(decide_fn: F) -> Self {
        Self { decide_fn }
    }
}

impl<F: FnMut(&[f64]) -> Vec<f64>> Controller for NetworkController<F> {
    fn decide(&mut self, observation: &Observation) -> Decision {
        let scores = (self.decide_fn)(&observation.inputs());
        Decision::from_scores(&scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Side};
    use glam::Vec2;

    struct Scripted(Vec<KeySet>);

    impl KeySource for Scripted {
        fn poll_keys(&mut self) -> KeySet {
            if self.0.is_empty() {
                KeySet::default()
            } else {
                self.0.remove(0)
            }
        }
    }

    #[test]
    fn test_observation_field_order() {
        let config = Config::new();
        let paddle = Paddle::new(Side::Right, config.paddle_x(Side::Right), 120.0);
        let ball = Ball::new(Vec2::new(400.0, 300.0), Vec2::new(5.0, 1.0));

        let obs = Observation::new(&paddle, &ball);

        assert_eq!(obs.0, [120.0, 300.0, 400.0, 570.0]);
        assert_eq!(obs.inputs(), [120.0, 300.0, 400.0, 570.0]);
    }

    #[test]
    fn test_argmax_picks_highest() {
        assert_eq!(Decision::from_scores(&[0.1, 0.9, 0.3]), Decision::Up);
        assert_eq!(Decision::from_scores(&[0.1, 0.2, 0.3]), Decision::Down);
        assert_eq!(Decision::from_scores(&[0.5, 0.2, 0.3]), Decision::Stay);
    }

    #[test]
    fn test_argmax_ties_go_to_lowest_index() {
        assert_eq!(Decision::from_scores(&[0.7, 0.7, 0.7]), Decision::Stay);
        assert_eq!(Decision::from_scores(&[0.1, 0.7, 0.7]), Decision::Up);
    }

    #[test]
    fn test_argmax_degenerate_scores() {
        assert_eq!(Decision::from_scores(&[]), Decision::Stay);
        assert_eq!(Decision::from_scores(&[f64::NAN; 3]), Decision::Stay);
        assert_eq!(Decision::from_scores(&[f64::NAN, 0.0, 1.0]), Decision::Down);
        assert_eq!(Decision::from_scores(&[-3.0]), Decision::Stay);
    }

    #[test]
    fn test_network_controller_is_deterministic() {
        let weights = [0.3, -1.2, 0.01, 0.5];
        let net = |input: &[f64]| {
            let s: f64 = input.iter().zip(weights).map(|(i, w)| i * w).sum();
            vec![s.sin(), s.cos(), (s * 0.5).sin()]
        };
        let mut a = NetworkController::new(net);
        let mut b = NetworkController::new(net);

        for i in 0..200 {
            let f = i as f32;
            let obs = Observation([f, 800.0 - f, f * 3.0, (970.0 - f * 3.0).abs()]);
            let first = a.decide(&obs);
            assert_eq!(first, a.decide(&obs), "Same controller, same input");
            assert_eq!(first, b.decide(&obs), "Same function, same input");
        }
    }

    #[test]
    fn test_human_controller_maps_keys() {
        let keys = Scripted(vec![
            KeySet { up: true, ..Default::default() },
            KeySet { down: true, ..Default::default() },
            KeySet { up: true, down: true, quit: false },
            KeySet { quit: true, ..Default::default() },
        ]);
        let mut human = HumanController::new(keys);
        let obs = Observation([0.0; 4]);

        assert_eq!(human.decide(&obs), Decision::Up);
        assert_eq!(human.decide(&obs), Decision::Down);
        assert_eq!(human.decide(&obs), Decision::Stay, "Both keys cancel");
        assert!(!human.quit_requested());
        assert_eq!(human.decide(&obs), Decision::Stay);
        assert!(human.quit_requested());
    }

    #[test]
    fn test_decision_direction() {
        assert_eq!(Decision::Stay.direction(), None);
        assert_eq!(Decision::Up.direction(), Some(Direction::Up));
        assert_eq!(Decision::Down.direction(), Some(Direction::Down));
    }
}
