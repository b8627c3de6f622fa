use crate::{Config, GameRng};
use glam::Vec2;
use rand::Rng;

/// Which half of the field a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Vertical movement command for a paddle. Screen coordinates: up is -y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Up => -1.0,
            Direction::Down => 1.0,
        }
    }
}

/// Paddle component. `x`/`y` are the top-left corner.
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub side: Side,
    pub x: f32,
    pub y: f32,
}

impl Paddle {
    pub fn new(side: Side, x: f32, y: f32) -> Self {
        Self { side, x, y }
    }

    /// Y of the paddle's vertical midpoint
    pub fn center_y(&self, config: &Config) -> f32 {
        self.y + config.paddle_height / 2.0
    }

    /// Whether a point's Y falls within the paddle's vertical span
    pub fn spans(&self, y: f32, config: &Config) -> bool {
        y >= self.y && y <= self.y + config.paddle_height
    }
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Reset ball to center with a random serve direction.
    ///
    /// The serve angle is a whole number of degrees in
    /// `[-serve_angle_deg, serve_angle_deg)` excluding 0, so a serve is
    /// never flat and never vertical. Speed is always `ball_max_vel`.
    pub fn reset(&mut self, config: &Config, rng: &mut GameRng) {
        self.pos = config.center();

        let span = config.serve_angle_deg.max(1);
        let mut degrees = rng.0.gen_range(0..2 * span - 1) - span;
        if degrees >= 0 {
            degrees += 1;
        }
        let angle = (degrees as f32).to_radians();
        let toward_right = rng.0.gen_bool(0.5);
        let sign = if toward_right { 1.0 } else { -1.0 };

        self.vel = Vec2::new(
            sign * (angle.cos() * config.ball_max_vel).abs(),
            angle.sin() * config.ball_max_vel,
        );
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}
