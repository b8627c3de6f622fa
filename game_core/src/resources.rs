use crate::Side;

/// Per-match scoreboard: points and rally hits for each side.
///
/// Every counter only ever goes up during a match. The session hands out
/// copies of this, never a reference into the live simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameInfo {
    pub left_hits: u32,
    pub right_hits: u32,
    pub left_score: u32,
    pub right_score: u32,
}

impl GameInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hit(&mut self, side: Side) {
        match side {
            Side::Left => self.left_hits += 1,
            Side::Right => self.right_hits += 1,
        }
    }

    pub fn add_point(&mut self, side: Side) {
        match side {
            Side::Left => self.left_score += 1,
            Side::Right => self.right_score += 1,
        }
    }

    pub fn hits(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_hits,
            Side::Right => self.right_hits,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }

    /// First side to reach `win_score`, left checked first
    pub fn has_winner(&self, win_score: u32) -> Option<Side> {
        [Side::Left, Side::Right]
            .into_iter()
            .find(|side| self.score(*side) >= win_score)
    }
}

/// Random number generator, seeded so ball serves are reproducible
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Events that occurred during this tick
#[derive(Debug, Clone, Default)]
pub struct Events {
    pub left_scored: bool,
    pub right_scored: bool,
    pub ball_hit_paddle: Option<Side>,
    pub ball_hit_wall: bool,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.left_scored = false;
        self.right_scored = false;
        self.ball_hit_paddle = None;
        self.ball_hit_wall = false;
    }

    /// Whether anything deflected or respawned the ball this tick
    pub fn any(&self) -> bool {
        self.left_scored || self.right_scored || self.ball_hit_paddle.is_some() || self.ball_hit_wall
    }
}
