/// Game tuning parameters for Pong
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Field
    pub const FIELD_WIDTH: f32 = 1000.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 20.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    pub const PADDLE_STEP: f32 = 4.0; // units per tick
    pub const PADDLE_MARGIN: f32 = 10.0; // gap between paddle and side wall

    // Ball
    pub const BALL_RADIUS: f32 = 7.0;
    pub const BALL_MAX_VEL: f32 = 5.0; // units per tick
    pub const SERVE_ANGLE_DEG: i32 = 30; // serve angle drawn from [-30, 30), never 0

    // Match
    pub const WIN_SCORE: u32 = 1;
    pub const MAX_HITS: u32 = 50;

    // Replay
    pub const TICKS_PER_SECOND: u32 = 125;
}
