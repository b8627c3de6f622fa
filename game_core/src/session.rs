//! One Pong match: a world with two paddles and a ball, advanced a tick at a
//! time. The session never ends a match on its own; whoever drives it reads
//! the returned [GameInfo] and calls [Game::terminate].

use crate::{
    advance_tick, create_ball, create_paddle, Ball, Config, Controller, Decision, Direction,
    Events, GameInfo, GameRng, Observation, Paddle, Side,
};
use glam::Vec2;
use hecs::World;

/// Match lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    Running,
    Terminated,
}

/// Read-only view of the field for a renderer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub tick: u64,
    pub ball: Ball,
    pub left: Paddle,
    pub right: Paddle,
    pub info: GameInfo,
}

pub struct Game {
    world: World,
    config: Config,
    info: GameInfo,
    events: Events,
    rng: GameRng,
    state: MatchState,
    tick: u64,
}

impl Game {
    /// A fresh match with centered paddles and a ball served from the center
    pub fn new(config: Config, seed: u64) -> Self {
        let mut world = World::new();
        create_paddle(&mut world, &config, Side::Left);
        create_paddle(&mut world, &config, Side::Right);
        create_ball(&mut world, config.center(), Vec2::ZERO);

        let mut game = Self {
            world,
            config,
            info: GameInfo::new(),
            events: Events::new(),
            rng: GameRng::new(seed),
            state: MatchState::Running,
            tick: 0,
        };
        game.reset_ball();
        game
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == MatchState::Running
    }

    /// End the match. Further ticks leave the field untouched.
    pub fn terminate(&mut self) {
        self.state = MatchState::Terminated;
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Current scoreboard, by value
    pub fn info(&self) -> GameInfo {
        self.info
    }

    /// What happened on the most recent tick
    pub fn events(&self) -> &Events {
        &self.events
    }

    /// Re-serve the ball from the center
    pub fn reset_ball(&mut self) {
        for (_entity, ball) in self.world.query_mut::<&mut Ball>() {
            ball.reset(&self.config, &mut self.rng);
        }
    }

    pub fn move_paddle(&mut self, side: Side, direction: Direction) {
        crate::systems::move_paddle(&mut self.world, &self.config, side, direction);
    }

    /// Apply a controller's decision to one paddle
    pub fn apply(&mut self, side: Side, decision: Decision) {
        if let Some(direction) = decision.direction() {
            self.move_paddle(side, direction);
        }
    }

    /// Advance physics exactly one tick and report the scoreboard
    pub fn tick(&mut self) -> GameInfo {
        if self.state == MatchState::Running {
            advance_tick(
                &mut self.world,
                &self.config,
                &mut self.info,
                &mut self.events,
                &mut self.rng,
            );
            self.tick += 1;
        }
        self.info
    }

    /// Sample both controllers, move both paddles, then tick
    pub fn step(&mut self, left: &mut dyn Controller, right: &mut dyn Controller) -> GameInfo {
        let left_decision = left.decide(&self.observation(Side::Left));
        self.apply(Side::Left, left_decision);

        let right_decision = right.decide(&self.observation(Side::Right));
        self.apply(Side::Right, right_decision);

        self.tick()
    }

    pub fn ball(&self) -> Ball {
        self.world
            .query::<&Ball>()
            .iter()
            .map(|(_e, ball)| *ball)
            .next()
            .unwrap_or_else(|| Ball::new(self.config.center(), Vec2::ZERO))
    }

    pub fn paddle(&self, side: Side) -> Paddle {
        self.world
            .query::<&Paddle>()
            .iter()
            .map(|(_e, paddle)| *paddle)
            .find(|paddle| paddle.side == side)
            .unwrap_or_else(|| {
                Paddle::new(
                    side,
                    self.config.paddle_x(side),
                    self.config.paddle_start_y(),
                )
            })
    }

    /// Observation vector for the controller of `side`
    pub fn observation(&self, side: Side) -> Observation {
        Observation::new(&self.paddle(side), &self.ball())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            ball: self.ball(),
            left: self.paddle(Side::Left),
            right: self.paddle(Side::Right),
            info: self.info,
        }
    }

    #[cfg(test)]
    pub(crate) fn place_ball(&mut self, pos: Vec2, vel: Vec2) {
        for (_entity, ball) in self.world.query_mut::<&mut Ball>() {
            ball.pos = pos;
            ball.vel = vel;
        }
    }
}
