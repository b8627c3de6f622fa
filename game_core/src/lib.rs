pub mod components;
pub mod config;
pub mod controller;
pub mod params;
pub mod resources;
pub mod session;
pub mod systems;

pub use components::*;
pub use config::*;
pub use controller::*;
pub use params::*;
pub use resources::*;
pub use session::*;

use hecs::World;
use systems::*;

/// Advance the deterministic Pong simulation by exactly one tick
pub fn advance_tick(
    world: &mut World,
    config: &Config,
    info: &mut GameInfo,
    events: &mut Events,
    rng: &mut GameRng,
) {
    // Clear events at start of tick
    events.clear();

    // 1. Move ball
    move_ball(world);

    // 2. Check collisions (ball vs paddles, walls)
    check_collisions(world, config, info, events);

    // 3. Check scoring (ball exited field)
    check_scoring(world, config, info, events, rng);
}

/// Helper to create a paddle entity at its side's starting position
pub fn create_paddle(world: &mut World, config: &Config, side: Side) -> hecs::Entity {
    world.spawn((Paddle::new(
        side,
        config.paddle_x(side),
        config.paddle_start_y(),
    ),))
}

/// Helper to create the ball entity
pub fn create_ball(world: &mut World, pos: glam::Vec2, vel: glam::Vec2) -> hecs::Entity {
    world.spawn((Ball::new(pos, vel),))
}
