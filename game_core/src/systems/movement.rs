use crate::{Ball, Config, Direction, Paddle, Side};
use hecs::World;

/// Step one paddle by the fixed paddle step, clamped to the field
pub fn move_paddle(world: &mut World, config: &Config, side: Side, direction: Direction) {
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        if paddle.side == side {
            let y = paddle.y + direction.sign() * config.paddle_step;
            paddle.y = config.clamp_paddle_y(y);
        }
    }
}

/// Move ball by one tick of velocity
pub fn move_ball(world: &mut World) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.pos += ball.vel;
    }
}
