use crate::{Ball, Config, Events, GameInfo, Paddle, Side};
use hecs::World;

/// Resolve ball contact with paddles and walls.
///
/// Paddle contact wins over wall contact: when the ball meets a paddle the
/// wall check is skipped for that tick, since the paddle rewrites vy anyway.
pub fn check_collisions(world: &mut World, config: &Config, info: &mut GameInfo, events: &mut Events) {
    // Collect paddle data without holding borrows
    let paddles: Vec<Paddle> = world.query::<&Paddle>().iter().map(|(_e, p)| *p).collect();

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if let Some(side) = paddle_contact(ball, &paddles, config) {
            let paddle = paddles.iter().find(|p| p.side == side).copied();
            if let Some(paddle) = paddle {
                deflect(ball, &paddle, config);
                info.add_hit(side);
                events.ball_hit_paddle = Some(side);
                continue;
            }
        }

        let r = config.ball_radius;
        let hit_bottom = ball.pos.y + r >= config.field_height && ball.vel.y > 0.0;
        let hit_top = ball.pos.y - r <= 0.0 && ball.vel.y < 0.0;
        if hit_bottom || hit_top {
            ball.vel.y = -ball.vel.y;
            events.ball_hit_wall = true;
        }
    }
}

/// Which paddle, if any, the ball is touching while travelling toward it
fn paddle_contact(ball: &Ball, paddles: &[Paddle], config: &Config) -> Option<Side> {
    let r = config.ball_radius;
    // Only the paddle the ball is heading toward can be hit
    let side = if ball.vel.x < 0.0 {
        Side::Left
    } else if ball.vel.x > 0.0 {
        Side::Right
    } else {
        return None;
    };

    let paddle = paddles.iter().find(|p| p.side == side)?;
    if !paddle.spans(ball.pos.y, config) {
        return None;
    }

    let touching = match side {
        Side::Left => {
            ball.pos.x - r <= paddle.x + config.paddle_width && ball.pos.x + r >= paddle.x
        }
        Side::Right => {
            ball.pos.x + r >= paddle.x && ball.pos.x - r <= paddle.x + config.paddle_width
        }
    };
    touching.then_some(side)
}

/// Reflect horizontally and steer vertically by where the ball met the paddle.
/// A hit on the exact center sends the ball back flat; a hit on either tip
/// leaves at `ball_max_vel` vertically.
fn deflect(ball: &mut Ball, paddle: &Paddle, config: &Config) {
    ball.vel.x = -ball.vel.x;

    let offset = paddle.center_y(config) - ball.pos.y;
    let reduction = (config.paddle_height / 2.0) / config.ball_max_vel;
    ball.vel.y = -offset / reduction;
}
