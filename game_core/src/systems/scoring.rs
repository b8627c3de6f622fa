use crate::{Ball, Config, Events, GameInfo, GameRng, Side};
use hecs::World;

/// Check if ball left the field (scoring). Exactly one point per miss.
pub fn check_scoring(
    world: &mut World,
    config: &Config,
    info: &mut GameInfo,
    events: &mut Events,
    rng: &mut GameRng,
) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        let missed = if ball.pos.x < 0.0 {
            Side::Left
        } else if ball.pos.x > config.field_width {
            Side::Right
        } else {
            continue;
        };

        let scorer = missed.opponent();
        info.add_point(scorer);
        match scorer {
            Side::Left => events.left_scored = true,
            Side::Right => events.right_scored = true,
        }
        ball.reset(config, rng);
    }
}
