//! Round-robin evaluation: every genome plays every other genome once, and
//! each side is credited with the hits it made during the rally.

use game_core::{Config, Controller, Game, GameInfo, NetworkController, Params, Side};
use neat::{FeedForward, Genome, NeatConfig};

/// When a training match stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSettings {
    pub win_score: u32,
    /// the match also stops once the left side has hit more than this
    pub max_hits: u32,
    /// serve seed of the first match; later matches count up from it
    pub seed: u64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            win_score: Params::WIN_SCORE,
            max_hits: Params::MAX_HITS,
            seed: 0,
        }
    }
}

impl MatchSettings {
    /// Either side reached the win score, or the left side passed the hit cap
    pub fn is_over(&self, info: &GameInfo) -> bool {
        info.has_winner(self.win_score).is_some() || info.hits(Side::Left) > self.max_hits
    }
}

/// Run one match to completion and return the final scoreboard
pub fn play_match(
    left: &mut dyn Controller,
    right: &mut dyn Controller,
    settings: &MatchSettings,
    config: &Config,
    seed: u64,
) -> GameInfo {
    let mut game = Game::new(config.clone(), seed);
    loop {
        let info = game.step(left, right);
        if settings.is_over(&info) {
            game.terminate();
            return info;
        }
    }
}

/// Add each side's hits to its genome's fitness
pub fn credit(left: &mut Genome, right: &mut Genome, info: &GameInfo) {
    left.fitness = Some(left.fitness_or_zero() + f64::from(info.hits(Side::Left)));
    right.fitness = Some(right.fitness_or_zero() + f64::from(info.hits(Side::Right)));
}

/// Score a generation in place. Genome `i` plays every `j > i`, taking the
/// left paddle. Fitness that is already set is added to, never replaced.
pub fn evaluate_population(
    genomes: &mut [Genome],
    neat_config: &NeatConfig,
    settings: &MatchSettings,
    config: &Config,
) {
    let nets: Vec<FeedForward> = genomes
        .iter()
        .map(|g| FeedForward::create(g, neat_config))
        .collect();

    let mut seed = settings.seed;
    for i in 0..genomes.len() {
        genomes[i].fitness.get_or_insert(0.);
        for j in i + 1..genomes.len() {
            genomes[j].fitness.get_or_insert(0.);

            let mut left = NetworkController::new(|input: &[f64]| nets[i].activate(input));
            let mut right = NetworkController::new(|input: &[f64]| nets[j].activate(input));
            let info = play_match(&mut left, &mut right, settings, config, seed);
            seed = seed.wrapping_add(1);

            let (head, tail) = genomes.split_at_mut(j);
            log::debug!(
                "genome {} vs {}: hits {}-{}, score {}-{}",
                head[i].id,
                tail[0].id,
                info.left_hits,
                info.right_hits,
                info.left_score,
                info.right_score
            );
            credit(&mut head[i], &mut tail[0], &info);
        }
    }
}
