use game_core::{Config, Controller, Decision, NetworkController, Observation};
use neat::{Checkpointer, FeedForward, NeatConfig, Population};
use trainer::*;

struct Fixed(Decision);

impl Controller for Fixed {
    fn decide(&mut self, _observation: &Observation) -> Decision {
        self.0
    }
}

fn small_config() -> NeatConfig {
    NeatConfig {
        pop_size: 6,
        fitness_threshold: 1e9,
        ..Default::default()
    }
}

#[test]
fn test_round_robin_scores_everyone() {
    let neat_config = small_config();
    let population = Population::new(neat_config.clone(), 7).unwrap();
    let mut genomes = population.genomes().to_vec();

    evaluate_population(
        &mut genomes,
        &neat_config,
        &MatchSettings::default(),
        &Config::new(),
    );

    assert!(genomes.iter().all(|g| g.fitness.is_some()));
    assert!(genomes.iter().all(|g| g.fitness_or_zero() >= 0.));
}

#[test]
fn test_each_pair_plays_once_lower_index_on_left() {
    let neat_config = NeatConfig {
        pop_size: 3,
        ..small_config()
    };
    let population = Population::new(neat_config.clone(), 12).unwrap();
    let settings = MatchSettings {
        seed: 40,
        ..Default::default()
    };
    let field = Config::new();

    let mut genomes = population.genomes().to_vec();
    evaluate_population(&mut genomes, &neat_config, &settings, &field);

    let nets: Vec<FeedForward> = population
        .genomes()
        .iter()
        .map(|g| FeedForward::create(g, &neat_config))
        .collect();
    let mut expected = [0.; 3];
    for (k, (i, j)) in [(0, 1), (0, 2), (1, 2)].into_iter().enumerate() {
        let mut left = NetworkController::new(|input: &[f64]| nets[i].activate(input));
        let mut right = NetworkController::new(|input: &[f64]| nets[j].activate(input));
        let info = play_match(&mut left, &mut right, &settings, &field, settings.seed + k as u64);
        expected[i] += f64::from(info.left_hits);
        expected[j] += f64::from(info.right_hits);
    }

    let actual: Vec<f64> = genomes.iter().map(|g| g.fitness.unwrap()).collect();
    assert_eq!(actual, expected.to_vec());
}

#[test]
fn test_existing_fitness_is_added_to() {
    let neat_config = small_config();
    let population = Population::new(neat_config.clone(), 8).unwrap();
    let settings = MatchSettings {
        seed: 3,
        ..Default::default()
    };

    let mut fresh = population.genomes().to_vec();
    evaluate_population(&mut fresh, &neat_config, &settings, &Config::new());

    let mut primed = population.genomes().to_vec();
    for g in primed.iter_mut() {
        g.fitness = Some(100.);
    }
    evaluate_population(&mut primed, &neat_config, &settings, &Config::new());

    for (f, p) in fresh.iter().zip(primed.iter()) {
        assert_eq!(p.fitness_or_zero(), f.fitness_or_zero() + 100.);
    }
}

#[test]
fn test_single_point_ends_match() {
    let settings = MatchSettings::default();
    let info = play_match(
        &mut Fixed(Decision::Up),
        &mut Fixed(Decision::Down),
        &settings,
        &Config::new(),
        21,
    );
    assert!(settings.is_over(&info));
    assert!(info.left_score == 1 || info.right_score == 1);
    assert!(info.left_score + info.right_score == 1);
}

#[test]
fn test_training_run_checkpoints_and_resumes() {
    let dir = std::env::temp_dir().join("pong-neat-training-test");
    std::fs::remove_dir_all(&dir).ok();
    let prefix = dir.join("checkpoint-");

    let neat_config = small_config();
    let settings = MatchSettings::default();
    let field = Config::new();
    let mut population = Population::new(neat_config, 9).unwrap();
    let checkpointer = Checkpointer::new(1, &prefix);
    let first = checkpointer.path_for(0);
    population.add_reporter(checkpointer);

    let best = population
        .run(
            |genomes, config| evaluate_population(genomes, config, &settings, &field),
            Some(2),
        )
        .unwrap();
    assert!(best.fitness.is_some());
    assert!(first.exists());

    let path = dir.join("best.genome");
    persist_best(&best, &path).unwrap();
    assert_eq!(restore_best(&path).unwrap(), best);

    let mut resumed = Population::restore(dir.join("checkpoint-1")).unwrap();
    assert_eq!(resumed.generation(), 2);
    resumed
        .run(
            |genomes, config| evaluate_population(genomes, config, &settings, &field),
            Some(1),
        )
        .unwrap();
    assert_eq!(resumed.generation(), 3);

    std::fs::remove_dir_all(&dir).ok();
}
