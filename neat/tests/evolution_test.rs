use neat::*;
use std::{cell::RefCell, rc::Rc};

/// Reward output 0 for tracking the sign of input 0
fn sign_task(genomes: &mut [Genome], config: &NeatConfig) {
    let cases = [([1., 0., 0., 0.], 1.), ([-1., 0., 0., 0.], 0.), ([0.5, 0., 0., 0.], 1.)];
    for g in genomes.iter_mut() {
        let net = FeedForward::create(g, config);
        let err: f64 = cases
            .iter()
            .map(|(input, want)| (net.activate(input)[0] - want).powi(2))
            .sum();
        g.fitness = Some(cases.len() as f64 - err);
    }
}

fn config() -> NeatConfig {
    NeatConfig {
        pop_size: 30,
        fitness_threshold: 1e9,
        ..Default::default()
    }
}

#[test]
fn test_evolution_improves_or_holds_best() {
    let mut population = Population::new(config(), 17).unwrap();
    let stats = Rc::new(RefCell::new(StatisticsReporter::new()));
    population.add_reporter(stats.clone());

    let best = population.run(sign_task, Some(10)).unwrap();

    let stats = stats.borrow();
    assert_eq!(stats.generations.len(), 10);
    let first = stats.generations[0].best;
    assert!(best.fitness_or_zero() >= first);
    assert!(stats.generations.iter().all(|s| s.stdev >= 0. && s.species >= 1));
}

#[test]
fn test_same_seed_same_run() {
    let mut a = Population::new(config(), 23).unwrap();
    let mut b = Population::new(config(), 23).unwrap();

    let best_a = a.run(sign_task, Some(4)).unwrap();
    let best_b = b.run(sign_task, Some(4)).unwrap();

    assert_eq!(best_a, best_b);
    assert_eq!(a.genomes(), b.genomes());
}

#[test]
fn test_checkpointer_writes_restorable_files() {
    let dir = std::env::temp_dir().join("neat-checkpointer-test");
    std::fs::remove_dir_all(&dir).ok();

    let mut population = Population::new(config(), 31).unwrap();
    population.add_reporter(Checkpointer::new(2, dir.join("gen-")));
    population.run(sign_task, Some(5)).unwrap();

    assert!(dir.join("gen-0").exists());
    assert!(!dir.join("gen-1").exists());
    assert!(dir.join("gen-2").exists());
    assert!(dir.join("gen-4").exists());

    let restored = Population::restore(dir.join("gen-4")).unwrap();
    assert_eq!(restored.generation(), 5);
    assert_eq!(restored.genomes(), population.genomes());
    assert_eq!(restored.config(), population.config());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_config_file_round_trip() {
    let path = std::env::temp_dir().join("neat-config-test.json");
    let config = NeatConfig {
        pop_size: 77,
        activation: Activation::Tanh,
        ..Default::default()
    };
    std::fs::write(&path, config.to_json().unwrap()).unwrap();

    let loaded = NeatConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
}

#[test]
fn test_partial_config_uses_defaults() {
    let config = NeatConfig::from_json(r#"{ "pop_size": 12, "fitness_threshold": 40.0 }"#).unwrap();
    assert_eq!(config.pop_size, 12);
    assert_eq!(config.num_inputs, 4);
    assert_eq!(config.num_outputs, 3);
}

#[test]
fn test_missing_config_is_an_error() {
    let path = std::env::temp_dir().join("neat-config-missing.json");
    assert!(matches!(NeatConfig::load(path), Err(NeatError::Io(_))));
}
