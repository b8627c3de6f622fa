use crate::{Genome, GenomeId, InnoGen, NeatConfig, Species, SpeciesSet};
use rand::{seq::SliceRandom, Rng};

/// Fitness of each species relative to the whole population, scaled to
/// `[0, 1]` by the population's fitness range (never narrower than 1).
pub fn adjusted_fitness(species: &SpeciesSet, genomes: &[Genome]) -> Vec<f64> {
    let member_fitness = species
        .iter()
        .flat_map(|s| s.ranked(genomes))
        .map(|g| g.fitness_or_zero());
    let (min, max) = member_fitness.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), f| {
        (lo.min(f), hi.max(f))
    });
    if min > max {
        return vec![0.; species.len()];
    }
    let range = (max - min).max(1.);
    species
        .iter()
        .map(|s| (s.mean_fitness(genomes) - min) / range)
        .collect()
}

/// allocate a target population for every species from its adjusted fitness
pub fn spawn_amounts(adjusted: &[f64], pop_size: usize, min_species_size: usize) -> Vec<usize> {
    let total: f64 = adjusted.iter().sum();
    let pop = pop_size as f64;
    adjusted
        .iter()
        .map(|af| {
            let share = if total > 0. {
                pop * af / total
            } else {
                pop / adjusted.len() as f64
            };
            (share.round() as usize).max(min_species_size)
        })
        .collect()
}

/// Breed one species' allotment: elites carried over untouched, the rest
/// bred by crossover among the top `survival_threshold` then mutated.
pub fn reproduce_species(
    species: &Species,
    genomes: &[Genome],
    spawn: usize,
    config: &NeatConfig,
    inno: &mut InnoGen,
    next_id: &mut GenomeId,
    rng: &mut impl Rng,
) -> Vec<Genome> {
    let ranked = species.ranked(genomes);
    if ranked.is_empty() || spawn == 0 {
        return vec![];
    }

    let mut pop: Vec<Genome> = Vec::with_capacity(spawn);
    for elite in ranked.iter().take(config.elitism.min(spawn)) {
        pop.push(Genome {
            fitness: None,
            ..(*elite).clone()
        });
    }

    let cutoff = (config.survival_threshold * ranked.len() as f64).ceil() as usize;
    let survivors = &ranked[..cutoff.max(2).min(ranked.len())];

    while pop.len() < spawn {
        let (Some(l), Some(r)) = (survivors.choose(rng), survivors.choose(rng)) else {
            break;
        };
        let (fitter, other) = if l.fitness_or_zero() >= r.fitness_or_zero() {
            (l, r)
        } else {
            (r, l)
        };
        let mut child = Genome::crossover(fitter, other, *next_id, rng);
        *next_id += 1;
        child.mutate(config, rng, inno);
        pop.push(child);
    }

    pop
}

/// Build the next generation from every remaining species
pub fn reproduce(
    species: &SpeciesSet,
    genomes: &[Genome],
    config: &NeatConfig,
    inno: &mut InnoGen,
    next_id: &mut GenomeId,
    rng: &mut impl Rng,
) -> Vec<Genome> {
    let adjusted = adjusted_fitness(species, genomes);
    let spawn = spawn_amounts(&adjusted, config.pop_size, config.min_species_size);
    log::debug!("spawn amounts {spawn:?} from adjusted fitness {adjusted:?}");

    species
        .iter()
        .zip(spawn)
        .flat_map(|(s, n)| reproduce_species(s, genomes, n, config, inno, next_id, rng))
        .collect()
}
