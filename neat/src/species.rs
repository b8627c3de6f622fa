use crate::{Genome, GenomeId, NeatConfig};
use serde::{Deserialize, Serialize};

/// A cluster of structurally similar genomes, represented by one of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: usize,
    pub created: usize,
    pub last_improved: usize,
    pub representative: Genome,
    pub members: Vec<GenomeId>,
    /// best member fitness from the latest evaluation
    pub fitness: Option<f64>,
    pub fitness_history: Vec<f64>,
}

impl Species {
    fn new(id: usize, generation: usize, representative: Genome) -> Self {
        Self {
            id,
            created: generation,
            last_improved: generation,
            members: vec![representative.id],
            representative,
            fitness: None,
            fitness_history: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members sorted best first
    pub fn ranked<'a>(&self, genomes: &'a [Genome]) -> Vec<&'a Genome> {
        let mut ranked: Vec<&Genome> = genomes
            .iter()
            .filter(|g| self.members.contains(&g.id))
            .collect();
        ranked.sort_by(|l, r| r.fitness_or_zero().total_cmp(&l.fitness_or_zero()));
        ranked
    }

    /// Mean member fitness
    pub fn mean_fitness(&self, genomes: &[Genome]) -> f64 {
        let ranked = self.ranked(genomes);
        if ranked.is_empty() {
            return 0.;
        }
        ranked.iter().map(|g| g.fitness_or_zero()).sum::<f64>() / ranked.len() as f64
    }

    pub fn stagnant_for(&self, generation: usize) -> usize {
        generation.saturating_sub(self.last_improved)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSet {
    pub species: Vec<Species>,
    next_id: usize,
}

impl SpeciesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    /// Species id of a genome, if it has been speciated
    pub fn species_of(&self, genome: GenomeId) -> Option<usize> {
        self.species
            .iter()
            .find(|s| s.members.contains(&genome))
            .map(|s| s.id)
    }

    /// Partition `genomes` into species.
    ///
    /// Surviving species first adopt the genome closest to their old
    /// representative, then every other genome joins the first species within
    /// the compatibility threshold or founds a new one. Emptied species vanish.
    pub fn speciate(&mut self, genomes: &[Genome], generation: usize, config: &NeatConfig) {
        let mut unspeciated: Vec<&Genome> = genomes.iter().collect();

        for species in self.species.iter_mut() {
            species.members.clear();
            let closest = unspeciated
                .iter()
                .enumerate()
                .map(|(idx, g)| (idx, species.representative.distance(g, config)))
                .min_by(|l, r| l.1.total_cmp(&r.1));
            if let Some((idx, _)) = closest {
                let genome = unspeciated.swap_remove(idx);
                species.representative = genome.clone();
                species.members.push(genome.id);
            }
        }
        self.species.retain(|s| !s.is_empty());

        // keep population order so assignment doesn't depend on swap_remove
        unspeciated.sort_by_key(|g| g.id);
        for genome in unspeciated {
            let home = self
                .species
                .iter_mut()
                .find(|s| s.representative.distance(genome, config) < config.compatibility_threshold);
            match home {
                Some(species) => species.members.push(genome.id),
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    self.species.push(Species::new(id, generation, genome.clone()));
                }
            }
        }
    }

    /// Record each species' best fitness and note improvement
    pub fn update_fitness(&mut self, genomes: &[Genome], generation: usize) {
        for species in self.species.iter_mut() {
            let best = species
                .ranked(genomes)
                .first()
                .map(|g| g.fitness_or_zero())
                .unwrap_or(0.);
            let previous = species
                .fitness_history
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            if best > previous {
                species.last_improved = generation;
            }
            species.fitness = Some(best);
            species.fitness_history.push(best);
        }
    }

    /// Drop species that have not improved for `max_stagnation` generations,
    /// sparing the `species_elitism` best. Returns `(id, size)` of each removed.
    pub fn remove_stagnant(&mut self, generation: usize, config: &NeatConfig) -> Vec<(usize, usize)> {
        let mut by_fitness: Vec<(usize, f64)> = self
            .species
            .iter()
            .map(|s| (s.id, s.fitness.unwrap_or(0.)))
            .collect();
        by_fitness.sort_by(|l, r| r.1.total_cmp(&l.1));
        let protected: Vec<usize> = by_fitness
            .iter()
            .take(config.species_elitism)
            .map(|(id, _)| *id)
            .collect();

        let mut removed = Vec::new();
        self.species.retain(|s| {
            let stagnant = s.stagnant_for(generation) >= config.max_stagnation;
            if stagnant && !protected.contains(&s.id) {
                removed.push((s.id, s.len()));
                false
            } else {
                true
            }
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InnoGen;
    use rand::{rngs::StdRng, SeedableRng};

    fn population(n: u64, config: &NeatConfig) -> Vec<Genome> {
        let mut rng = StdRng::seed_from_u64(5);
        let mut inno = InnoGen::new(0, 7);
        (0..n)
            .map(|id| Genome::new(id, config, &mut rng, &mut inno))
            .collect()
    }

    fn with_fitness(mut genomes: Vec<Genome>, f: impl Fn(GenomeId) -> f64) -> Vec<Genome> {
        for g in genomes.iter_mut() {
            g.fitness = Some(f(g.id));
        }
        genomes
    }

    #[test]
    fn test_every_genome_lands_in_one_species() {
        let config = NeatConfig::default();
        let genomes = population(30, &config);
        let mut set = SpeciesSet::new();

        set.speciate(&genomes, 0, &config);

        let total: usize = set.iter().map(|s| s.len()).sum();
        assert_eq!(total, 30);
        for g in genomes.iter() {
            assert_eq!(set.iter().filter(|s| s.members.contains(&g.id)).count(), 1);
            assert!(set.species_of(g.id).is_some());
        }
    }

    #[test]
    fn test_tight_threshold_splits_loose_threshold_merges() {
        let genomes = population(20, &NeatConfig::default());

        let loose = NeatConfig {
            compatibility_threshold: 1e9,
            ..Default::default()
        };
        let mut set = SpeciesSet::new();
        set.speciate(&genomes, 0, &loose);
        assert_eq!(set.len(), 1);

        let tight = NeatConfig {
            compatibility_threshold: 1e-9,
            ..Default::default()
        };
        let mut set = SpeciesSet::new();
        set.speciate(&genomes, 0, &tight);
        assert_eq!(set.len(), 20);
    }

    #[test]
    fn test_species_persist_across_generations() {
        let config = NeatConfig::default();
        let genomes = population(10, &config);
        let mut set = SpeciesSet::new();
        set.speciate(&genomes, 0, &config);
        let ids: Vec<usize> = set.iter().map(|s| s.id).collect();

        set.speciate(&genomes, 1, &config);

        let again: Vec<usize> = set.iter().map(|s| s.id).collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn test_ranked_best_first() {
        let config = NeatConfig {
            compatibility_threshold: 1e9,
            ..Default::default()
        };
        let genomes = with_fitness(population(5, &config), |id| (id * 7 % 5) as f64);
        let mut set = SpeciesSet::new();
        set.speciate(&genomes, 0, &config);

        let ranked = set.species[0].ranked(&genomes);
        let fits: Vec<f64> = ranked.iter().map(|g| g.fitness_or_zero()).collect();
        assert_eq!(fits, vec![4., 3., 2., 1., 0.]);
        assert_eq!(set.species[0].mean_fitness(&genomes), 2.);
    }

    #[test]
    fn test_stagnation_spares_elite_species() {
        let config = NeatConfig {
            compatibility_threshold: 1e-9,
            max_stagnation: 3,
            species_elitism: 1,
            ..Default::default()
        };
        let genomes = with_fitness(population(3, &config), |id| id as f64);
        let mut set = SpeciesSet::new();
        set.speciate(&genomes, 0, &config);
        for generation in 0..5 {
            set.update_fitness(&genomes, generation);
        }

        let removed = set.remove_stagnant(5, &config);

        assert_eq!(removed.len(), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.species[0].fitness, Some(2.), "Best species is kept");
    }
}
