use crate::{
    reproduction::reproduce, Checkpoint, Genome, GenomeId, InnoGen, NeatConfig, NeatError,
    Reporter, Result, SpeciesSet,
};
use rand::{rngs::StdRng, SeedableRng};
use std::path::Path;

/// A generation of genomes plus everything needed to breed the next one
pub struct Population {
    config: NeatConfig,
    genomes: Vec<Genome>,
    species: SpeciesSet,
    generation: usize,
    inno: InnoGen,
    next_genome_id: GenomeId,
    best: Option<Genome>,
    seed: u64,
    rng: StdRng,
    reporters: Vec<Box<dyn Reporter>>,
}

impl Population {
    /// A fresh, minimally wired population
    pub fn new(config: NeatConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut population = Self {
            inno: InnoGen::new(0, config.num_inputs + config.num_outputs),
            config,
            genomes: Vec::new(),
            species: SpeciesSet::new(),
            generation: 0,
            next_genome_id: 0,
            best: None,
            seed,
            rng: StdRng::seed_from_u64(seed),
            reporters: Vec::new(),
        };
        population.genomes = population.spawn_initial();
        population
            .species
            .speciate(&population.genomes, 0, &population.config);
        Ok(population)
    }

    /// Resume a population exactly where a checkpoint left it
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Result<Self> {
        checkpoint.config.validate()?;
        // the rng stream restarts, derived from the run seed and generation
        let rng = StdRng::seed_from_u64(checkpoint.seed ^ checkpoint.generation as u64);
        Ok(Self {
            config: checkpoint.config,
            genomes: checkpoint.genomes,
            species: checkpoint.species,
            generation: checkpoint.generation,
            inno: InnoGen::new(checkpoint.inno_head, checkpoint.node_head),
            next_genome_id: checkpoint.next_genome_id,
            best: checkpoint.best,
            seed: checkpoint.seed,
            rng,
            reporters: Vec::new(),
        })
    }

    pub fn restore<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_checkpoint(Checkpoint::restore(path)?)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            generation: self.generation,
            config: self.config.clone(),
            genomes: self.genomes.clone(),
            species: self.species.clone(),
            inno_head: self.inno.head,
            node_head: self.inno.node_head,
            next_genome_id: self.next_genome_id,
            best: self.best.clone(),
            seed: self.seed,
        }
    }

    pub fn add_reporter(&mut self, reporter: impl Reporter + 'static) {
        self.reporters.push(Box::new(reporter));
    }

    pub fn config(&self) -> &NeatConfig {
        &self.config
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn species(&self) -> &SpeciesSet {
        &self.species
    }

    /// Index of the generation that will be evaluated next
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best genome seen in any generation so far
    pub fn best(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    fn spawn_initial(&mut self) -> Vec<Genome> {
        (0..self.config.pop_size)
            .map(|_| {
                let id = self.next_genome_id;
                self.next_genome_id += 1;
                Genome::new(id, &self.config, &mut self.rng, &mut self.inno)
            })
            .collect()
    }

    fn report(&mut self, mut hook: impl FnMut(&mut dyn Reporter, &Population) -> Result<()>) -> Result<()> {
        let mut reporters = std::mem::take(&mut self.reporters);
        let this: &Population = self;
        let result = reporters
            .iter_mut()
            .try_for_each(|r| hook(r.as_mut(), this));
        self.reporters = reporters;
        result
    }

    /// Evolve for up to `generations` generations (forever if `None`), handing
    /// every generation to `fitness` to score in place. Stops early once the
    /// fitness threshold is met. Returns the best genome ever seen.
    pub fn run<F>(&mut self, mut fitness: F, generations: Option<usize>) -> Result<Genome>
    where
        F: FnMut(&mut [Genome], &NeatConfig),
    {
        let mut k = 0;
        while generations.map_or(true, |n| k < n) {
            k += 1;
            let generation = self.generation;
            self.report(|r, _| {
                r.start_generation(generation);
                Ok(())
            })?;

            for g in self.genomes.iter_mut() {
                g.fitness = None;
            }
            fitness(&mut self.genomes, &self.config);

            let unscored = self.genomes.iter().filter(|g| g.fitness.is_none()).count();
            if unscored > 0 {
                log::warn!("{unscored} genomes were left without fitness, scoring them 0");
            }

            let Some(best) = self
                .genomes
                .iter()
                .max_by(|l, r| l.fitness_or_zero().total_cmp(&r.fitness_or_zero()))
                .cloned()
            else {
                return Err(NeatError::Extinction);
            };
            let improved = self
                .best
                .as_ref()
                .map_or(true, |b| best.fitness_or_zero() > b.fitness_or_zero());
            if improved {
                self.best = Some(best.clone());
            }

            self.species.update_fitness(&self.genomes, generation);
            self.report(|r, p| {
                r.post_evaluate(p, &best);
                Ok(())
            })?;

            if !self.config.no_fitness_termination
                && best.fitness_or_zero() >= self.config.fitness_threshold
            {
                self.report(|r, _| {
                    r.found_solution(generation, &best);
                    Ok(())
                })?;
                break;
            }

            let removed = self.species.remove_stagnant(generation, &self.config);
            for (id, size) in removed {
                self.report(|r, _| {
                    r.species_stagnant(id, size);
                    Ok(())
                })?;
            }

            self.inno.next_generation();
            let mut next = reproduce(
                &self.species,
                &self.genomes,
                &self.config,
                &mut self.inno,
                &mut self.next_genome_id,
                &mut self.rng,
            );

            if next.is_empty() {
                self.report(|r, _| {
                    r.complete_extinction();
                    Ok(())
                })?;
                if !self.config.reset_on_extinction {
                    return Err(NeatError::Extinction);
                }
                self.species = SpeciesSet::new();
                next = self.spawn_initial();
            }

            self.genomes = next;
            self.generation += 1;
            self.species
                .speciate(&self.genomes, self.generation, &self.config);
            self.report(|r, p| r.end_generation(p))?;
        }

        self.best.clone().ok_or(NeatError::NoBest)
    }
}
