//! Hooks invoked by [Population::run] around every generation.

use crate::{Genome, Population, Result};
use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Instant};

pub trait Reporter {
    fn start_generation(&mut self, _generation: usize) {}

    /// After fitness is assigned, before reproduction
    fn post_evaluate(&mut self, _population: &Population, _best: &Genome) {}

    fn species_stagnant(&mut self, _species: usize, _size: usize) {}

    fn complete_extinction(&mut self) {}

    fn found_solution(&mut self, _generation: usize, _best: &Genome) {}

    /// After the next generation has been bred and speciated
    fn end_generation(&mut self, _population: &Population) -> Result<()> {
        Ok(())
    }
}

/// Lets a caller keep a handle on a reporter after handing it to a population
impl<R: Reporter> Reporter for Rc<RefCell<R>> {
    fn start_generation(&mut self, generation: usize) {
        self.borrow_mut().start_generation(generation)
    }

    fn post_evaluate(&mut self, population: &Population, best: &Genome) {
        self.borrow_mut().post_evaluate(population, best)
    }

    fn species_stagnant(&mut self, species: usize, size: usize) {
        self.borrow_mut().species_stagnant(species, size)
    }

    fn complete_extinction(&mut self) {
        self.borrow_mut().complete_extinction()
    }

    fn found_solution(&mut self, generation: usize, best: &Genome) {
        self.borrow_mut().found_solution(generation, best)
    }

    fn end_generation(&mut self, population: &Population) -> Result<()> {
        self.borrow_mut().end_generation(population)
    }
}

/// Progress summary through the `log` facade
#[derive(Debug, Default)]
pub struct StdOutReporter {
    show_species_detail: bool,
    started: Option<Instant>,
}

impl StdOutReporter {
    pub fn new(show_species_detail: bool) -> Self {
        Self {
            show_species_detail,
            started: None,
        }
    }
}

impl Reporter for StdOutReporter {
    fn start_generation(&mut self, generation: usize) {
        log::info!("****** running generation {generation} ******");
        self.started = Some(Instant::now());
    }

    fn post_evaluate(&mut self, population: &Population, best: &Genome) {
        let fits: Vec<f64> = population
            .genomes()
            .iter()
            .map(|g| g.fitness_or_zero())
            .collect();
        let (mean, stdev) = mean_stdev(&fits);
        log::info!("population's average fitness: {mean:.5} stdev: {stdev:.5}");
        log::info!(
            "best fitness: {:.5} - size: ({}, {}) - species {:?} - id {}",
            best.fitness_or_zero(),
            best.nodes.len(),
            best.connections.iter().filter(|c| c.enabled).count(),
            population.species().species_of(best.id),
            best.id
        );
    }

    fn species_stagnant(&mut self, species: usize, size: usize) {
        log::info!("species {species} with {size} members is stagnated: removing it");
    }

    fn complete_extinction(&mut self) {
        log::warn!("all species extinct");
    }

    fn found_solution(&mut self, generation: usize, best: &Genome) {
        log::info!(
            "best individual in generation {generation} meets fitness threshold - fitness {:.5}",
            best.fitness_or_zero()
        );
    }

    fn end_generation(&mut self, population: &Population) -> Result<()> {
        log::info!(
            "population of {} members in {} species",
            population.genomes().len(),
            population.species().len()
        );
        if self.show_species_detail {
            for s in population.species().iter() {
                log::info!(
                    "  species {:>3}: size {:>3}, age {:>3}, fitness {:?}, stagnant {}",
                    s.id,
                    s.len(),
                    population.generation().saturating_sub(s.created),
                    s.fitness,
                    s.stagnant_for(population.generation())
                );
            }
        }
        if let Some(started) = self.started.take() {
            log::info!("generation time: {:.3} sec", started.elapsed().as_secs_f64());
        }
        Ok(())
    }
}

/// Fitness figures of one evaluated generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    pub best: f64,
    pub mean: f64,
    pub stdev: f64,
    pub species: usize,
}

/// Keeps per-generation fitness statistics and each generation's champion
#[derive(Debug, Default)]
pub struct StatisticsReporter {
    pub most_fit: Vec<Genome>,
    pub generations: Vec<GenerationStats>,
}

impl StatisticsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best genome across every recorded generation
    pub fn best_genome(&self) -> Option<&Genome> {
        self.most_fit
            .iter()
            .max_by(|l, r| l.fitness_or_zero().total_cmp(&r.fitness_or_zero()))
    }

    pub fn mean_history(&self) -> Vec<f64> {
        self.generations.iter().map(|s| s.mean).collect()
    }
}

impl Reporter for StatisticsReporter {
    fn post_evaluate(&mut self, population: &Population, best: &Genome) {
        let fits: Vec<f64> = population
            .genomes()
            .iter()
            .map(|g| g.fitness_or_zero())
            .collect();
        let (mean, stdev) = mean_stdev(&fits);
        self.most_fit.push(best.clone());
        self.generations.push(GenerationStats {
            best: best.fitness_or_zero(),
            mean,
            stdev,
            species: population.species().len(),
        });
    }
}

/// Saves the population every `generation_interval` generations to
/// `{filename_prefix}{generation}`
#[derive(Debug)]
pub struct Checkpointer {
    generation_interval: usize,
    filename_prefix: PathBuf,
    last_saved: Option<usize>,
}

impl Checkpointer {
    pub fn new(generation_interval: usize, filename_prefix: impl Into<PathBuf>) -> Self {
        Self {
            generation_interval: generation_interval.max(1),
            filename_prefix: filename_prefix.into(),
            last_saved: None,
        }
    }

    /// Path used for the checkpoint taken after `generation` completed
    pub fn path_for(&self, generation: usize) -> PathBuf {
        let mut name = self.filename_prefix.clone().into_os_string();
        name.push(generation.to_string());
        PathBuf::from(name)
    }
}

impl Reporter for Checkpointer {
    fn end_generation(&mut self, population: &Population) -> Result<()> {
        let completed = population.generation().saturating_sub(1);
        let due = self
            .last_saved
            .map_or(true, |last| completed >= last + self.generation_interval);
        if !due {
            return Ok(());
        }

        let path = self.path_for(completed);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        log::info!("saving checkpoint to {}", path.display());
        population.checkpoint().save(&path)?;
        self.last_saved = Some(completed);
        Ok(())
    }
}

fn mean_stdev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0., 0.);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}
