use crate::{NeatError, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Node activation function, applied to `bias + Σ weight * input`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Sigmoid,
    Tanh,
    Relu,
    Identity,
}

impl Activation {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            // Steepened and clamped so large sums saturate instead of overflowing
            Activation::Sigmoid => 1. / (1. + (-5. * x.clamp(-60., 60.)).exp()),
            Activation::Tanh => (2.5 * x.clamp(-60., 60.)).tanh(),
            Activation::Relu => x.max(0.),
            Activation::Identity => x,
        }
    }
}

/// Tunables for a NEAT run. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeatConfig {
    pub pop_size: usize,
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub activation: Activation,

    /// stop once the best genome of a generation reaches this
    pub fitness_threshold: f64,
    pub no_fitness_termination: bool,
    /// start over from a fresh population instead of failing on extinction
    pub reset_on_extinction: bool,

    pub bias_init_stdev: f64,
    pub bias_mutate_rate: f64,
    pub bias_mutate_power: f64,
    pub bias_replace_rate: f64,

    pub weight_init_stdev: f64,
    pub weight_mutate_rate: f64,
    pub weight_mutate_power: f64,
    pub weight_replace_rate: f64,
    pub weight_max: f64,

    pub enabled_mutate_rate: f64,
    pub conn_add_prob: f64,
    pub node_add_prob: f64,

    pub compatibility_threshold: f64,
    pub compatibility_disjoint_coefficient: f64,
    pub compatibility_weight_coefficient: f64,

    pub max_stagnation: usize,
    pub species_elitism: usize,

    pub elitism: usize,
    pub survival_threshold: f64,
    pub min_species_size: usize,
}

impl Default for NeatConfig {
    fn default() -> Self {
        Self {
            pop_size: 50,
            num_inputs: 4,
            num_outputs: 3,
            activation: Activation::Sigmoid,

            fitness_threshold: 400.,
            no_fitness_termination: false,
            reset_on_extinction: false,

            bias_init_stdev: 1.,
            bias_mutate_rate: 0.7,
            bias_mutate_power: 0.5,
            bias_replace_rate: 0.1,

            weight_init_stdev: 1.,
            weight_mutate_rate: 0.8,
            weight_mutate_power: 0.5,
            weight_replace_rate: 0.1,
            weight_max: 30.,

            enabled_mutate_rate: 0.01,
            conn_add_prob: 0.5,
            node_add_prob: 0.2,

            compatibility_threshold: 3.,
            compatibility_disjoint_coefficient: 1.,
            compatibility_weight_coefficient: 0.5,

            max_stagnation: 20,
            species_elitism: 2,

            elitism: 2,
            survival_threshold: 0.2,
            min_species_size: 2,
        }
    }
}

impl NeatConfig {
    /// Read and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(NeatError::Config(msg.to_string()));

        if self.pop_size == 0 {
            return fail("pop_size must be at least 1");
        }
        if self.num_inputs == 0 || self.num_outputs == 0 {
            return fail("networks need at least one input and one output");
        }
        let rates = [
            ("bias_mutate_rate", self.bias_mutate_rate),
            ("bias_replace_rate", self.bias_replace_rate),
            ("weight_mutate_rate", self.weight_mutate_rate),
            ("weight_replace_rate", self.weight_replace_rate),
            ("enabled_mutate_rate", self.enabled_mutate_rate),
            ("conn_add_prob", self.conn_add_prob),
            ("node_add_prob", self.node_add_prob),
        ];
        for (name, rate) in rates {
            if !(0. ..=1.).contains(&rate) {
                return Err(NeatError::Config(format!("{name} must be within [0, 1]")));
            }
        }
        if !(self.survival_threshold > 0. && self.survival_threshold <= 1.) {
            return fail("survival_threshold must be within (0, 1]");
        }
        if self.weight_max <= 0. {
            return fail("weight_max must be positive");
        }
        if self.compatibility_threshold <= 0. {
            return fail("compatibility_threshold must be positive");
        }
        if self.min_species_size == 0 {
            return fail("min_species_size must be at least 1");
        }
        Ok(())
    }
}
