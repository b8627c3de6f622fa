//! A compact NEAT (NeuroEvolution of Augmenting Topologies) engine.
//!
//! The surface is small on purpose: a [Population] hands its genomes to a
//! fitness callback once per generation, then speciates and reproduces them.
//! Networks are built from genomes with [FeedForward::create].

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod genome;
pub mod innovation;
pub mod network;
pub mod population;
pub mod reporter;
pub mod reproduction;
pub mod species;

pub use checkpoint::Checkpoint;
pub use config::{Activation, NeatConfig};
pub use error::{NeatError, Result};
pub use genome::{ConnectionGene, Genome, GenomeId, NodeGene, NodeKind};
pub use innovation::InnoGen;
pub use network::FeedForward;
pub use population::Population;
pub use reporter::{Checkpointer, Reporter, StatisticsReporter, StdOutReporter};
pub use species::{Species, SpeciesSet};
