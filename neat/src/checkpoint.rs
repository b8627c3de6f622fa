//! Snapshot of a population between generations, stored as a postcard blob.

use crate::{Genome, GenomeId, NeatConfig, Result, SpeciesSet};
use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// the generation that will be evaluated next
    pub generation: usize,
    pub config: NeatConfig,
    pub genomes: Vec<Genome>,
    pub species: SpeciesSet,
    pub inno_head: usize,
    pub node_head: usize,
    pub next_genome_id: GenomeId,
    pub best: Option<Genome>,
    pub seed: u64,
}

impl Checkpoint {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(from_bytes(bytes)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn restore<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }
}
