use anyhow::{bail, Context, Result};
use neat::Genome;
use std::path::Path;

/// Write the winning genome to a single binary artifact
pub fn persist_best(genome: &Genome, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    genome
        .save(path)
        .with_context(|| format!("writing best genome to {}", path.display()))?;
    log::info!(
        "saved genome {} (fitness {:?}) to {}",
        genome.id,
        genome.fitness,
        path.display()
    );
    Ok(())
}

/// Read back a genome written by [persist_best]. A missing file is an error.
pub fn restore_best(path: &Path) -> Result<Genome> {
    if !path.exists() {
        bail!("no saved genome at {}, train one first", path.display());
    }
    Genome::load(path).with_context(|| format!("reading best genome from {}", path.display()))
}
