use crate::{InnoGen, NeatConfig, Result};
use postcard::{from_bytes, to_allocvec};
use rand::{seq::SliceRandom, Rng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

pub type GenomeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Sensory,
    Action,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGene {
    pub id: usize,
    pub kind: NodeKind,
    pub bias: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGene {
    /// gene innovation id
    pub inno: usize,
    pub from: usize,
    pub to: usize,
    pub weight: f64,
    /// whether or not this connection affects its genome's behavior
    pub enabled: bool,
}

/// An evolvable network description plus the fitness it earned.
///
/// Node ids `0..num_inputs` are the sensory nodes and the next `num_outputs`
/// ids are the action nodes, in output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub id: GenomeId,
    /// None until evaluated
    pub fitness: Option<f64>,
    pub nodes: Vec<NodeGene>,
    pub connections: Vec<ConnectionGene>,
}

fn gauss(rng: &mut impl Rng, stdev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    z * stdev
}

/// Nudge, replace, or keep a parameter, then clamp it
fn mutate_param(
    value: f64,
    rate: f64,
    power: f64,
    replace_rate: f64,
    init_stdev: f64,
    limit: f64,
    rng: &mut impl Rng,
) -> f64 {
    let roll: f64 = rng.gen();
    let v = if roll < rate {
        value + gauss(rng, power)
    } else if roll < rate + replace_rate {
        gauss(rng, init_stdev)
    } else {
        value
    };
    v.clamp(-limit, limit)
}

impl Genome {
    /// A minimal genome: every input wired straight to every output
    pub fn new(id: GenomeId, config: &NeatConfig, rng: &mut impl Rng, inno: &mut InnoGen) -> Self {
        let sensory = 0..config.num_inputs;
        let action = config.num_inputs..config.num_inputs + config.num_outputs;

        let mut nodes = Vec::with_capacity(sensory.len() + action.len());
        nodes.extend(sensory.clone().map(|id| NodeGene {
            id,
            kind: NodeKind::Sensory,
            bias: 0.,
        }));
        nodes.extend(action.clone().map(|id| NodeGene {
            id,
            kind: NodeKind::Action,
            bias: gauss(rng, config.bias_init_stdev),
        }));

        let mut connections = Vec::with_capacity(sensory.len() * action.len());
        for from in sensory {
            for to in action.clone() {
                connections.push(ConnectionGene {
                    inno: inno.path((from, to)),
                    from,
                    to,
                    weight: gauss(rng, config.weight_init_stdev),
                    enabled: true,
                });
            }
        }

        Self {
            id,
            fitness: None,
            nodes,
            connections,
        }
    }

    pub fn fitness_or_zero(&self) -> f64 {
        self.fitness.unwrap_or(0.)
    }

    pub fn node(&self, id: usize) -> Option<&NodeGene> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Ids of nodes of one kind, in genome order
    pub fn ids_of(&self, kind: NodeKind) -> Vec<usize> {
        self.nodes
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.id)
            .collect()
    }

    /// Perform 0 or more mutations on this genome
    pub fn mutate(&mut self, config: &NeatConfig, rng: &mut impl Rng, inno: &mut InnoGen) {
        if rng.gen_bool(config.node_add_prob) {
            self.mutate_add_node(rng, inno);
        }
        if rng.gen_bool(config.conn_add_prob) {
            self.mutate_add_connection(config, rng, inno);
        }
        self.mutate_params(config, rng);
    }

    /// Perturb weights and biases, and occasionally flip a connection on or off
    pub fn mutate_params(&mut self, config: &NeatConfig, rng: &mut impl Rng) {
        for c in self.connections.iter_mut() {
            c.weight = mutate_param(
                c.weight,
                config.weight_mutate_rate,
                config.weight_mutate_power,
                config.weight_replace_rate,
                config.weight_init_stdev,
                config.weight_max,
                rng,
            );
            if rng.gen_bool(config.enabled_mutate_rate) {
                c.enabled = !c.enabled;
            }
        }
        for n in self.nodes.iter_mut().filter(|n| n.kind != NodeKind::Sensory) {
            n.bias = mutate_param(
                n.bias,
                config.bias_mutate_rate,
                config.bias_mutate_power,
                config.bias_replace_rate,
                config.bias_init_stdev,
                config.weight_max,
                rng,
            );
        }
    }

    /// Wire two unconnected nodes together. Returns whether the genome changed.
    pub fn mutate_add_connection(
        &mut self,
        config: &NeatConfig,
        rng: &mut impl Rng,
        inno: &mut InnoGen,
    ) -> bool {
        let sources: Vec<usize> = self
            .nodes
            .iter()
            .filter(|n| n.kind != NodeKind::Action)
            .map(|n| n.id)
            .collect();
        let targets: Vec<usize> = self
            .nodes
            .iter()
            .filter(|n| n.kind != NodeKind::Sensory)
            .map(|n| n.id)
            .collect();

        let (Some(&from), Some(&to)) = (sources.choose(rng), targets.choose(rng)) else {
            return false;
        };
        if from == to {
            return false;
        }

        if let Some(c) = self
            .connections
            .iter_mut()
            .find(|c| c.from == from && c.to == to)
        {
            // an existing but disabled path is revived rather than duplicated
            if c.enabled {
                return false;
            }
            c.enabled = true;
            return true;
        }

        if self.creates_cycle(from, to) {
            return false;
        }

        self.connections.push(ConnectionGene {
            inno: inno.path((from, to)),
            from,
            to,
            weight: gauss(rng, config.weight_init_stdev),
            enabled: true,
        });
        true
    }

    /// Bisect an enabled connection with a new node. Returns whether the genome changed.
    pub fn mutate_add_node(&mut self, rng: &mut impl Rng, inno: &mut InnoGen) -> bool {
        let enabled: Vec<usize> = self
            .connections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.enabled)
            .map(|(idx, _)| idx)
            .collect();
        let Some(&idx) = enabled.choose(rng) else {
            return false;
        };

        let split = self.connections[idx].clone();
        let node = inno.split(split.inno);
        if self.node(node).is_some() {
            return false;
        }

        self.connections[idx].enabled = false;
        self.nodes.push(NodeGene {
            id: node,
            kind: NodeKind::Internal,
            bias: 0.,
        });
        self.connections.push(ConnectionGene {
            inno: inno.path((split.from, node)),
            from: split.from,
            to: node,
            weight: 1.,
            enabled: true,
        });
        self.connections.push(ConnectionGene {
            inno: inno.path((node, split.to)),
            from: node,
            to: split.to,
            weight: split.weight,
            enabled: true,
        });
        true
    }

    /// Whether adding `from -> to` would close a loop. Disabled connections
    /// count, since they may be re-enabled later.
    pub fn creates_cycle(&self, from: usize, to: usize) -> bool {
        if from == to {
            return true;
        }
        let mut seen = HashSet::from([to]);
        let mut stack = vec![to];
        while let Some(node) = stack.pop() {
            for c in self.connections.iter().filter(|c| c.from == node) {
                if c.to == from {
                    return true;
                }
                if seen.insert(c.to) {
                    stack.push(c.to);
                }
            }
        }
        false
    }

    /// Crossover reproduction. Matching genes are inherited from either parent
    /// at random; disjoint and excess genes only from `fitter`.
    pub fn crossover(fitter: &Genome, other: &Genome, id: GenomeId, rng: &mut impl Rng) -> Genome {
        let theirs: HashMap<usize, &ConnectionGene> =
            other.connections.iter().map(|c| (c.inno, c)).collect();

        let connections = fitter
            .connections
            .iter()
            .map(|mine| match theirs.get(&mine.inno) {
                Some(their) => {
                    let mut gene = if rng.gen_bool(0.5) {
                        mine.clone()
                    } else {
                        (*their).clone()
                    };
                    // a gene disabled in either parent usually stays disabled
                    gene.enabled = if mine.enabled && their.enabled {
                        true
                    } else {
                        !rng.gen_bool(0.75)
                    };
                    gene
                }
                None => mine.clone(),
            })
            .collect();

        let nodes = fitter
            .nodes
            .iter()
            .map(|mine| match other.node(mine.id) {
                Some(their) if rng.gen_bool(0.5) => NodeGene {
                    bias: their.bias,
                    ..mine.clone()
                },
                _ => mine.clone(),
            })
            .collect();

        Genome {
            id,
            fitness: None,
            nodes,
            connections,
        }
    }

    /// Compatibility distance: disjoint/excess gene share plus mean weight
    /// difference of matching genes. Genomes with no overlap in weights add 0
    /// for the weight term.
    pub fn distance(&self, other: &Genome, config: &NeatConfig) -> f64 {
        let theirs: HashMap<usize, f64> = other
            .connections
            .iter()
            .map(|c| (c.inno, c.weight))
            .collect();

        let mut matching = 0usize;
        let mut weight_diff = 0.;
        for c in self.connections.iter() {
            if let Some(w) = theirs.get(&c.inno) {
                matching += 1;
                weight_diff += (c.weight - w).abs();
            }
        }

        let disjoint = (self.connections.len() - matching) + (other.connections.len() - matching);
        let n = self.connections.len().max(other.connections.len()).max(1) as f64;
        let avg_weight_diff = if matching == 0 {
            0.
        } else {
            weight_diff / matching as f64
        };

        config.compatibility_disjoint_coefficient * disjoint as f64 / n
            + config.compatibility_weight_coefficient * avg_weight_diff
    }

    /// Serialize genome to an opaque binary blob
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(to_allocvec(self)?)
    }

    /// Deserialize genome from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(from_bytes(bytes)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn setup() -> (NeatConfig, StdRng, InnoGen) {
        let config = NeatConfig::default();
        let inno = InnoGen::new(0, config.num_inputs + config.num_outputs);
        (config, StdRng::seed_from_u64(3), inno)
    }

    #[test]
    fn test_new_genome_is_fully_connected() {
        let (config, mut rng, mut inno) = setup();
        let g = Genome::new(1, &config, &mut rng, &mut inno);

        assert_eq!(g.ids_of(NodeKind::Sensory), vec![0, 1, 2, 3]);
        assert_eq!(g.ids_of(NodeKind::Action), vec![4, 5, 6]);
        assert_eq!(g.connections.len(), 12);
        assert!(g.connections.iter().all(|c| c.enabled));
        assert_eq!(g.fitness, None);

        // Same wiring, same innovation numbers across the population
        let h = Genome::new(2, &config, &mut rng, &mut inno);
        let innos = |g: &Genome| g.connections.iter().map(|c| c.inno).collect::<Vec<_>>();
        assert_eq!(innos(&g), innos(&h));
    }

    #[test]
    fn test_add_node_bisects() {
        let (config, mut rng, mut inno) = setup();
        let mut g = Genome::new(1, &config, &mut rng, &mut inno);

        assert!(g.mutate_add_node(&mut rng, &mut inno));

        assert_eq!(g.nodes.len(), 8);
        assert_eq!(g.connections.len(), 14);
        let hidden = g.ids_of(NodeKind::Internal);
        assert_eq!(hidden, vec![7]);
        let disabled: Vec<_> = g.connections.iter().filter(|c| !c.enabled).collect();
        assert_eq!(disabled.len(), 1);
        let split = disabled[0];
        assert!(g
            .connections
            .iter()
            .any(|c| c.from == split.from && c.to == 7 && c.weight == 1.));
        assert!(g
            .connections
            .iter()
            .any(|c| c.from == 7 && c.to == split.to && c.weight == split.weight));
    }

    #[test]
    fn test_add_connection_never_cycles() {
        let (config, mut rng, mut inno) = setup();
        let mut g = Genome::new(1, &config, &mut rng, &mut inno);
        for _ in 0..40 {
            g.mutate_add_node(&mut rng, &mut inno);
            g.mutate_add_connection(&config, &mut rng, &mut inno);
        }
        for c in g.connections.iter() {
            assert_ne!(c.from, c.to);
            let others = Genome {
                connections: g
                    .connections
                    .iter()
                    .filter(|o| o.inno != c.inno)
                    .cloned()
                    .collect(),
                ..g.clone()
            };
            assert!(
                !others.creates_cycle(c.from, c.to),
                "connection {} -> {} closes a loop",
                c.from,
                c.to
            );
        }
    }

    #[test]
    fn test_creates_cycle() {
        let (config, mut rng, mut inno) = setup();
        let mut g = Genome::new(1, &config, &mut rng, &mut inno);
        g.nodes.push(NodeGene {
            id: 7,
            kind: NodeKind::Internal,
            bias: 0.,
        });
        g.connections.push(ConnectionGene {
            inno: 99,
            from: 7,
            to: 4,
            weight: 1.,
            enabled: false,
        });
        assert!(g.creates_cycle(4, 7), "disabled links still count");
        assert!(g.creates_cycle(7, 7));
        assert!(!g.creates_cycle(0, 7));
    }

    #[test]
    fn test_params_stay_clamped() {
        let (mut config, mut rng, mut inno) = setup();
        config.weight_mutate_power = 100.;
        config.bias_mutate_power = 100.;
        config.weight_max = 2.;
        let mut g = Genome::new(1, &config, &mut rng, &mut inno);
        for _ in 0..50 {
            g.mutate_params(&config, &mut rng);
        }
        assert!(g.connections.iter().all(|c| c.weight.abs() <= 2.));
        assert!(g.nodes.iter().all(|n| n.bias.abs() <= 2.));
        assert!(g
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Sensory)
            .all(|n| n.bias == 0.));
    }

    #[test]
    fn test_crossover_takes_structure_from_fitter() {
        let (config, mut rng, mut inno) = setup();
        let mut fitter = Genome::new(1, &config, &mut rng, &mut inno);
        let other = Genome::new(2, &config, &mut rng, &mut inno);
        fitter.mutate_add_node(&mut rng, &mut inno);

        let child = Genome::crossover(&fitter, &other, 3, &mut rng);

        assert_eq!(child.id, 3);
        assert_eq!(child.fitness, None);
        assert_eq!(child.nodes.len(), fitter.nodes.len());
        let innos = |g: &Genome| g.connections.iter().map(|c| c.inno).collect::<Vec<_>>();
        assert_eq!(innos(&child), innos(&fitter));
        for c in child.connections.iter() {
            let from_either = fitter.connections.iter().chain(other.connections.iter());
            assert!(from_either
                .filter(|p| p.inno == c.inno)
                .any(|p| p.weight == c.weight));
        }
    }

    #[test]
    fn test_distance() {
        let (config, mut rng, mut inno) = setup();
        let g = Genome::new(1, &config, &mut rng, &mut inno);
        assert_eq!(g.distance(&g, &config), 0.);

        let mut h = g.clone();
        for c in h.connections.iter_mut() {
            c.weight += 1.;
        }
        let d = g.distance(&h, &config);
        assert!((d - config.compatibility_weight_coefficient).abs() < 1e-9);

        let mut k = g.clone();
        k.mutate_add_node(&mut rng, &mut inno);
        // two new genes out of fourteen
        let d = g.distance(&k, &config);
        assert!((d - 2. / 14.).abs() < 1e-9);
        assert_eq!(d, k.distance(&g, &config));
    }

    #[test]
    fn test_bytes_round_trip() {
        let (config, mut rng, mut inno) = setup();
        let mut g = Genome::new(9, &config, &mut rng, &mut inno);
        g.mutate_add_node(&mut rng, &mut inno);
        g.fitness = Some(17.);

        let back = Genome::from_bytes(&g.to_bytes().unwrap()).unwrap();
        assert_eq!(back, g);
        assert!(Genome::from_bytes(&[0xff, 0xff]).is_err());
    }
}
