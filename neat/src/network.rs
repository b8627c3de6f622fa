//! Feed-forward networks expressed from [Genome]s.

use crate::{Activation, Genome, NeatConfig, NodeKind};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct NodeEval {
    slot: usize,
    bias: f64,
    links: Vec<(usize, f64)>,
}

/// A stateless network: `activate` is a pure function of its input.
///
/// Nodes are evaluated in topological order over the enabled connections.
/// Nodes with no incoming path just emit `σ(bias)`.
#[derive(Debug, Clone)]
pub struct FeedForward {
    inputs: Vec<usize>,
    outputs: Vec<usize>,
    evals: Vec<NodeEval>,
    slots: usize,
    activation: Activation,
}

impl FeedForward {
    pub fn create(genome: &Genome, config: &NeatConfig) -> Self {
        let slot_of: HashMap<usize, usize> = genome
            .nodes
            .iter()
            .enumerate()
            .map(|(slot, n)| (n.id, slot))
            .collect();

        let links: Vec<(usize, usize, f64)> = genome
            .connections
            .iter()
            .filter(|c| c.enabled)
            .filter_map(|c| Some((*slot_of.get(&c.from)?, *slot_of.get(&c.to)?, c.weight)))
            .collect();

        let order = topological_order(genome, &links);
        let evals = order
            .into_iter()
            .map(|slot| NodeEval {
                slot,
                bias: genome.nodes[slot].bias,
                links: links
                    .iter()
                    .filter(|(_, to, _)| *to == slot)
                    .map(|(from, _, w)| (*from, *w))
                    .collect(),
            })
            .collect();

        let slots_of = |kind| {
            genome
                .ids_of(kind)
                .iter()
                .filter_map(|id| slot_of.get(id).copied())
                .collect::<Vec<_>>()
        };

        FeedForward {
            inputs: slots_of(NodeKind::Sensory),
            outputs: slots_of(NodeKind::Action),
            evals,
            slots: genome.nodes.len(),
            activation: config.activation,
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Propagate `input` through the network. Missing inputs read as 0 and
    /// extra inputs are ignored.
    pub fn activate(&self, input: &[f64]) -> Vec<f64> {
        let mut state = vec![0.; self.slots];
        for (slot, value) in self.inputs.iter().zip(input) {
            state[*slot] = *value;
        }
        for node in self.evals.iter() {
            let sum = node
                .links
                .iter()
                .fold(node.bias, |acc, (from, w)| acc + state[*from] * w);
            state[node.slot] = self.activation.apply(sum);
        }
        self.outputs.iter().map(|slot| state[*slot]).collect()
    }
}

/// Kahn's algorithm over non-sensory nodes. Anything left over (only possible
/// for a corrupted, cyclic genome) is appended in genome order.
fn topological_order(genome: &Genome, links: &[(usize, usize, f64)]) -> Vec<usize> {
    let n = genome.nodes.len();
    let mut indegree = vec![0usize; n];
    for (_, to, _) in links {
        indegree[*to] += 1;
    }

    let mut ready: Vec<usize> = (0..n).filter(|s| indegree[*s] == 0).collect();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    while let Some(slot) = ready.pop() {
        visited[slot] = true;
        if genome.nodes[slot].kind != NodeKind::Sensory {
            order.push(slot);
        }
        for (_, to, _) in links.iter().filter(|(from, _, _)| *from == slot) {
            indegree[*to] -= 1;
            if indegree[*to] == 0 {
                ready.push(*to);
            }
        }
    }

    order.extend(
        (0..n).filter(|s| !visited[*s] && genome.nodes[*s].kind != NodeKind::Sensory),
    );
    order
}
