use std::collections::HashMap;

/// Hands out innovation numbers for connections and ids for new nodes.
///
/// Within one generation the same structural mutation gets the same number
/// in every genome, so crossover can line their genes up.
#[derive(Debug, Clone)]
pub struct InnoGen {
    pub head: usize,
    pub node_head: usize,
    paths: HashMap<(usize, usize), usize>,
    splits: HashMap<usize, usize>,
}

impl InnoGen {
    pub fn new(head: usize, node_head: usize) -> Self {
        Self {
            head,
            node_head,
            paths: HashMap::new(),
            splits: HashMap::new(),
        }
    }

    /// Innovation number of the connection `from -> to`
    pub fn path(&mut self, v: (usize, usize)) -> usize {
        match self.paths.get(&v) {
            Some(n) => *n,
            None => {
                let n = self.head;
                self.head += 1;
                self.paths.insert(v, n);
                n
            }
        }
    }

    /// Node id for the node that bisects connection `inno`
    pub fn split(&mut self, inno: usize) -> usize {
        match self.splits.get(&inno) {
            Some(n) => *n,
            None => {
                let n = self.node_head;
                self.node_head += 1;
                self.splits.insert(inno, n);
                n
            }
        }
    }

    /// Forget this generation's mutations, keep the counters
    pub fn next_generation(&mut self) {
        self.paths.clear();
        self.splits.clear();
    }
}
