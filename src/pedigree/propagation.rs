use crate::error::{Result, SuccessionError};
use crate::pedigree::graph::RelatednessGraph;
use crate::types::PropagationPolicy;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::visit::Bfs;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, trace};

/// Pushes relatedness from the founder to every reachable descendant.
///
/// Each examined parent -> child edge adds half of the parent's current
/// coefficient to the child. The run happens at most once per graph; later
/// calls return immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelatednessPropagator {
    policy: PropagationPolicy,
}

impl RelatednessPropagator {
    pub fn new(policy: PropagationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> PropagationPolicy {
        self.policy
    }

    /// Compute relatedness for `graph` unless it has been computed already.
    pub fn propagate(&self, graph: &mut RelatednessGraph) -> Result<()> {
        if graph.is_computed() {
            debug!("Relatedness already computed, skipping propagation");
            return Ok(());
        }

        let founder = graph.prepare_founder()?;
        let examined = match self.policy {
            PropagationPolicy::BreadthFirst => Self::breadth_first(graph, founder),
            PropagationPolicy::Topological => Self::topological(graph, founder)?,
        };

        graph.mark_computed();
        info!(
            "Propagated relatedness from {} over {} edges ({})",
            graph.person(founder),
            examined,
            self.policy
        );
        Ok(())
    }

    /// Single pass in discovery order. An edge is applied when its parent is
    /// dequeued, whether or not the child was seen before.
    fn breadth_first(graph: &mut RelatednessGraph, founder: NodeIndex) -> usize {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut examined = 0;

        queue.push_back(founder);
        visited.insert(founder);

        while let Some(current) = queue.pop_front() {
            for child in graph.children(current) {
                relax(graph, founder, current, child);
                examined += 1;

                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        examined
    }

    /// Every parent reachable from the founder is final before its edges fire.
    fn topological(graph: &mut RelatednessGraph, founder: NodeIndex) -> Result<usize> {
        let order = toposort(graph.inner(), None).map_err(|cycle| {
            SuccessionError::CyclicPedigree(graph.person(cycle.node_id()).name().to_string())
        })?;

        let mut reachable = HashSet::new();
        let mut bfs = Bfs::new(graph.inner(), founder);
        while let Some(index) = bfs.next(graph.inner()) {
            reachable.insert(index);
        }

        let mut examined = 0;
        for current in order {
            if !reachable.contains(&current) {
                continue;
            }
            for child in graph.children(current) {
                relax(graph, founder, current, child);
                examined += 1;
            }
        }

        Ok(examined)
    }
}

/// Apply one examined edge. The founder's coefficient stays fixed at 1.0.
fn relax(graph: &mut RelatednessGraph, founder: NodeIndex, parent: NodeIndex, child: NodeIndex) {
    if child == founder {
        return;
    }

    let contribution = graph.person(parent).relatedness() / 2.0;
    let target = graph.person_mut(child);
    target.add_relatedness(contribution);

    trace!(
        "Edge {} -> {}: +{} = {}",
        graph.person(parent),
        graph.person(child),
        contribution,
        graph.person(child).relatedness()
    );
}
