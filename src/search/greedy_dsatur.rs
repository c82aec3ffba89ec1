use std::cmp::Ordering;

use bit_set::BitSet;
use priority_queue::PriorityQueue;

use crate::color::{ColorId, VertexId};
use crate::graph::ColoringGraph;

#[derive(PartialEq, Eq)]
struct DSatInfo {
    dsat: usize,
    degree: usize
}

impl Ord for DSatInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dsat.cmp(&other.dsat)
            .then_with(|| self.degree.cmp(&other.degree))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for DSatInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/** implements a greedy DSATUR construction:
    1. choose an uncolored vertex that sees the most colors (break ties by the largest degree)
    2. assign it the first color it does not see
    3. mark all its neighbors as seeing this color
    4. repeat until every vertex is colored
returns the graph fully colored (a tighter starting base than the randomized
first-fit, at the price of being deterministic).
*/
pub fn greedy_dsatur(mut graph:ColoringGraph) -> ColoringGraph {
    let n:usize = graph.nb_vertices();
    let mut remaining_vertices:PriorityQueue<VertexId, DSatInfo> = PriorityQueue::new();
    for v in 0..n {
        remaining_vertices.push(v, DSatInfo { dsat:0, degree:graph.degree(v) });
    }
    let mut adj_colors:Vec<BitSet> = vec![BitSet::default() ; n]; // adj_colors[v] -> colors v sees
    loop {
        // get current vertex
        let current_vertex = match remaining_vertices.pop() {
            None => break,
            Some(v) => v.0
        };
        // assign it the first color it does not see
        let mut color:ColorId = 0;
        while adj_colors[current_vertex].contains(color) { color += 1; }
        graph.color_vertex(current_vertex, color);
        // update saturation degree information
        for conflict_vertex in graph.neighbors(current_vertex).iter()
        .filter(|conflict_vertex| graph.color_of(**conflict_vertex).is_none()) {
            if !adj_colors[*conflict_vertex].contains(color) {
                adj_colors[*conflict_vertex].insert(color);
                remaining_vertices.change_priority_by(conflict_vertex, |p| { p.dsat += 1; });
            }
        }
    }
    graph
}
