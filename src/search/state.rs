use fastrand::Rng;

use crate::color::{ColorId, Solution, VertexId};
use crate::graph::ColoringGraph;

/**
Implements a solution state of the annealing search.

Each state owns its graph (coloring included), so generating a neighbor
never aliases the coloring of the state it was derived from. The objective
value (number of colors in use) is cached and kept in sync after every move;
it always matches a direct recount of the non-empty color classes.
*/
#[derive(Debug, Clone)]
pub struct SearchState {
    /// graph owned by this state, holding the coloring
    graph: ColoringGraph,
    /// cached objective value: number of colors in use
    value: usize,
}

impl SearchState {

    /** wraps an already-colored graph into a state */
    pub fn new(graph:ColoringGraph) -> Self {
        let value = graph.nb_used_colors();
        Self { graph, value }
    }

    /// objective value (number of colors in use), O(1)
    pub fn value(&self) -> usize { self.value }

    /// graph owned by this state
    pub fn graph(&self) -> &ColoringGraph { &self.graph }

    /// extracts the coloring as a partition into color classes
    pub fn solution(&self) -> Solution { self.graph.solution() }

    /** builds a starting state with a randomized first-fit greedy:
    repeatedly pick a uniformly random uncolored vertex and give it the first
    color legal for it (the very first vertex opens color 0). Produces a valid
    coloring with at most n colors; randomized per call so repeated runs
    explore different starting bases. */
    pub fn greedy_start(mut graph:ColoringGraph, rng:&mut Rng) -> Self {
        let mut pool:Vec<VertexId> = graph.vertices().collect();
        if !pool.is_empty() {
            let picked = pool.swap_remove(rng.usize(0..pool.len()));
            graph.color_vertex(picked, 0);
        }
        while !pool.is_empty() {
            let picked = pool.swap_remove(rng.usize(0..pool.len()));
            let color = first_legal_color(&graph, picked);
            graph.color_vertex(picked, color);
        }
        Self::new(graph)
    }

    /** generates a neighbor state: recolor one random vertex, then with
    probability `ls_probability` run the color-elimination local search on
    the result. The current state is left untouched (the neighbor owns a
    deep copy of the graph). */
    pub fn generate_neighbor(&self, rng:&mut Rng, ls_probability:f64) -> Self {
        let mut neighbor = self.clone();
        neighbor.randomize_vertex_color(rng);
        if rng.f64() < ls_probability {
            neighbor.local_search(rng);
        }
        neighbor
    }

    /** single-vertex recolor move: pick one vertex uniformly, strip its
    color, and give it a random legal color other than the one removed.
    When the picked color would push the objective past the current value
    while an already-used legal color exists, the lowest such color is used
    instead (the move can still go uphill, the acceptance rule decides).
    A vertex whose only legal color is the removed one gets it back (the
    neighbor degenerates to the current state). */
    fn randomize_vertex_color(&mut self, rng:&mut Rng) {
        let nb_vertices = self.graph.nb_vertices();
        let picked = rng.usize(0..nb_vertices);
        let removed = self.graph.color_of(picked)
            .expect("randomize_vertex_color: uncolored vertex in a search state");
        self.graph.clean_vertex(picked);
        let legal:Vec<ColorId> = (0..nb_vertices)
            .filter(|c| *c != removed && self.graph.can_use(picked, *c))
            .collect();
        if legal.is_empty() {
            self.graph.color_vertex(picked, removed);
            return;
        }
        let mut color = legal[rng.usize(0..legal.len())];
        // avoid opening a new class past the current value when a used color fits
        if self.graph.users_of(color).is_empty()
            && self.graph.nb_used_colors() + 1 > self.value {
            if let Some(alt) = legal.iter()
                .find(|c| !self.graph.users_of(**c).is_empty()) {
                color = *alt;
            }
        }
        self.graph.color_vertex(picked, color);
        self.value = self.graph.nb_used_colors();
    }

    /** color-elimination local search: sample one currently used color and
    strip it from every vertex holding it, re-inserting each by first-fit
    over the colors in increasing order. The stripped color is re-used only
    when a vertex has nothing legal below it. Directly lowers the objective
    when the whole class is redistributed. */
    pub fn local_search(&mut self, rng:&mut Rng) {
        let used = self.graph.used_colors();
        if used.is_empty() { return; }
        let target = used[rng.usize(0..used.len())];
        let holders:Vec<VertexId> = self.graph.users_of(target).to_vec();
        for v in holders {
            self.graph.clean_vertex(v);
            let color = first_legal_color(&self.graph, v);
            self.graph.color_vertex(v, color);
        }
        self.value = self.graph.nb_used_colors();
    }

    /** checks that the state does not violate the coloring restrictions:
    every vertex is colored and no neighbor shares its color. Reports each
    violation on stderr. Post-hoc validator, never a gate on acceptance. */
    pub fn check_correctness(&self) -> bool {
        let mut ok = true;
        for v in self.graph.vertices() {
            match self.graph.color_of(v) {
                None => {
                    eprintln!("[ERROR]: vertex {} has no color", v);
                    ok = false;
                }
                Some(c) => {
                    if !self.graph.can_use(v, c) {
                        eprintln!("[ERROR]: vertex {} should not have color {}", v, c);
                        ok = false;
                    }
                }
            }
        }
        ok
    }

    /** renders the coloring, one vertex per line, followed by the total */
    pub fn report(&self) -> String {
        let mut res = String::new();
        for v in self.graph.vertices() {
            match self.graph.color_of(v) {
                Some(c) => res += format!("vertex {} has color {}\n", v, c).as_str(),
                None => res += format!("vertex {} has no color\n", v).as_str(),
            }
        }
        res += format!("total colors used: {}\n", self.value).as_str();
        res
    }
}

/** first color legal for v, scanning in increasing order. With colors sized
as the vertex count, color n-1 is always free in the worst case; running out
indicates a logic bug, not bad input. */
fn first_legal_color(graph:&ColoringGraph, v:VertexId) -> ColorId {
    (0..graph.nb_vertices()).find(|c| graph.can_use(v, *c))
        .unwrap_or_else(|| panic!("no legal color for vertex {}", v))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn state_from_file(filename:&str, seed:u64) -> (SearchState, Rng) {
        let mut rng = Rng::with_seed(seed);
        let graph = ColoringGraph::from_file(filename).unwrap();
        let state = SearchState::greedy_start(graph, &mut rng);
        (state, rng)
    }

    fn recount(state:&SearchState) -> usize {
        state.graph().used_colors().len()
    }

    #[test]
    fn test_greedy_start_is_valid() {
        for seed in 0..10 {
            let (state,_) = state_from_file("insts/k5.col", seed);
            assert!(state.check_correctness());
            assert!(state.value() <= state.graph().nb_vertices());
            assert_eq!(state.value(), recount(&state));
        }
    }

    #[test]
    fn test_greedy_start_edgeless_uses_one_color() {
        let (state,_) = state_from_file("insts/empty10.col", 0);
        assert!(state.check_correctness());
        assert_eq!(state.value(), 1);
    }

    #[test]
    fn test_greedy_start_k5_uses_five_colors() {
        let (state,_) = state_from_file("insts/k5.col", 42);
        assert_eq!(state.value(), 5);
    }

    #[test]
    fn test_neighbors_stay_valid_and_in_sync() {
        let (mut state, mut rng) = state_from_file("insts/cycle6.col", 7);
        for _ in 0..200 {
            state = state.generate_neighbor(&mut rng, 0.2);
            assert!(state.check_correctness());
            assert_eq!(state.value(), recount(&state));
        }
    }

    #[test]
    fn test_neighbor_does_not_mutate_current() {
        let (state, mut rng) = state_from_file("insts/cycle6.col", 3);
        let before:Vec<Option<ColorId>> = state.graph().vertices()
            .map(|v| state.graph().color_of(v)).collect();
        for _ in 0..50 {
            let _neighbor = state.generate_neighbor(&mut rng, 0.2);
        }
        let after:Vec<Option<ColorId>> = state.graph().vertices()
            .map(|v| state.graph().color_of(v)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_neighbor_degenerates_on_complete_graph() {
        // on K5 every vertex sees the 4 other colors: the removed color is
        // the only legal one and the move must restore it
        let (state, mut rng) = state_from_file("insts/k5.col", 1);
        let neighbor = state.generate_neighbor(&mut rng, 0.0);
        assert_eq!(neighbor.value(), 5);
        assert!(neighbor.check_correctness());
    }

    #[test]
    fn test_local_search_keeps_validity() {
        let (mut state, mut rng) = state_from_file("insts/petersen.col", 11);
        for _ in 0..100 {
            state.local_search(&mut rng);
            assert!(state.check_correctness());
            assert_eq!(state.value(), recount(&state));
        }
    }

    #[test]
    fn test_local_search_never_needs_more_colors() {
        // the stripped color stays legal for every holder during the
        // redistribution, so first-fit cannot go past it
        let (mut state, mut rng) = state_from_file("insts/cycle6.col", 5);
        let mut previous = state.value();
        for _ in 0..100 {
            state.local_search(&mut rng);
            assert!(state.value() <= previous);
            previous = state.value();
        }
    }

    #[test]
    fn test_report_mentions_every_vertex() {
        let (state,_) = state_from_file("insts/cycle4.col", 0);
        let report = state.report();
        for v in state.graph().vertices() {
            assert!(report.contains(format!("vertex {} has color", v).as_str()));
        }
        assert!(report.contains(format!("total colors used: {}", state.value()).as_str()));
    }
}
