use std::fs;
use std::path::Path;

use bit_set::BitSet;

use crate::color::{ColorId, Solution, VertexId};
use crate::dimacs::{read_from_file, ReadError};

/** models a Graph Coloring instance together with its current (partial) coloring.

The adjacency relation is built once at construction and immutable afterwards;
the coloring side (vertex colors, color classes, used-color counter) is the
mutable part the search states work on. Cloning the graph deep-copies the
coloring, so draft states never alias each other.
*/
#[derive(Debug, Clone)]
pub struct ColoringGraph {
    /// nb vertices
    n: usize,
    /// nb edges
    m: usize,
    /// edges of the graph
    edges: Vec<(VertexId,VertexId)>,
    /// adj_list[i]: list of vertices adjacent to i
    adj_list: Vec<Vec<VertexId>>,
    /// adj_matrix[i]: bitset of the neighbors of i
    adj_matrix: Vec<BitSet>,
    /// colors[v]: color currently assigned to v (None if uncolored)
    colors: Vec<Option<ColorId>>,
    /// users[c]: vertices currently holding color c
    users: Vec<Vec<VertexId>>,
    /// number of colors with a non-empty user list
    nb_used_colors: usize,
}

impl ColoringGraph {

    /// number of vertices
    pub fn nb_vertices(&self) -> usize { self.n }

    /// number of edges
    pub fn nb_edges(&self) -> usize { self.m }

    /// iterator over the vertex ids
    pub fn vertices(&self) -> std::ops::Range<VertexId> { 0..self.n }

    /// list of vertices adjacent to vertex v
    pub fn neighbors(&self, v:VertexId) -> &[VertexId] { &self.adj_list[v] }

    /// degree of vertex v
    pub fn degree(&self, v:VertexId) -> usize { self.adj_list[v].len() }

    /// edge list
    pub fn edges(&self) -> &[(VertexId, VertexId)] { &self.edges }

    /// returns true iff u and v are adjacent, O(1) through the bitset matrix
    pub fn are_adjacent(&self, u:VertexId, v:VertexId) -> bool {
        self.adj_matrix[u].contains(v)
    }

    /// color currently assigned to v (None if uncolored)
    pub fn color_of(&self, v:VertexId) -> Option<ColorId> { self.colors[v] }

    /// number of colors with at least one user
    pub fn nb_used_colors(&self) -> usize { self.nb_used_colors }

    /// vertices currently holding color c
    pub fn users_of(&self, c:ColorId) -> &[VertexId] { &self.users[c] }

    /// colors currently holding at least one vertex (for local-search sampling)
    pub fn used_colors(&self) -> Vec<ColorId> {
        (0..self.n).filter(|c| !self.users[*c].is_empty()).collect()
    }

    /** legality test: returns false iff some neighbor of v currently holds c.
    This is the hot path of every move (O(d(v))). */
    pub fn can_use(&self, v:VertexId, c:ColorId) -> bool {
        !self.adj_list[v].iter().any(|u| self.colors[*u] == Some(c))
    }

    /** assigns color c to vertex v and registers v in the class of c.
    The caller is responsible for checking `can_use` beforehand (the
    assignment does not re-traverse the neighborhood) and for cleaning a
    previously assigned color. */
    pub fn color_vertex(&mut self, v:VertexId, c:ColorId) {
        debug_assert!(self.colors[v].is_none());
        debug_assert!(self.can_use(v, c));
        if self.users[c].is_empty() {
            self.nb_used_colors += 1;
        }
        self.colors[v] = Some(c);
        self.users[c].push(v);
    }

    /** removes the color of vertex v; frees the color if v was its only user. */
    pub fn clean_vertex(&mut self, v:VertexId) {
        let c = self.colors[v].expect("clean_vertex: vertex has no color");
        let pos = self.users[c].iter().position(|u| *u == v)
            .expect("clean_vertex: vertex missing from its color class");
        self.users[c].swap_remove(pos);
        self.colors[v] = None;
        if self.users[c].is_empty() {
            self.nb_used_colors -= 1;
        }
    }

    /// builds the edge list
    fn build_edges(adj_list:&[Vec<VertexId>]) -> Vec<(VertexId,VertexId)> {
        let mut res = Vec::new();
        for (i,l) in adj_list.iter().enumerate() {
            for j in l {
                if i < *j {
                    res.push((i,*j));
                }
            }
        }
        res
    }

    /** constructor using an adjacency list (symmetric, no self-loops) */
    pub fn new(adj_list:Vec<Vec<VertexId>>) -> Self {
        let n = adj_list.len();
        // compute nb edges
        let mut m = 0;
        for e in &adj_list { // at the end: m = ∑ d(v)
            m += e.len();
        }
        m /= 2; // m = (∑ d(v)) / 2
        let edges = Self::build_edges(&adj_list);
        let mut adj_matrix = vec![BitSet::default(); n];
        for (a,row) in adj_matrix.iter_mut().enumerate() {
            for b in &adj_list[a] {
                row.insert(*b);
            }
        }
        Self {
            n, m, edges, adj_list, adj_matrix,
            colors: vec![None ; n],
            users: vec![Vec::new() ; n],
            nb_used_colors: 0,
        }
    }

    /// creates an instance from a DIMACS file
    pub fn from_file(filename:&str) -> Result<Self, ReadError> {
        let (_,_,adj_list) = read_from_file(filename)?;
        Ok(Self::new(adj_list))
    }

    /** extracts the current coloring as a partition (non-empty classes only,
    in increasing color order). */
    pub fn solution(&self) -> Solution {
        self.users.iter().filter(|class| !class.is_empty())
            .cloned().collect()
    }

    /// print statistics of the instance
    pub fn display_statistics(&self) {
        println!("\t{} \t vertices", self.nb_vertices());
        println!("\t{} \t edges", self.nb_edges());
        let degrees:Vec<usize> = (0..self.nb_vertices()).map(|i| self.degree(i)).collect();
        println!("\t{} \t min degree", degrees.iter().min().unwrap_or(&0));
        println!("\t{} \t max degree", degrees.iter().max().unwrap_or(&0));
    }

    /** writes a string encoding a solution (use this to export the solution) */
    pub fn solution_to_string(&self, solution:&[Vec<VertexId>]) -> String {
        let mut res = String::default();
        for class in solution {
            for v in class {
                res += format!("{} ", v).as_str();
            }
            res += "\n";
        }
        res
    }

    /** writes a solution into a file. each line corresponds to a color. */
    pub fn write_solution(&self, filename:&str, solution:&[Vec<VertexId>]) -> std::io::Result<()> {
        fs::write(Path::new(filename), self.solution_to_string(solution))
    }
}
