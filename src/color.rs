use bit_set::BitSet;

use crate::graph::ColoringGraph;

/** Vertex Id */
pub type VertexId = usize;

/** Color Id (colors are indices in [0,n): n colors suffice in the worst case) */
pub type ColorId = usize;

/** Solution of a graph coloring problem
(represented as a partition into color classes).
*/
pub type Solution = Vec<Vec<VertexId>>;

/** result of checking a solution */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    /// the solution is feasible and uses the given number of colors
    Ok(usize),
    /// some vertex appears in two color classes
    VertexAddedTwice(VertexId),
    /// some vertex appears in no color class
    VertexNotColored(VertexId),
    /// two adjacent vertices share a color class
    ConflictingEdge(VertexId, VertexId),
}

/**
checks a solution against the instance graph:
 - every vertex belongs to exactly one color class
 - no color class contains two adjacent vertices
returns the objective (number of classes) if the solution is feasible,
otherwise the first violation found.
*/
pub fn checker(graph:&ColoringGraph, sol:&[Vec<VertexId>]) -> CheckerResult {
    // check that all vertices are added exactly once
    let mut visited = BitSet::new();
    for class in sol {
        for v in class {
            if visited.contains(*v) {
                return CheckerResult::VertexAddedTwice(*v);
            }
            visited.insert(*v);
        }
    }
    if let Some(v) = (0..graph.nb_vertices()).find(|v| !visited.contains(*v)) {
        return CheckerResult::VertexNotColored(v);
    }
    // check conflicts
    for class in sol {
        for v1 in class {
            for v2 in class {
                if v1 < v2 && graph.are_adjacent(*v1, *v2) {
                    return CheckerResult::ConflictingEdge(*v1, *v2);
                }
            }
        }
    }
    // if ok: return the number of colors
    CheckerResult::Ok(sol.len())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn cycle4() -> ColoringGraph {
        // 0-1-2-3-0
        ColoringGraph::new(vec![vec![1,3], vec![0,2], vec![1,3], vec![0,2]])
    }

    #[test]
    fn test_checker_feasible() {
        let graph = cycle4();
        let sol:Solution = vec![vec![0,2], vec![1,3]];
        assert_eq!(checker(&graph, &sol), CheckerResult::Ok(2));
    }

    #[test]
    fn test_checker_conflict() {
        let graph = cycle4();
        let sol:Solution = vec![vec![0,1], vec![2,3]];
        assert_eq!(checker(&graph, &sol), CheckerResult::ConflictingEdge(0,1));
    }

    #[test]
    fn test_checker_missing_vertex() {
        let graph = cycle4();
        let sol:Solution = vec![vec![0,2], vec![1]];
        assert_eq!(checker(&graph, &sol), CheckerResult::VertexNotColored(3));
    }

    #[test]
    fn test_checker_duplicated_vertex() {
        let graph = cycle4();
        let sol:Solution = vec![vec![0,2], vec![1,3,0]];
        assert_eq!(checker(&graph, &sol), CheckerResult::VertexAddedTwice(0));
    }
}
