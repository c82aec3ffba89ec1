use std::fs;
use std::path::Path;

use nom::IResult;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::{digit1, multispace0};

use crate::color::VertexId;
use crate::dimacs::ReadError;
use crate::graph::ColoringGraph;

/** renders the instance as a MathProg data block, ready to feed the
assignment ILP of a third-party solver (GLPK). Vertices and colors are both
numbered 0..n-1 (worst case: one color per vertex), and the adjacency
relation is spelled out as a full 0/1 matrix. */
pub fn data_to_string(graph:&ColoringGraph) -> String {
    let n = graph.nb_vertices();
    let mut res = String::from("data;\n\n");
    // big M parameter
    res += "# Big M parameter\n";
    res += format!("param M := {};\n\n", n).as_str();
    // vertex set
    res += "# Vertex set (Numbered 0 through N-1)\n";
    res += "set V :=";
    for i in 0..n {
        res += format!(" {}", i).as_str();
    }
    res += ";\n\n";
    // color set
    res += "# Color set (Assuming worst case scenario where nColors = nVertexes)\n";
    res += "set C :=";
    for i in 0..n {
        res += format!(" {}", i).as_str();
    }
    res += ";\n\n";
    // adjacency matrix
    res += "# Graph adjacency matrix\n";
    res += "param graph :=\n";
    for i in 0..n {
        for j in 0..n {
            res += format!(" [{}, {}] {}", i, j, graph.are_adjacent(i,j) as usize).as_str();
            if i < n-1 || j < n-1 {
                res += ",";
            }
        }
        res += "\n";
    }
    res += ";\n\nend;\n";
    res
}

/// writes the MathProg data block into a file
pub fn write_data_file(graph:&ColoringGraph, filename:&str) -> std::io::Result<()> {
    fs::write(Path::new(filename), data_to_string(graph))
}

/** re-reads the adjacency relation of a MathProg data block, returns the
adjacency list (used to cross-check the export against the loaded graph). */
pub fn read_adjacency(s:&str) -> Result<Vec<Vec<VertexId>>, ReadError> {
    // vertex set gives the dimension
    let after_v = match take_until::<_,_,nom::error::Error<&str>>("set V :=")(s) {
        Ok((remaining,_)) => remaining,
        Err(_) => return Err(ReadError::MissingHeader),
    };
    let (after_set, vertices) = match read_id_set(after_v) {
        Ok(r) => r,
        Err(_) => return Err(ReadError::MissingHeader),
    };
    let n = vertices.len();
    // adjacency entries
    let after_g = match take_until::<_,_,nom::error::Error<&str>>("param graph :=")(after_set) {
        Ok((remaining,_)) => remaining,
        Err(_) => return Err(ReadError::MissingHeader),
    };
    let mut rest = match tag::<_,_,nom::error::Error<&str>>("param graph :=")(after_g) {
        Ok((remaining,_)) => remaining,
        Err(_) => return Err(ReadError::MissingHeader),
    };
    let mut adj_list = vec![Vec::new();n];
    loop {
        let trimmed = rest.trim_start().trim_start_matches(',').trim_start();
        if trimmed.starts_with(';') {
            break;
        }
        match read_matrix_entry(trimmed) {
            Ok((remaining,(i,j,value))) => {
                if i >= n || j >= n {
                    return Err(ReadError::VertexOutOfRange { vertex:i.max(j), nb_vertices:n });
                }
                if value == 1 {
                    adj_list[i].push(j);
                }
                rest = remaining;
            }
            Err(_) => {
                let line = trimmed.lines().next().unwrap_or("").to_string();
                return Err(ReadError::UnexpectedToken(line));
            }
        }
    }
    Ok(adj_list)
}

/// reads the `set V := 0 1 2 ... ;` block
fn read_id_set(s:&str) -> IResult<&str, Vec<usize>> {
    let (remaining1,_) = tag("set V :=")(s)?;
    let mut rest = remaining1;
    let mut ids = Vec::new();
    loop {
        let (remaining2,_) = multispace0(rest)?;
        if remaining2.starts_with(';') {
            let (remaining3,_) = tag(";")(remaining2)?;
            return Ok((remaining3, ids));
        }
        let (remaining3, digits) = digit1(remaining2)?;
        ids.push(digits.parse::<usize>().unwrap());
        rest = remaining3;
    }
}

/// reads a single `[i, j] v` matrix entry
fn read_matrix_entry(s:&str) -> IResult<&str, (usize,usize,usize)> {
    let (remaining1,_) = tag("[")(s)?;
    let (remaining2,_) = multispace0(remaining1)?;
    let (remaining3, d1) = digit1(remaining2)?;
    let (remaining4,_) = tag(",")(remaining3)?;
    let (remaining5,_) = multispace0(remaining4)?;
    let (remaining6, d2) = digit1(remaining5)?;
    let (remaining7,_) = tag("]")(remaining6)?;
    let (remaining8,_) = multispace0(remaining7)?;
    let (remaining9, d3) = digit1(remaining8)?;
    Ok((remaining9, (
        d1.parse::<usize>().unwrap(),
        d2.parse::<usize>().unwrap(),
        d3.parse::<usize>().unwrap(),
    )))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_shape() {
        let graph = ColoringGraph::new(vec![vec![1], vec![0]]);
        let data = data_to_string(&graph);
        assert!(data.starts_with("data;\n"));
        assert!(data.contains("set V := 0 1;"));
        assert!(data.contains("set C := 0 1;"));
        assert!(data.contains("param graph :="));
        assert!(data.trim_end().ends_with("end;"));
        assert!(data.contains("[0, 1] 1"));
        assert!(data.contains("[0, 0] 0"));
    }

    #[test]
    fn test_round_trip() {
        let (_,_,adj_list) = crate::dimacs::read_from_file("insts/cycle4.col").unwrap();
        let graph = ColoringGraph::new(adj_list);
        let reread = read_adjacency(data_to_string(&graph).as_str()).unwrap();
        // the re-read relation is the same symmetric adjacency
        let rebuilt = ColoringGraph::new(reread);
        assert_eq!(rebuilt.nb_vertices(), graph.nb_vertices());
        assert_eq!(rebuilt.edges(), graph.edges());
        for u in graph.vertices() {
            for v in graph.vertices() {
                assert_eq!(rebuilt.are_adjacent(u,v), graph.are_adjacent(u,v));
            }
        }
    }

    #[test]
    fn test_round_trip_k5() {
        let (_,_,adj_list) = crate::dimacs::read_from_file("insts/k5.col").unwrap();
        let graph = ColoringGraph::new(adj_list);
        let reread = read_adjacency(data_to_string(&graph).as_str()).unwrap();
        assert_eq!(ColoringGraph::new(reread).edges(), graph.edges());
    }

    #[test]
    fn test_read_rejects_garbage() {
        assert_eq!(read_adjacency("nothing here"), Err(ReadError::MissingHeader));
        let res = read_adjacency("set V := 0 1;\nparam graph :=\n [0, oops\n;");
        assert!(matches!(res, Err(ReadError::UnexpectedToken(_))));
    }
}
