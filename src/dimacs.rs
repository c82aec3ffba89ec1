use std::fmt;
use std::fs;

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take, take_till};
use nom::character::complete::{digit1, space1};
use nom::combinator::opt;

use crate::color::VertexId;

/** error raised while reading an instance file.
Unknown tokens and out-of-range endpoints are hard errors: a file that does
not parse cleanly aborts the load instead of silently producing a different
graph. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// the file could not be opened or read
    Io(String),
    /// no `p edge <n> <m>` header before the edge list
    MissingHeader,
    /// a line starts with a token the format does not define
    UnexpectedToken(String),
    /// an edge endpoint is outside the declared range 1..=n
    VertexOutOfRange {
        /// offending (1-based) endpoint
        vertex: usize,
        /// declared number of vertices
        nb_vertices: usize,
    },
    /// an edge joins a vertex to itself
    SelfLoop(usize),
    /// the number of edge lines does not match the header
    EdgeCountMismatch {
        /// edge count declared by the header
        declared: usize,
        /// edge lines actually read
        found: usize,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result {
        match self {
            ReadError::Io(e) => write!(f, "unable to read the instance file: {}", e),
            ReadError::MissingHeader => write!(f, "missing or malformed 'p edge <n> <m>' header"),
            ReadError::UnexpectedToken(line) => write!(f, "unexpected token in line: '{}'", line),
            ReadError::VertexOutOfRange { vertex, nb_vertices } =>
                write!(f, "edge endpoint {} outside the declared range 1..={}", vertex, nb_vertices),
            ReadError::SelfLoop(v) => write!(f, "self-loop on vertex {}", v),
            ReadError::EdgeCountMismatch { declared, found } =>
                write!(f, "header declares {} edges but {} were read", declared, found),
        }
    }
}

impl std::error::Error for ReadError {}


/// reads an instance from a file, returns (n,m,adj_list)
pub fn read_from_file(filename:&str) -> Result<(usize, usize, Vec<Vec<VertexId>>), ReadError> {
    let content = fs::read_to_string(filename)
        .map_err(|e| ReadError::Io(format!("{}: {}", filename, e)))?;
    read_from_str(content.as_str())
}

/// reads an instance from its text content, returns (n,m,adj_list)
pub fn read_from_str(s:&str) -> Result<(usize, usize, Vec<Vec<VertexId>>), ReadError> {
    let content = s.replace('\r', "");
    let mut rest = skip_ignored(content.as_str());
    let (after_header,(n,m)) = match read_header(rest) {
        Ok(r) => r,
        Err(_) => return Err(ReadError::MissingHeader),
    };
    rest = after_header;
    let mut adj_list = vec![Vec::new();n];
    let mut nb_read = 0;
    loop {
        rest = skip_ignored(rest);
        if rest.is_empty() { break; }
        match read_edge(rest) {
            Ok((after_edge,(a,b))) => {
                for v in &[a,b] {
                    if *v == 0 || *v > n {
                        return Err(ReadError::VertexOutOfRange { vertex:*v, nb_vertices:n });
                    }
                }
                if a == b { return Err(ReadError::SelfLoop(a)); }
                adj_list[a-1].push(b-1);
                adj_list[b-1].push(a-1);
                nb_read += 1;
                rest = after_edge;
            }
            Err(_) => {
                let line = rest.lines().next().unwrap_or("").to_string();
                return Err(ReadError::UnexpectedToken(line));
            }
        }
    }
    // some files declare each symmetric edge twice, tolerate m or 2m
    if nb_read != m && 2*nb_read != m {
        return Err(ReadError::EdgeCountMismatch { declared:m, found:nb_read });
    }
    Ok((n, m, adj_list))
}

/// reads a solution file: one color class per line, whitespace-separated vertex ids
pub fn read_solution(filename:&str) -> Result<Vec<Vec<VertexId>>, ReadError> {
    let content = fs::read_to_string(filename)
        .map_err(|e| ReadError::Io(format!("{}: {}", filename, e)))?;
    let mut res = Vec::new();
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let mut class = Vec::new();
        for token in line.split_whitespace() {
            match token.parse::<VertexId>() {
                Ok(v) => class.push(v),
                Err(_) => return Err(ReadError::UnexpectedToken(line.to_string())),
            }
        }
        res.push(class);
    }
    Ok(res)
}

/// skips blank lines and comments before the next record
fn skip_ignored(s:&str) -> &str {
    let mut rest = s;
    loop {
        let trimmed = rest.trim_start();
        match skip_comment(trimmed) {
            Ok((remaining,_)) => { rest = remaining; }
            Err(_) => return trimmed,
        }
    }
}

/// skips a single comment line
fn skip_comment(s:&str) -> IResult<&str, &str> {
    let (remaining,_) = tag("c")(s)?;
    let (remaining2, skipped) = take_till(|ch| ch == '\n')(remaining)?;
    let (remaining3, _) = opt(take(1usize))(remaining2)?;
    Ok((remaining3, skipped))
}

/// reads two numbers separated by spaces
fn read_two_integers(s:&str) -> IResult<&str, (usize,usize)> {
    let (remaining1, s1) = digit1(s)?;
    let (remaining2, _) = space1(remaining1)?;
    let (remaining3, s2) = digit1(remaining2)?;
    let n1 = s1.parse::<usize>().unwrap(); // digits only
    let n2 = s2.parse::<usize>().unwrap();
    Ok((remaining3, (n1,n2)))
}

/// reads the header containing (n,m)
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    let (remaining,_) = tag("p")(s)?;
    let (remaining2,_) = space1(remaining)?;
    let (remaining3,_) = alt((tag("edge"), tag("col")))(remaining2)?;
    let (remaining4,_) = space1(remaining3)?;
    read_two_integers(remaining4)
}

/// reads an edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s:&str) -> IResult<&str, (usize,usize)> {
    let (remaining,_) = tag("e")(s)?;
    let (remaining2,_) = space1(remaining)?;
    read_two_integers(remaining2)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_simple() {
        let (n,m,adj) = read_from_str("p edge 2 1\ne 1 2\n").unwrap();
        assert_eq!(n, 2);
        assert_eq!(m, 1);
        assert_eq!(adj, vec![vec![1], vec![0]]);
    }

    #[test]
    fn test_read_comments_and_blank_lines() {
        let s = "c this is a test comment\n\np edge 2 1\n\nc another\ne 1 2\n\n";
        let (n,m,adj) = read_from_str(s).unwrap();
        assert_eq!((n,m), (2,1));
        assert_eq!(adj, vec![vec![1], vec![0]]);
    }

    #[test]
    fn test_read_header() {
        let s = "p edge 2 1\ne 1 2";
        assert_eq!(read_header(s).unwrap().1, (2,1));
    }

    #[test]
    fn test_read_header_col() {
        let s = "p col 2 1\ne 1 2";
        assert_eq!(read_header(s).unwrap().1, (2,1));
    }

    #[test]
    fn test_read_edge() {
        let s = "e 1 2\n";
        assert_eq!(read_edge(s).unwrap().1, (1,2));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(read_from_str("e 1 2\n"), Err(ReadError::MissingHeader));
    }

    #[test]
    fn test_unexpected_token() {
        let res = read_from_str("p edge 2 1\nq 1 2\n");
        assert_eq!(res, Err(ReadError::UnexpectedToken("q 1 2".to_string())));
    }

    #[test]
    fn test_vertex_out_of_range() {
        let res = read_from_str("p edge 2 1\ne 1 3\n");
        assert_eq!(res, Err(ReadError::VertexOutOfRange { vertex:3, nb_vertices:2 }));
    }

    #[test]
    fn test_self_loop_rejected() {
        let res = read_from_str("p edge 2 1\ne 1 1\n");
        assert_eq!(res, Err(ReadError::SelfLoop(1)));
    }

    #[test]
    fn test_edge_count_mismatch() {
        let res = read_from_str("p edge 3 3\ne 1 2\n");
        assert_eq!(res, Err(ReadError::EdgeCountMismatch { declared:3, found:1 }));
    }

    #[test]
    fn test_double_counted_edges_tolerated() {
        // header counts each symmetric edge twice
        let (n,m,adj) = read_from_str("p edge 2 2\ne 1 2\n").unwrap();
        assert_eq!((n,m), (2,2));
        assert_eq!(adj, vec![vec![1], vec![0]]);
    }

    #[test]
    fn test_read_instance_file() {
        let (n,m,adj) = read_from_file("insts/cycle4.col").unwrap();
        assert_eq!(n, 4);
        assert_eq!(m, 4);
        assert_eq!(adj[0], vec![1,3]);
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(
            read_from_file("insts/does_not_exist.col"),
            Err(ReadError::Io(_))
        ));
    }
}
