use std::io::Write;

use serde_json::Value;

use crate::color::{checker, CheckerResult, VertexId};
use crate::graph::ColoringGraph;

/// exports search results to files
pub fn export_results(
    graph:&ColoringGraph,
    solution:&[Vec<VertexId>],
    stats:&Value,
    perf_file:Option<String>,
    sol_file:Option<String>,
    check_result:bool,
) -> std::io::Result<()> {
    // export statistics
    if let Some(filename) = perf_file {
        let mut file = std::fs::File::create(filename.as_str())?;
        file.write_all(serde_json::to_string(stats)
            .expect("export_results: statistics are not serializable").as_bytes())?;
    }
    // export solution
    if let Some(filename) = sol_file {
        if check_result {
            let checker_result = checker(graph, solution);
            match checker_result {
                CheckerResult::Ok(_) => {},
                _ => { println!("invalid solution (reason: {:?})", checker_result) }
            };
        }
        graph.write_solution(filename.as_str(), solution)?;
    }
    Ok(())
}

/** writes a value history into a file, one `<iteration> <value>` line per
entry (the per-iteration and per-neighbor logs of the solver). */
pub fn write_history(filename:&str, history:&[(usize,usize)]) -> std::io::Result<()> {
    let mut res = String::default();
    for (iteration, value) in history {
        res += format!("{}  {}\n", iteration, value).as_str();
    }
    std::fs::write(filename, res)
}
