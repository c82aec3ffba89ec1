use clap::{App, load_yaml};

use sa_color::color::{checker, CheckerResult};
use sa_color::dimacs::read_solution;
use sa_color::graph::ColoringGraph;

/** checks a coloring solution against its instance */
pub fn main() {
    // parse arguments
    let yaml = load_yaml!("col_checker.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let inst_filename = main_args.value_of("instance").unwrap();
    let sol_filename = main_args.value_of("solution").unwrap();
    // read files
    let graph = match ColoringGraph::from_file(inst_filename) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let solution = match read_solution(sol_filename) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    for class in &solution {
        for v in class {
            if *v >= graph.nb_vertices() {
                eprintln!("vertex {} outside the instance range 0..{}", v, graph.nb_vertices());
                std::process::exit(1);
            }
        }
    }
    // call checker
    match checker(&graph, &solution) {
        CheckerResult::Ok(nb_colors) => {
            println!("{}", nb_colors);
        },
        CheckerResult::VertexAddedTwice(v) => {
            println!("ERROR: vertex {} colored twice", v);
            std::process::exit(1);
        },
        CheckerResult::VertexNotColored(v) => {
            println!("ERROR: vertex {} not colored", v);
            std::process::exit(1);
        },
        CheckerResult::ConflictingEdge(a, b) => {
            println!("ERROR: vertices {} and {} are conflicting", a, b);
            std::process::exit(1);
        },
    };
}
