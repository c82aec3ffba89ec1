use std::str::FromStr;

use clap::{App, ArgMatches, load_yaml};
use serde_json::json;

use sa_color::graph::ColoringGraph;
use sa_color::mathprog::write_data_file;
use sa_color::search::annealing::{AnnealingParams, StartStrategy, simulated_annealing};
use sa_color::util::{export_results, write_history};

/// parses a positional argument, exiting with the usage error on failure
fn parse_arg<T:FromStr>(main_args:&ArgMatches, name:&str) -> T {
    let raw = main_args.value_of(name).unwrap();
    match raw.parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("unable to parse the {} given ('{}')", name, raw);
            std::process::exit(1);
        }
    }
}

/** solves a coloring instance using simulated annealing */
pub fn main() {
    // parse arguments
    let yaml = load_yaml!("sa_color.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let seed:u64 = parse_arg(&main_args, "seed");
    let temperature:f64 = parse_arg(&main_args, "temperature");
    let constant_k:f64 = parse_arg(&main_args, "constant");
    let cooling_factor:f64 = parse_arg(&main_args, "cooling");
    let max_neighbors:usize = parse_arg(&main_args, "neighbors");
    let max_iterations:usize = parse_arg(&main_args, "iterations");
    let inst_filename = main_args.value_of("instance").unwrap();
    // read instance file
    println!("=========================================================");
    println!("reading instance: {}...", inst_filename);
    let graph = match ColoringGraph::from_file(inst_filename) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    graph.display_statistics();
    println!("=========================================================");
    // optional MathProg export of the instance
    if let Some(data_filename) = main_args.value_of("data") {
        println!("exporting MathProg data in: {}", data_filename);
        if let Err(e) = write_data_file(&graph, data_filename) {
            eprintln!("unable to write {}: {}", data_filename, e);
            std::process::exit(1);
        }
    }
    // build the parameters
    let mut params = AnnealingParams::new(
        seed, temperature, constant_k, cooling_factor, max_neighbors, max_iterations
    );
    if main_args.is_present("epsilon") {
        params.temperature_min = parse_arg(&main_args, "epsilon");
    }
    if main_args.is_present("dsatur") {
        params.start = StartStrategy::Dsatur;
    }
    // solve it
    let result = match simulated_annealing(graph.clone(), params) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    print!("{}", result.best.report());
    // optional per-iteration value logs
    if let Some(filename) = main_args.value_of("valuelog") {
        if let Err(e) = write_history(filename, &result.value_history) {
            eprintln!("unable to write {}: {}", filename, e);
        }
    }
    if let Some(filename) = main_args.value_of("neighborlog") {
        if let Err(e) = write_history(filename, &result.neighbor_history) {
            eprintln!("unable to write {}: {}", filename, e);
        }
    }
    // export statistics and solution
    let stats = json!({
        "nb_colors": result.stats.nb_colors,
        "nb_iterations": result.stats.nb_iterations,
        "nb_generated": result.stats.nb_generated,
        "nb_accepted": result.stats.nb_accepted,
        "primal_list": result.stats.primal_list,
        "time_searched": result.stats.time_searched,
        "seed": seed,
        "inst_name": inst_filename,
    });
    if let Err(e) = export_results(
        &graph,
        &result.best.solution(),
        &stats,
        main_args.value_of("perf").map(|s| s.to_string()),
        main_args.value_of("solution").map(|s| s.to_string()),
        true,
    ) {
        eprintln!("unable to export the results: {}", e);
        std::process::exit(1);
    }
}
