use clap::{App, load_yaml};
use serde_json::json;

use sa_color::graph::ColoringGraph;
use sa_color::search::greedy_dsatur::greedy_dsatur;
use sa_color::search::state::SearchState;
use sa_color::util::export_results;

/** colors a coloring instance using a DSATUR greedy */
pub fn main() {
    // parse arguments
    let yaml = load_yaml!("greedy_dsatur.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let inst_filename = main_args.value_of("instance").unwrap();
    // read instance file
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
    // solve it
    let state = SearchState::new(greedy_dsatur(graph.clone()));
    println!("nb colors: {}", state.value());
    if !state.check_correctness() {
        eprintln!("DSATUR produced an invalid coloring");
        std::process::exit(1);
    }
    let stats = json!({
        "nb_colors": state.value(),
        "inst_name": inst_filename,
    });
    if let Err(e) = export_results(
        &graph,
        &state.solution(),
        &stats,
        None,
        main_args.value_of("solution").map(|s| s.to_string()),
        true,
    ) {
        eprintln!("unable to export the results: {}", e);
        std::process::exit(1);
    }
}
