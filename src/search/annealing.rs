use std::fmt;
use std::time::Instant;

use fastrand::Rng;
use serde::Serialize;

use crate::graph::ColoringGraph;
use crate::search::greedy_dsatur::greedy_dsatur;
use crate::search::state::SearchState;

/// starting-state construction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStrategy {
    /// randomized first-fit greedy (default)
    RandomFirstFit,
    /// DSATUR greedy (deterministic, usually a tighter starting base)
    Dsatur,
}

/** parameters of an annealing run */
#[derive(Debug, Clone)]
pub struct AnnealingParams {
    /// seed of the pseudo-random generator
    pub seed: u64,
    /// initial temperature
    pub temperature: f64,
    /// constant k in the acceptance denominator k*t
    pub constant_k: f64,
    /// cooling factor r, multiplies the temperature each iteration (0 < r < 1)
    pub cooling_factor: f64,
    /// number of neighbors generated per iteration
    pub max_neighbors: usize,
    /// hard cap on the number of iterations (0: cooling alone decides)
    pub max_iterations: usize,
    /// temperature threshold ending the cooling loop
    pub temperature_min: f64,
    /// probability of running the local search on a generated neighbor
    pub ls_probability: f64,
    /// starting-state construction
    pub start: StartStrategy,
}

impl AnnealingParams {
    /** builds a parameter set from the solver's positional arguments, with
    the usual defaults for the rest. */
    pub fn new(
        seed:u64, temperature:f64, constant_k:f64, cooling_factor:f64,
        max_neighbors:usize, max_iterations:usize,
    ) -> Self {
        Self {
            seed, temperature, constant_k, cooling_factor,
            max_neighbors, max_iterations,
            temperature_min: 1e-8,
            ls_probability: 0.2,
            start: StartStrategy::RandomFirstFit,
        }
    }

    /// checks the parameter ranges before any search begins
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return Err(ParamError::CoolingFactorOutOfRange(self.cooling_factor));
        }
        if !(self.temperature > 0.0) {
            return Err(ParamError::NonPositiveTemperature(self.temperature));
        }
        if !(self.constant_k > 0.0) {
            return Err(ParamError::NonPositiveConstant(self.constant_k));
        }
        if !(self.temperature_min > 0.0) {
            return Err(ParamError::NonPositiveEpsilon(self.temperature_min));
        }
        if self.max_neighbors == 0 {
            return Err(ParamError::NoNeighbors);
        }
        if !(0.0..=1.0).contains(&self.ls_probability) {
            return Err(ParamError::ProbabilityOutOfRange(self.ls_probability));
        }
        Ok(())
    }
}

/// configuration error raised before any search begins
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// the cooling factor must satisfy 0 < r < 1
    CoolingFactorOutOfRange(f64),
    /// the initial temperature must be positive
    NonPositiveTemperature(f64),
    /// the constant k must be positive
    NonPositiveConstant(f64),
    /// the stopping threshold must be positive
    NonPositiveEpsilon(f64),
    /// at least one neighbor per iteration is required
    NoNeighbors,
    /// the local-search probability must lie in [0,1]
    ProbabilityOutOfRange(f64),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamError::CoolingFactorOutOfRange(r) =>
                write!(f, "cooling factor must satisfy 0 < r < 1 (got {})", r),
            ParamError::NonPositiveTemperature(t) =>
                write!(f, "initial temperature must be positive (got {})", t),
            ParamError::NonPositiveConstant(k) =>
                write!(f, "constant k must be positive (got {})", k),
            ParamError::NonPositiveEpsilon(e) =>
                write!(f, "temperature threshold must be positive (got {})", e),
            ParamError::NoNeighbors =>
                write!(f, "at least one neighbor per iteration is required"),
            ParamError::ProbabilityOutOfRange(p) =>
                write!(f, "local-search probability must lie in [0,1] (got {})", p),
        }
    }
}

impl std::error::Error for ParamError {}

/** statistics of a finished run (exported with the performance file) */
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    /// value of the best state found
    pub nb_colors: usize,
    /// number of outer (cooling) iterations performed
    pub nb_iterations: usize,
    /// number of neighbors generated
    pub nb_generated: usize,
    /// number of accepted moves
    pub nb_accepted: usize,
    /// best value each time it improved (starting value included)
    pub primal_list: Vec<usize>,
    /// temperature when the loop stopped
    pub final_temperature: f64,
    /// wall-clock time of the run, in seconds
    pub time_searched: f32,
}

/** result of an annealing run */
#[derive(Debug)]
pub struct RunResult {
    /// best state found (deep copy, immune to later mutation)
    pub best: SearchState,
    /// run statistics
    pub stats: RunStats,
    /// (iteration, current value) at the start of each iteration
    pub value_history: Vec<(usize, usize)>,
    /// (iteration, value) of every generated neighbor
    pub neighbor_history: Vec<(usize, usize)>,
}

/** Metropolis acceptance rule: a neighbor no worse than the current state is
always accepted; a worse one is accepted when the uniform draw falls under
`exp(-Δ/denom)`. */
pub fn accepts(draw:f64, neighbor_value:usize, current_value:usize, denom:f64) -> bool {
    neighbor_value <= current_value
        || draw < (-((neighbor_value - current_value) as f64) / denom).exp()
}

/**
Implements the simulated annealing engine.

Owns the temperature schedule, the acceptance policy and the best-state
record (engine-local: concurrent searches on separate engines never share
state). Each iteration generates a batch of neighbors from the current
state, sweeps them through the acceptance rule, then cools the temperature
by the multiplicative factor until it falls under the threshold.
*/
#[derive(Debug)]
pub struct SimulatedAnnealing {
    /// instance graph (each state works on its own copy)
    graph: ColoringGraph,
    /// algorithm parameters
    params: AnnealingParams,
    /// pseudo-random generator, seeded once; all draws come from it
    rng: Rng,
}

impl SimulatedAnnealing {

    /** creates an engine after validating the parameters */
    pub fn new(graph:ColoringGraph, params:AnnealingParams) -> Result<Self, ParamError> {
        params.validate()?;
        let rng = Rng::with_seed(params.seed);
        Ok(Self { graph, params, rng })
    }

    /** runs the full cooling schedule and returns the best state found.

    Per iteration, for each neighbor in turn: vertex pick, color pick,
    local-search trigger (plus its color pick when it fires); then one
    acceptance draw per worsening candidate during the sweep. Keeping this
    draw order fixed makes runs reproducible per seed. */
    pub fn run(&mut self) -> RunResult {
        let time_init = Instant::now();
        println!("[INFO]: generating starting state...");
        let starting_state = match self.params.start {
            StartStrategy::RandomFirstFit =>
                SearchState::greedy_start(self.graph.clone(), &mut self.rng),
            StartStrategy::Dsatur =>
                SearchState::new(greedy_dsatur(self.graph.clone())),
        };
        println!("[INFO]: done ({} colors)", starting_state.value());
        let mut best = starting_state.clone();
        let mut current = starting_state;
        let mut primal_list = vec![best.value()];
        let mut temperature = self.params.temperature;
        let mut iteration:usize = 1;
        let mut nb_generated:usize = 0;
        let mut nb_accepted:usize = 0;
        let mut value_history = Vec::new();
        let mut neighbor_history = Vec::new();
        while temperature > self.params.temperature_min {
            if self.params.max_iterations > 0 && iteration > self.params.max_iterations {
                break;
            }
            let denom = self.params.constant_k * temperature;
            println!("========================================================");
            println!("[INFO]: iteration: {}", iteration);
            println!("[INFO]: temperature: {}", temperature);
            println!("[INFO]: selection probability denominator (k*t): {}", denom);
            println!("[INFO]: current state value: {}", current.value());
            value_history.push((iteration, current.value()));
            // generate the batch of candidates from the current state
            let mut neighbors = Vec::with_capacity(self.params.max_neighbors);
            for _ in 0..self.params.max_neighbors {
                let neighbor = current.generate_neighbor(
                    &mut self.rng, self.params.ls_probability
                );
                nb_generated += 1;
                neighbor_history.push((iteration, neighbor.value()));
                if neighbor.value() < best.value() {
                    best = neighbor.clone();
                    primal_list.push(best.value());
                }
                neighbors.push(neighbor);
            }
            // metropolis sweep, in candidate order; rejected candidates are
            // dropped at the end of the iteration that produced them
            for neighbor in neighbors {
                let accepted = neighbor.value() <= current.value()
                    || accepts(self.rng.f64(), neighbor.value(), current.value(), denom);
                if accepted {
                    current = neighbor;
                    nb_accepted += 1;
                }
            }
            temperature *= self.params.cooling_factor;
            iteration += 1;
        }
        let nb_iterations = iteration - 1;
        assert!(best.check_correctness(), "annealing produced an invalid best state");
        println!("========================================================");
        println!("[INFO]: best found state uses {} colors", best.value());
        println!("[INFO]: finished in {} seconds", time_init.elapsed().as_secs_f32());
        println!("[INFO]: total iterations: {}", nb_iterations);
        let stats = RunStats {
            nb_colors: best.value(),
            nb_iterations,
            nb_generated,
            nb_accepted,
            primal_list,
            final_temperature: temperature,
            time_searched: time_init.elapsed().as_secs_f32(),
        };
        RunResult { best, stats, value_history, neighbor_history }
    }
}

/** runs a simulated annealing search on an instance. Convenience wrapper
building the engine and running the full schedule. */
pub fn simulated_annealing(
    graph:ColoringGraph, params:AnnealingParams
) -> Result<RunResult, ParamError> {
    let mut engine = SimulatedAnnealing::new(graph, params)?;
    Ok(engine.run())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn instance(filename:&str) -> ColoringGraph {
        ColoringGraph::from_file(filename).unwrap()
    }

    #[test]
    fn test_acceptance_rule() {
        // downhill and sideways moves: always accepted, whatever the draw
        assert!(accepts(0.999999, 3, 5, 1.0));
        assert!(accepts(0.999999, 5, 5, 1.0));
        // uphill: accepted iff draw < exp(-delta/denom)
        let denom = 2.0;
        let threshold = (-(2.0f64) / denom).exp(); // delta = 2
        assert!(accepts(threshold - 1e-9, 7, 5, denom));
        assert!(!accepts(threshold, 7, 5, denom));
        assert!(!accepts(threshold + 1e-9, 7, 5, denom));
    }

    #[test]
    fn test_acceptance_rule_matches_predicate() {
        let draws = [0.0, 0.1, 0.5, 0.9];
        for &draw in &draws {
            for neighbor_value in 1..8 {
                for current_value in 1..8 {
                    for &denom in &[0.5, 1.0, 10.0] {
                        let expected = neighbor_value <= current_value
                            || draw < (-((neighbor_value as f64 - current_value as f64)) / denom).exp();
                        assert_eq!(
                            accepts(draw, neighbor_value, current_value, denom),
                            expected
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_params_validation() {
        let valid = AnnealingParams::new(0, 10.0, 1.0, 0.9, 5, 0);
        assert_eq!(valid.validate(), Ok(()));
        let mut p = valid.clone();
        p.cooling_factor = 1.0;
        assert_eq!(p.validate(), Err(ParamError::CoolingFactorOutOfRange(1.0)));
        let mut p = valid.clone();
        p.cooling_factor = 0.0;
        assert_eq!(p.validate(), Err(ParamError::CoolingFactorOutOfRange(0.0)));
        let mut p = valid.clone();
        p.temperature = 0.0;
        assert_eq!(p.validate(), Err(ParamError::NonPositiveTemperature(0.0)));
        let mut p = valid.clone();
        p.max_neighbors = 0;
        assert_eq!(p.validate(), Err(ParamError::NoNeighbors));
        let mut p = valid.clone();
        p.ls_probability = 1.5;
        assert_eq!(p.validate(), Err(ParamError::ProbabilityOutOfRange(1.5)));
    }

    #[test]
    fn test_invalid_params_rejected_at_construction() {
        let mut params = AnnealingParams::new(0, 10.0, 1.0, 0.9, 5, 0);
        params.cooling_factor = 2.0;
        assert!(SimulatedAnnealing::new(instance("insts/cycle4.col"), params).is_err());
    }

    #[test]
    fn test_edgeless_solved_by_greedy_alone() {
        let params = AnnealingParams::new(0, 1.0, 1.0, 0.5, 1, 5);
        let res = simulated_annealing(instance("insts/empty10.col"), params).unwrap();
        assert_eq!(res.best.value(), 1);
        assert!(res.best.check_correctness());
    }

    #[test]
    fn test_cycle4_converges_to_two_colors() {
        let params = AnnealingParams::new(0, 10.0, 1.0, 0.9, 5, 0);
        let res = simulated_annealing(instance("insts/cycle4.col"), params).unwrap();
        assert_eq!(res.best.value(), 2);
        assert!(res.best.check_correctness());
    }

    #[test]
    fn test_cycle6_converges_to_two_colors() {
        // first-fit can open a third color on an even cycle; the search
        // must close it again
        let params = AnnealingParams::new(123, 100.0, 1.0, 0.99, 10, 0);
        let res = simulated_annealing(instance("insts/cycle6.col"), params).unwrap();
        assert_eq!(res.best.value(), 2);
    }

    #[test]
    fn test_k5_pinned_at_five_colors() {
        let params = AnnealingParams::new(7, 10.0, 1.0, 0.9, 5, 0);
        let res = simulated_annealing(instance("insts/k5.col"), params).unwrap();
        assert_eq!(res.best.value(), 5);
        assert!(res.stats.primal_list.iter().all(|v| *v >= 5));
    }

    #[test]
    fn test_petersen_bounds() {
        let params = AnnealingParams::new(21, 50.0, 1.0, 0.98, 10, 0);
        let res = simulated_annealing(instance("insts/petersen.col"), params).unwrap();
        assert!(res.best.value() >= 3); // odd cycles: 2 colors impossible
        assert!(res.best.value() <= 4); // max degree 3
        assert!(res.best.check_correctness());
    }

    #[test]
    fn test_best_is_monotone() {
        let params = AnnealingParams::new(99, 50.0, 1.0, 0.95, 5, 0);
        let res = simulated_annealing(instance("insts/petersen.col"), params).unwrap();
        for window in res.stats.primal_list.windows(2) {
            assert!(window[1] < window[0]);
        }
        assert_eq!(*res.stats.primal_list.last().unwrap(), res.best.value());
    }

    #[test]
    fn test_same_seed_same_run() {
        let params = AnnealingParams::new(5, 10.0, 1.0, 0.9, 5, 0);
        let res1 = simulated_annealing(instance("insts/cycle6.col"), params.clone()).unwrap();
        let res2 = simulated_annealing(instance("insts/cycle6.col"), params).unwrap();
        assert_eq!(res1.best.value(), res2.best.value());
        assert_eq!(res1.value_history, res2.value_history);
        assert_eq!(res1.neighbor_history, res2.neighbor_history);
    }

    #[test]
    fn test_max_iterations_caps_the_run() {
        let params = AnnealingParams::new(0, 1000.0, 1.0, 0.999, 2, 3);
        let res = simulated_annealing(instance("insts/cycle4.col"), params).unwrap();
        assert_eq!(res.stats.nb_iterations, 3);
        assert_eq!(res.value_history.len(), 3);
    }

    #[test]
    fn test_dsatur_start() {
        let mut params = AnnealingParams::new(0, 1.0, 1.0, 0.5, 1, 2);
        params.start = StartStrategy::Dsatur;
        let res = simulated_annealing(instance("insts/cycle6.col"), params).unwrap();
        assert_eq!(res.best.value(), 2); // DSATUR is exact on even cycles
    }
}
