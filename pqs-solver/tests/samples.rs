use approx::assert_abs_diff_eq;
use pqs_core::{models::Market, ports::Eigensolver};
use pqs_solver::{FormulationSettings, ResultRanker, io::Problem};
use rstest::*;
use rstest_reuse::{self, *};
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

mod all_solvers;
use all_solvers::all_solvers;

// For every solver implementation, and for every sample directory in `./samples/**`,
//   1. Read in the market and the formulation settings,
//   2. Read in the known-good minimizer and its objective value,
//   3. Solve and rank the problem,
//   4. Compare the reported minimum to the known-good one.
// The minimum is resolved by the ranker independently of the solver's
// probabilities, so every solver must agree on it, even when their most
// probable assignments differ.

#[derive(serde::Deserialize)]
struct Expected {
    minimum: String,
    value: f64,
}

fn read<T: DeserializeOwned>(path: &Path) -> T {
    serde_json::from_reader(BufReader::new(File::open(path).unwrap())).unwrap()
}

#[apply(all_solvers)]
#[rstest]
#[tokio::test]
async fn run_sample(
    solver: impl Eigensolver,
    #[files("tests/samples/**/market.json")] market: PathBuf,
) {
    let market_data: Market = read(&market);
    let settings: FormulationSettings = read(&market.with_file_name("settings.json"));
    let expected: Expected = read(&market.with_file_name("expected.json"));

    let problem = Problem::new(market_data, settings);
    let outcome = problem
        .solve(&solver, &ResultRanker::default(), 8)
        .await
        .unwrap();

    assert_eq!(outcome.report.minimum.assignment.to_string(), expected.minimum);
    assert_abs_diff_eq!(outcome.report.minimum.value, expected.value, epsilon = 1e-9);
    assert!(outcome.report.minimum.feasible);
    assert_eq!(outcome.report.minimum.penalty, 0.0);
    assert_eq!(outcome.report.entries.len(), 8);
}
