#![allow(unused_macros)]
use rstest_reuse::template;

// This creates a testing "template" to allow for the injection of each
// reference eigensolver implementation

#[template]
#[rstest]
#[case::exhaustive(pqs_solver::ExhaustiveSearch::default())]
#[case::uniform(pqs_solver::UniformSampler::default())]
pub fn all_solvers(#[case] solver: impl pqs_core::ports::Eigensolver) -> () {}
