#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/// Core domain models for portfolio selection as a binary program.
///
/// This module contains the fundamental data structures: the market statistics
/// a problem is built from, the quadratic objective it is turned into, the
/// binary assignments the objective is evaluated on, and the distributions and
/// rankings that come back from a solve.
///
/// The models are primarily data structures with validation and evaluation
/// logic, kept separate from the formulation and ranking procedures that
/// operate on them.
pub mod models;

/// Interface traits for the portfolio selection system.
///
/// These traits define the contract between the formulation/ranking logic and
/// the external eigensolvers that search over binary assignments, without
/// specifying how the search is performed.
pub mod ports;
