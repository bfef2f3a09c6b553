#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/**
 * Turning market statistics into a quadratic binary objective.
 */
mod formulate;
pub use formulate::*;

/**
 * Evaluating and ranking the distributions that eigensolvers return.
 */
mod rank;
pub use rank::*;

/**
 * These are reference implementations of the eigensolver port.
 */
mod impls;
pub use impls::*;

/// Serializable problem and outcome types, for driving the pipeline from files
#[cfg(feature = "io")]
pub mod io;
