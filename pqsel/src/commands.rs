use super::{IOArgs, PathOrStd};
use clap::Subcommand;

mod format;
mod solve;

pub use format::OutputFormat;
pub use solve::SolverLib;

#[derive(Subcommand)]
pub enum Commands {
    /// Formulate the selection problem and write out the QUBO coefficients
    Formulate {
        #[command(flatten)]
        io: IOArgs,
    },

    /// Rank a distribution produced by an external eigensolver
    Rank {
        #[command(flatten)]
        io: IOArgs,

        /// The distribution JSON file, dense or keyed by bitstring ("-" implies stdin)
        #[arg(short, long, value_parser = clap::value_parser!(PathOrStd))]
        distribution: PathOrStd,

        /// The output format (if omitted, will infer based on filename)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Solve the problem with a reference eigensolver and rank the result
    Solve {
        #[command(flatten)]
        io: IOArgs,

        /// Request a specific eigensolver
        #[arg(short, long, default_value = "exhaustive")]
        solver: SolverLib,

        /// The output format (if omitted, will infer based on filename)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
}
