use clap::Parser;
use pqs_core::models::{Distribution, Market};
use pqs_solver::{ResultRanker, io::Problem};
use std::path::PathBuf;
use tracing::{Level, event};

mod io;
pub use io::*;

mod commands;
pub use commands::*;

mod config;
pub use config::*;

// The top-level arguments -- the configuration source and which subcommand to execute
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "PQS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub async fn evaluate(self) -> anyhow::Result<()> {
        let AppConfig {
            formulation,
            ranking,
            report,
        } = AppConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Formulate { io } => {
                let problem = Problem::new(read_market(&io)?, formulation);
                let formulation = problem.formulate()?;
                let output = io.write()?;
                serde_json::to_writer_pretty(output, &formulation)?;
            }
            Commands::Rank {
                io,
                distribution,
                format,
            } => {
                if io.shares_stdin(&distribution) {
                    return Err(CliError::SharedStdin)?;
                }
                let format = resolve_format(&io, format)?;

                let problem = Problem::new(read_market(&io)?, formulation);
                let distribution =
                    serde_json::from_reader::<_, Distribution>(distribution.read()?)?;
                let outcome =
                    problem.rank(&distribution, &ResultRanker::new(ranking), report.top)?;

                let mut output = io.write()?;
                format.write(&outcome, &mut output)?;
            }
            Commands::Solve { io, solver, format } => {
                let format = resolve_format(&io, format)?;

                let problem = Problem::new(read_market(&io)?, formulation);
                let outcome = solver.solve(&problem, ranking, report.top).await?;

                let mut output = io.write()?;
                format.write(&outcome, &mut output)?;
            }
        }

        Ok(())
    }
}

fn read_market(io: &IOArgs) -> anyhow::Result<Market> {
    let market = serde_json::from_reader::<_, Market>(io.read()?)?;
    event!(Level::INFO, assets = market.len(), "read market");
    Ok(market)
}

// An explicit format wins, then the output extension, then JSON on stdout
fn resolve_format(io: &IOArgs, format: Option<OutputFormat>) -> anyhow::Result<OutputFormat> {
    if let Some(format) = format {
        Ok(format)
    } else if let Some(ext) = io.extension() {
        Ok(ext.parse()?)
    } else {
        Ok(OutputFormat::Json)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("The market and the distribution cannot both be read from stdin")]
    SharedStdin,
}
