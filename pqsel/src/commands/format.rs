use clap::ValueEnum;
use pqs_core::models::{AssetId, RankedEntry};
use pqs_solver::io::Outcome;
use std::{io::Write, str::FromStr};

// Same story here with the OutputFormat enum, as with the SolverLib enum
#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

impl OutputFormat {
    pub fn write<W: Write>(&self, outcome: &Outcome, buffer: &mut W) -> anyhow::Result<()> {
        match self {
            Self::Json => serde_json::to_writer_pretty(&mut *buffer, outcome)?,
            Self::Table => write_table(outcome, buffer)?,
        };
        Ok(())
    }
}

impl FromStr for OutputFormat {
    type Err = OutputFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" | "JSON" => Ok(Self::Json),
            "txt" | "TXT" | "table" => Ok(Self::Table),
            _ => Err(Self::Err::OutputExtension(s.to_owned())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum OutputFormatError {
    #[error("Unknown output format: {0}")]
    OutputExtension(String),
}

fn write_table<W: Write>(outcome: &Outcome, buffer: &mut W) -> std::io::Result<()> {
    let report = &outcome.report;

    writeln!(
        buffer,
        "Most probable: [{}] {} value {:.4}",
        report.most_probable.assignment,
        names(&outcome.selection),
        report.most_probable.value,
    )?;
    match &outcome.optimal_selection {
        None => writeln!(buffer, "Minimum:       same as most probable")?,
        Some(selection) => writeln!(
            buffer,
            "Minimum:       [{}] {} value {:.4} (solver disagrees)",
            report.minimum.assignment,
            names(selection),
            report.minimum.value,
        )?,
    }

    writeln!(buffer)?;
    writeln!(buffer, "----------------- Ranked assignments -----------------")?;
    writeln!(
        buffer,
        "{:<16} {:>14} {:>12} {:>9}",
        "selection", "value", "probability", "feasible"
    )?;
    writeln!(buffer, "------------------------------------------------------")?;
    for RankedEntry {
        assignment,
        value,
        feasible,
        probability,
        ..
    } in report.entries.iter()
    {
        writeln!(
            buffer,
            "{:<16} {:>14.6} {:>12.4} {:>9}",
            assignment.to_string(),
            value,
            probability,
            if *feasible { "yes" } else { "no" }
        )?;
    }
    Ok(())
}

fn names(selection: &[AssetId]) -> String {
    selection
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
