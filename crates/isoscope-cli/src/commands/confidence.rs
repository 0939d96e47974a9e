use super::format_summary;
use crate::cli::ConfidenceArgs;
use crate::error::{CliError, Result};
use isoscope::core::io::pdb::{PdbDocument, PdbFile, ResidueConfidence};
use isoscope::core::io::traits::StructureFile;
use isoscope::core::models::confidence::ConfidenceSummary;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Serialize)]
struct FileSummary {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfidenceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip)]
    document: Option<PdbDocument>,
}

fn read(path: &Path) -> Result<PdbDocument> {
    PdbFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Summaries for every input, computed in parallel, in input order.
fn summarize_all(inputs: &[PathBuf]) -> Vec<FileSummary> {
    inputs
        .par_iter()
        .map(|path| match read(path) {
            Ok(document) => FileSummary {
                path: path.clone(),
                summary: Some(document.confidence_summary()),
                error: None,
                document: Some(document),
            },
            Err(e) => {
                error!("{}", e);
                FileSummary {
                    path: path.clone(),
                    summary: None,
                    error: Some(e.to_string()),
                    document: None,
                }
            }
        })
        .collect()
}

fn write_residue_csv(rows: &[ResidueConfidence], out: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(out).map_err(anyhow::Error::from)?;
    for row in rows {
        writer.serialize(row).map_err(anyhow::Error::from)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run(args: ConfidenceArgs) -> Result<()> {
    info!("Computing confidence for {} file(s)", args.inputs.len());
    let results = summarize_all(&args.inputs);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results).map_err(anyhow::Error::from)?);
    } else {
        for result in &results {
            println!("{}", result.path.display());
            match (&result.summary, &result.error) {
                (Some(summary), _) => print!("{}", format_summary(summary)),
                (None, Some(e)) => println!("  Error: {}", e),
                (None, None) => {}
            }
        }
    }

    if let Some(out) = &args.per_residue {
        // Only the first input is profiled.
        match results.first().and_then(|r| r.document.as_ref()) {
            Some(document) => {
                let rows = document.residue_profile();
                write_residue_csv(&rows, out)?;
                println!("Wrote {} residue(s) to {}", rows.len(), out.display());
            }
            None => warn!("No residue profile written: the first input could not be read"),
        }
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        return Err(CliError::Argument(format!(
            "{} of {} file(s) could not be read",
            failed,
            results.len()
        )));
    }
    Ok(())
}
