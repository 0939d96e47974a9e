use super::{Context, format_summary};
use super::protein::write_view;
use crate::cli::PredictArgs;
use crate::error::{CliError, Result};
use isoscope::core::io::pdb::PdbFile;
use isoscope::core::io::traits::{StructureFile, StructureFormat};
use isoscope::core::models::confidence::ConfidenceSummary;
use isoscope::core::utils::sequence::{molecular_weight, validate_sequence};
use isoscope::render::Colouring;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct PredictionReport<'a> {
    length: usize,
    molecular_weight: Option<f64>,
    confidence: &'a ConfidenceSummary,
}

/// Lines of the first record of a FASTA file, header included.
fn first_fasta_record(text: &str) -> String {
    let mut headers = 0;
    text.lines()
        .take_while(|line| {
            if line.trim_start().starts_with('>') {
                headers += 1;
            }
            headers <= 1
        })
        .filter(|line| !line.trim_start().starts_with(';'))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn run(args: PredictArgs, ctx: &Context) -> Result<()> {
    let raw = match (&args.sequence, &args.fasta) {
        (Some(seq), _) => seq.clone(),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)?;
            if text.matches('>').count() > 1 {
                warn!("{:?} holds several records; only the first is folded", path);
            }
            first_fasta_record(&text)
        }
        (None, None) => {
            return Err(CliError::Argument(
                "Provide a sequence with --sequence or --fasta".to_string(),
            ));
        }
    };
    let sequence = validate_sequence(&raw)?;
    info!("Validated sequence of {} residues", sequence.len());
    let services = ctx.services()?;

    ctx.progress.phase(format!("Folding {} residues with ESMFold", sequence.len()));
    let pdb_text = services.esmfold.fold(&sequence).await?;
    ctx.progress.finish_phase();

    let document = PdbFile::read_from_str(&pdb_text)?;
    let summary = document.confidence_summary();
    if summary.is_empty() {
        warn!("The predicted structure carries no pLDDT values");
    }

    if let Some(path) = &args.output {
        std::fs::write(path, document.text())?;
        println!("Structure saved to {}", path.display());
    }
    if let Some(path) = &args.view {
        write_view(
            path,
            &format!("ESMFold prediction ({} residues)", sequence.len()),
            StructureFormat::Pdb,
            document.text(),
            &Colouring::Confidence(summary),
        )?;
    }

    let report = PredictionReport {
        length: sequence.len(),
        molecular_weight: molecular_weight(&sequence),
        confidence: &summary,
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?);
    } else {
        println!("Predicted structure for {} residues", report.length);
        if let Some(mw) = report.molecular_weight {
            println!("Molecular weight: {:.1} kDa", mw / 1000.0);
        }
        print!("{}", format_summary(&summary));
    }
    Ok(())
}
