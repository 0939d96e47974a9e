use super::{Context, format_mean, format_summary};
use crate::cli::ProteinArgs;
use crate::error::{CliError, Result};
use crate::viewer::HtmlViewer;
use isoscope::core::io::pdb::PdbFile;
use isoscope::core::io::traits::{StructureFile, StructureFormat};
use isoscope::core::models::alphafold::AlphaFoldEntry;
use isoscope::core::models::confidence::ConfidenceSummary;
use isoscope::core::models::uniprot::UniProtEntry;
use isoscope::render::{Colouring, StructureRenderer};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct ProteinReport {
    accession: String,
    full_name: String,
    gene: Option<String>,
    alternative_names: Vec<String>,
    function: String,
    diseases: Vec<String>,
    subcellular_locations: Vec<String>,
    length: Option<usize>,
    molecular_weight: Option<f64>,
    alphafold: Option<AlphaFoldSection>,
}

#[derive(Debug, Serialize)]
struct AlphaFoldSection {
    model: String,
    viewer_url: String,
    structure_url: String,
    format: StructureFormat,
    reported: ConfidenceSummary,
    computed: Option<ConfidenceSummary>,
}

pub async fn run(args: ProteinArgs, ctx: &Context) -> Result<()> {
    let accession = args.accession.trim().to_uppercase();
    if accession.is_empty() {
        return Err(CliError::Argument("Accession must not be empty".to_string()));
    }
    let services = ctx.services()?;

    ctx.progress.phase(format!("Fetching UniProt entry {}", accession));
    let entry = services
        .uniprot
        .entry(&accession)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("UniProt has no entry {}", accession)))?;
    ctx.progress.finish_phase();

    ctx.progress.phase(format!("Fetching AlphaFold model for {}", accession));
    let model = services.alphafold.prediction(&accession).await?;
    ctx.progress.finish_phase();

    let mut report = build_report(&accession, &entry, model.as_ref());

    if !report.function.is_empty() && services.translator.is_enabled() {
        ctx.progress.phase("Translating function");
        let translated = services
            .translator
            .translate_all(std::slice::from_ref(&report.function), ctx.cancellation.clone())
            .await?;
        ctx.progress.finish_phase();
        if let Some(text) = translated.get(&report.function) {
            report.function = text.clone();
        }
    }

    let wants_structure = args.structure || args.view.is_some() || args.output.is_some();
    if wants_structure {
        let Some(model) = model.as_ref() else {
            return Err(CliError::NotFound(format!(
                "AlphaFold has no model for {}",
                accession
            )));
        };
        let (url, format) = model.structure_url();

        ctx.progress.phase(format!("Downloading {} structure", format));
        let text = services
            .alphafold
            .download_structure(&url, ctx.download_progress())
            .await?;
        ctx.progress.finish_phase();

        let computed = match format {
            StructureFormat::Pdb => Some(PdbFile::read_from_str(&text)?.confidence_summary()),
            StructureFormat::Cif => {
                warn!("Local confidence is only computed from PDB files; using reported values");
                None
            }
        };
        if let Some(section) = report.alphafold.as_mut() {
            section.computed = computed;
        }

        if let Some(path) = &args.output {
            std::fs::write(path, &text)?;
            info!("Saved structure to {:?}", path);
        }
        if let Some(path) = &args.view {
            let colouring = match computed {
                Some(summary) => Colouring::Confidence(summary),
                None => Colouring::Spectrum,
            };
            write_view(path, &format!("{} - {}", accession, report.full_name), format, &text, &colouring)?;
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?);
    } else {
        print!("{}", render(&report));
    }
    Ok(())
}

pub(crate) fn write_view(
    path: &Path,
    title: &str,
    format: StructureFormat,
    text: &str,
    colouring: &Colouring,
) -> Result<()> {
    let mut viewer = HtmlViewer::new(path, title);
    viewer
        .load(format, text, colouring)
        .map_err(|e| CliError::Other(e.into()))?;
    println!("3D view written to {}", viewer.output().display());
    Ok(())
}

fn build_report(accession: &str, entry: &UniProtEntry, model: Option<&AlphaFoldEntry>) -> ProteinReport {
    ProteinReport {
        accession: entry.accession().unwrap_or(accession).to_string(),
        full_name: entry.full_name(),
        gene: entry.gene_name().map(str::to_string),
        alternative_names: entry.alternative_names().into_iter().map(str::to_string).collect(),
        function: entry.function_text(),
        diseases: entry.diseases(),
        subcellular_locations: entry.subcellular_locations(),
        length: entry.sequence_length(),
        molecular_weight: entry.molecular_weight(),
        alphafold: model.map(|m| {
            let (structure_url, format) = m.structure_url();
            AlphaFoldSection {
                model: m.entry_id.clone(),
                viewer_url: m.viewer_url(),
                structure_url,
                format,
                reported: m.confidence_summary(),
                computed: None,
            }
        }),
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join("; ")
    }
}

fn render(report: &ProteinReport) -> String {
    let mut out = format!("{} - {}\n", report.accession, report.full_name);
    if let Some(gene) = &report.gene {
        out.push_str(&format!("Gene: {}\n", gene));
    }
    out.push_str(&format!("Also known as: {}\n", list_or_none(&report.alternative_names)));
    if let Some(length) = report.length {
        out.push_str(&format!("Length: {} aa\n", length));
    }
    if let Some(mw) = report.molecular_weight {
        out.push_str(&format!("Molecular weight: {:.1} kDa\n", mw / 1000.0));
    }
    out.push_str(&format!(
        "Subcellular location: {}\n",
        list_or_none(&report.subcellular_locations)
    ));
    out.push_str(&format!("Diseases: {}\n", list_or_none(&report.diseases)));
    if !report.function.is_empty() {
        out.push_str(&format!("\nFunction:\n  {}\n", report.function));
    }

    match &report.alphafold {
        None => out.push_str("\nNo AlphaFold model available.\n"),
        Some(af) => {
            out.push_str(&format!(
                "\nAlphaFold model {} (mean pLDDT {})\n  {}\n",
                af.model,
                format_mean(af.reported.mean),
                af.viewer_url
            ));
            out.push_str("Reported confidence:\n");
            out.push_str(&format_summary(&af.reported));
            if let Some(computed) = &af.computed {
                out.push_str("Confidence computed from the structure file:\n");
                out.push_str(&format_summary(computed));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> UniProtEntry {
        serde_json::from_str(
            r#"{
                "primaryAccession": "Q15116",
                "proteinDescription": {
                    "recommendedName": {"fullName": {"value": "Programmed cell death protein 1"}},
                    "alternativeNames": [{"fullName": {"value": "PD-1"}}]
                },
                "genes": [{"geneName": {"value": "PDCD1"}}],
                "comments": [
                    {"commentType": "FUNCTION", "texts": [{"value": "Inhibitory receptor on T cells."}]},
                    {"commentType": "SUBCELLULAR LOCATION", "subcellularLocations": [{"location": {"value": "Cell membrane"}}]}
                ],
                "sequence": {"value": "MQIPQAPWPVVWAVLQLGWRPGWFLDSPDRPWNPPTFSPALLVVTEGDNATFTCSFSNTSESFVLNWYRMSPSNQTDKLAAFPEDRSQPGQDCRFRVTQLPNGRDFHMSVVRARRNDSGTYLCGAISLAPKAQIKESLRAELRVTERRAEVPTAHPSPSPRPAGQFQTLVVGVVGGLLGSLVLLVWVLAVICSRAARGTIGARRTGQPLKEDPSAVPVFSVDYGELDFQWREKTPEPPVPCVPEQTEYATIVFPSGMGTSSPARRGSADGPRSAQPLRPEDGHCSWPL", "length": 288, "molWeight": 31647}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn report_collects_annotations() {
        let report = build_report("Q15116", &entry(), None);
        assert_eq!(report.full_name, "Programmed cell death protein 1");
        assert_eq!(report.gene.as_deref(), Some("PDCD1"));
        assert_eq!(report.alternative_names, ["PD-1"]);
        assert_eq!(report.function, "Inhibitory receptor on T cells.");
        assert_eq!(report.subcellular_locations, ["Cell membrane"]);

        let text = render(&report);
        assert!(text.contains("Molecular weight: 31.6 kDa"));
        assert!(text.contains("Diseases: none"));
        assert!(text.contains("No AlphaFold model available."));
    }

    #[test]
    fn report_includes_alphafold_section() {
        let model: AlphaFoldEntry = serde_json::from_str(
            r#"{"entryId": "AF-Q15116-F1", "modelEntityId": "AF-Q15116-F1", "uniprotAccession": "Q15116",
                "globalMetricValue": 66.0, "fractionPlddtVeryHigh": 0.1, "fractionPlddtConfident": 0.4,
                "fractionPlddtLow": 0.2, "fractionPlddtVeryLow": 0.3}"#,
        )
        .unwrap();
        let report = build_report("Q15116", &entry(), Some(&model));
        let text = render(&report);
        assert!(text.contains("AlphaFold model AF-Q15116-F1 (mean pLDDT 66.0)"));
        assert!(text.contains("https://alphafold.ebi.ac.uk/entry/Q15116"));
        assert!(!text.contains("computed from the structure"));
    }

    #[test]
    fn write_view_creates_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q15116.html");
        write_view(
            &path,
            "Q15116",
            StructureFormat::Pdb,
            "ATOM      1  CA  ALA A   1      11.104   6.134  -6.504  1.00 95.00           C\n",
            &Colouring::Spectrum,
        )
        .unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("3Dmol"));
    }
}
